#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const STRUCTURE_SUFFIX: &str = "_relaxed_rank_001_alphafold2_multimer_v3_model_1_seed_000.pdb";
pub const PAE_SUFFIX: &str = "_predicted_aligned_error_v1.json";
pub const SCORES_SUFFIX: &str = "_scores_rank_001_alphafold2_multimer_v3_model_1_seed_000.json";

/// Parameters of a synthetic four-residue complex: target chains A and B, binder chain C.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    pub contact: bool,
    pub plddt: f64,
    pub iptm: f64,
    pub pae: f64,
}

impl Fixture {
    pub fn new(plddt: f64, iptm: f64, pae: f64) -> Self {
        Self {
            contact: true,
            plddt,
            iptm,
            pae,
        }
    }

    pub fn without_contact(mut self) -> Self {
        self.contact = false;
        self
    }

    /// Loss under the default fitness settings; the binder is always compact.
    pub fn expected_loss(&self) -> f64 {
        if !self.contact {
            return f64::INFINITY;
        }
        -((self.plddt / 100.0).ln() + self.iptm.ln() - 0.2 * self.pae.ln())
    }
}

pub fn atom_line(serial: usize, name: &str, res: &str, chain: char, seq: isize, xyz: [f64; 3]) -> String {
    format!(
        "ATOM  {:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00 90.00           {}",
        serial,
        name,
        res,
        chain,
        seq,
        xyz[0],
        xyz[1],
        xyz[2],
        &name[..1]
    )
}

pub fn complex_pdb(contact: bool) -> String {
    let x = if contact { 2.0 } else { 50.0 };
    [
        atom_line(1, "CA", "ALA", 'A', 100, [-1.5, 0.0, 0.0]),
        atom_line(2, "CB", "ALA", 'A', 100, [0.0, 0.0, 0.0]),
        "TER".to_string(),
        atom_line(3, "CB", "LEU", 'B', 120, [30.0, 0.0, 0.0]),
        "TER".to_string(),
        atom_line(4, "CA", "GLY", 'C', 1, [x, 1.5, 0.0]),
        atom_line(5, "CB", "GLY", 'C', 1, [x, 0.0, 0.0]),
        atom_line(6, "CB", "SER", 'C', 2, [x + 3.8, 0.0, 0.0]),
        "TER".to_string(),
        "END".to_string(),
    ]
    .join("\n")
}

pub fn pae_json(value: f64, dim: usize) -> String {
    let rows: Vec<String> = (0..dim)
        .map(|i| {
            let cells: Vec<String> = (0..dim)
                .map(|j| if i == j { "0.25".to_string() } else { value.to_string() })
                .collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();
    format!(
        r#"{{"predicted_aligned_error": [{}], "max_predicted_aligned_error": 31.75}}"#,
        rows.join(", ")
    )
}

pub fn scores_json(plddt: f64, residues: usize, iptm: f64) -> String {
    let values = vec![plddt.to_string(); residues].join(", ");
    format!(r#"{{"plddt": [{values}], "max_pae": 31.75, "ptm": 0.7, "iptm": {iptm}}}"#)
}

/// Writes the three artifacts of a candidate into `dir`.
pub fn write_candidate(dir: &Path, id: &str, fixture: &Fixture) {
    fs::write(dir.join(format!("{id}{STRUCTURE_SUFFIX}")), complex_pdb(fixture.contact)).unwrap();
    fs::write(dir.join(format!("{id}{PAE_SUFFIX}")), pae_json(fixture.pae, 4)).unwrap();
    fs::write(
        dir.join(format!("{id}{SCORES_SUFFIX}")),
        scores_json(fixture.plddt, 4, fixture.iptm),
    )
    .unwrap();
}
