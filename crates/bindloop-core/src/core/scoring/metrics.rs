use crate::core::models::candidate::CandidateRecord;
use crate::core::models::confidence::ConfidenceScores;
use crate::core::models::pae::PaeMatrix;
use crate::core::models::selection::{AtomSelection, ChainRef};
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{median, radius_of_gyration};
use itertools::Itertools;
use nalgebra::Point3;
use thiserror::Error;

/// Two atoms closer than this distance (nm) are in contact.
pub const DEFAULT_CONTACT_CUTOFF_NM: f64 = 0.35;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("The {role} selection ({selection}) matched no atoms")]
    EmptySelection {
        role: &'static str,
        selection: String,
    },
    #[error("No per-residue confidence values were reported")]
    NoConfidence,
    #[error("Residue {residue} is not covered by the error matrix (dimension {dim})")]
    ResidueOutOfRange { residue: usize, dim: usize },
    #[error("Error matrix entry ({aligned_on}, {scored}) is not a number")]
    NotANumber { aligned_on: usize, scored: usize },
}

/// Atom groups and thresholds used to compute the structural descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSettings {
    /// The designed binder; side A of the interface.
    pub binder: AtomSelection,
    /// The target interface region; side B of the interface.
    pub target: AtomSelection,
    /// Atoms whose radius of gyration measures compactness.
    pub compactness: AtomSelection,
    pub contact_cutoff: f64,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            binder: AtomSelection::chains([ChainRef::Index(2)]).with_atom_names(["CB"]),
            target: AtomSelection::chains([ChainRef::Index(0), ChainRef::Index(1)])
                .with_atom_names(["CB"])
                .with_residue_range(100, 140),
            compactness: AtomSelection::chains([ChainRef::Index(2)]),
            contact_cutoff: DEFAULT_CONTACT_CUTOFF_NM,
        }
    }
}

/// The descriptors of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSet {
    /// Mean per-residue confidence, in [0, 100].
    pub confidence: f64,
    /// Cross-interface agreement (`iptm`).
    pub agreement: f64,
    /// Same-chain agreement (`ptm`). Reported only; not part of the fitness.
    pub same_chain_agreement: f64,
    /// Median pairwise error over interface contacts; `+inf` when no contact exists.
    pub interface_error: f64,
    /// Radius of gyration of the compactness selection, in nm.
    pub compactness: f64,
}

impl MetricSet {
    pub fn has_interface(&self) -> bool {
        self.interface_error.is_finite()
    }
}

pub fn confidence_and_agreement(scores: &ConfidenceScores) -> Result<(f64, f64), MetricsError> {
    let mean = scores.mean_plddt().ok_or(MetricsError::NoConfidence)?;
    Ok((mean, scores.iptm))
}

fn select_nonempty(
    structure: &Structure,
    selection: &AtomSelection,
    role: &'static str,
) -> Result<Vec<usize>, MetricsError> {
    let atoms = selection.select(structure);
    if atoms.is_empty() {
        return Err(MetricsError::EmptySelection {
            role,
            selection: selection.to_string(),
        });
    }
    Ok(atoms)
}

fn pae_entry(pae: &PaeMatrix, aligned_on: usize, scored: usize) -> Result<f64, MetricsError> {
    let value = pae
        .get(aligned_on, scored)
        .ok_or(MetricsError::ResidueOutOfRange {
            residue: aligned_on.max(scored),
            dim: pae.dim(),
        })?;
    if value.is_nan() {
        return Err(MetricsError::NotANumber { aligned_on, scored });
    }
    Ok(value)
}

/// Median predicted aligned error over the residue pairs that form the interface.
///
/// Every atom pair of `side_a` × `side_b` closer than `cutoff` contributes both
/// `E[res_a, res_b]` and `E[res_b, res_a]`. Several contacting atoms within the same
/// residue pair contribute several times. Returns `f64::INFINITY` when no pair is in
/// contact.
pub fn interface_pairwise_error(
    structure: &Structure,
    pae: &PaeMatrix,
    side_a: &AtomSelection,
    side_b: &AtomSelection,
    cutoff: f64,
) -> Result<f64, MetricsError> {
    let atoms_a = select_nonempty(structure, side_a, "binder")?;
    let atoms_b = select_nonempty(structure, side_b, "target")?;
    let atoms = structure.atoms();

    let mut values = Vec::new();
    for (a, b) in atoms_a.iter().cartesian_product(atoms_b.iter()) {
        let (atom_a, atom_b) = (&atoms[*a], &atoms[*b]);
        if nalgebra::distance(&atom_a.position, &atom_b.position) >= cutoff {
            continue;
        }
        values.push(pae_entry(pae, atom_a.residue_index, atom_b.residue_index)?);
        values.push(pae_entry(pae, atom_b.residue_index, atom_a.residue_index)?);
    }

    Ok(median(&values).unwrap_or(f64::INFINITY))
}

/// Unweighted radius of gyration (nm) of the selected atoms.
pub fn compactness(structure: &Structure, selection: &AtomSelection) -> Result<f64, MetricsError> {
    let positions: Vec<Point3<f64>> = select_nonempty(structure, selection, "compactness")?
        .into_iter()
        .map(|index| structure.atoms()[index].position)
        .collect();
    radius_of_gyration(&positions).ok_or(MetricsError::EmptySelection {
        role: "compactness",
        selection: selection.to_string(),
    })
}

pub fn evaluate(record: &CandidateRecord, settings: &MetricSettings) -> Result<MetricSet, MetricsError> {
    let (confidence, agreement) = confidence_and_agreement(record.confidence())?;
    let interface_error = interface_pairwise_error(
        record.structure(),
        record.pae(),
        &settings.binder,
        &settings.target,
        settings.contact_cutoff,
    )?;
    let compactness = compactness(record.structure(), &settings.compactness)?;
    Ok(MetricSet {
        confidence,
        agreement,
        same_chain_agreement: record.confidence().ptm,
        interface_error,
        compactness,
    })
}
