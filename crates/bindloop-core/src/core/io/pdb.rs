use crate::core::io::traits::StructureFile;
use crate::core::models::structure::{Structure, StructureBuilder};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

/// PDB files store coordinates in Ångström; structures are kept in nanometres.
pub const ANGSTROM_TO_NM: f64 = 0.1;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, line_num: usize, start: usize, columns: &str) -> Result<f64, PdbError> {
    let raw = slice_and_trim(line, start, start + 8);
    raw.parse::<f64>().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: raw.into(),
        },
    })
}

fn element_from_name(name: &str) -> String {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResidueKey {
    number: isize,
    insertion_code: Option<char>,
    name: String,
}

/// Reader for the Protein Data Bank coordinate format.
///
/// Only the first model is read. A new chain starts whenever the chain identifier changes
/// or after a `TER` record; a new residue starts whenever the residue number, insertion
/// code or residue name changes. Alternate locations other than the primary one (blank or
/// `A`) are skipped.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut current_chain: Option<char> = None;
        let mut current_residue: Option<ResidueKey> = None;
        let mut chain_terminated = false;
        let mut atom_count = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = slice_and_trim(&line, 16, 17);
                    if !alt_loc.is_empty() && alt_loc != "A" {
                        continue;
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_label = slice_and_trim(&line, 21, 22).chars().next().unwrap_or('A');
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let insertion_code = slice_and_trim(&line, 26, 27).chars().next();

                    let x = parse_coordinate(&line, line_num, 30, "31-38")?;
                    let y = parse_coordinate(&line, line_num, 38, "39-46")?;
                    let z = parse_coordinate(&line, line_num, 46, "47-54")?;

                    // Hybrid-36 serials beyond 99999 are not decimal; fall back to file order.
                    let serial = slice_and_trim(&line, 6, 11)
                        .parse()
                        .unwrap_or(atom_count + 1);
                    let element = match slice_and_trim(&line, 76, 78) {
                        "" => element_from_name(name),
                        e => e.to_string(),
                    };

                    if chain_terminated || current_chain != Some(chain_label) {
                        builder.start_chain(chain_label);
                        current_chain = Some(chain_label);
                        current_residue = None;
                        chain_terminated = false;
                    }

                    let key = ResidueKey {
                        number: res_seq,
                        insertion_code,
                        name: res_name.to_string(),
                    };
                    if current_residue.as_ref() != Some(&key) {
                        builder.start_residue(key.number, key.insertion_code, &key.name);
                        current_residue = Some(key);
                    }

                    let position = Point3::new(x, y, z) * ANGSTROM_TO_NM;
                    builder.add_atom(serial, name, &element, position);
                    atom_count += 1;
                }
                "TER" => chain_terminated = true,
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(builder.build())
    }
}
