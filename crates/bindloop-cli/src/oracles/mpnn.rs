use super::template::render;
use super::{io_error, run_script};
use crate::config::models::round_dir;
use bindloop::core::io::fasta::{self, FastaRecord};
use bindloop::core::models::candidate::StructureRef;
use bindloop::engine::controller::{SequenceBatch, SequenceOracle};
use bindloop::engine::error::OracleError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ORACLE: &str = "sequence design tool";

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOracleSettings {
    /// Script template with `INPUT_PDB_PATH`, `CHAINS_TO_DESIGN`, `OUTPUT_PATH`,
    /// `POSITIONS_TO_DESIGN` and `SEQS_PER_TARGET`.
    pub template: PathBuf,
    pub chains_to_design: String,
    /// Space-separated residue positions of the designed chain.
    pub positions_to_design: String,
    pub seqs_per_target: u32,
    /// Fixed chain sequences placed in front of every designed sequence.
    pub constant_chains: Vec<String>,
}

/// Redesigns the binder sequence of the carried-forward structure with a ProteinMPNN-style
/// script.
pub struct MpnnOracle {
    settings: SequenceOracleSettings,
    output_dir: PathBuf,
}

impl MpnnOracle {
    pub fn new(settings: SequenceOracleSettings, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            output_dir: output_dir.into(),
        }
    }

    fn stage_reference(&self, reference: &StructureRef, dir: &Path) -> Result<PathBuf, OracleError> {
        fs::create_dir_all(dir).map_err(io_error(format!("Failed to create {}", dir.display())))?;
        let staged = dir.join("previous_round.pdb");
        let same_file = match (fs::canonicalize(reference.path()), fs::canonicalize(&staged)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same_file {
            fs::copy(reference.path(), &staged).map_err(io_error(format!(
                "Failed to copy {} to {}",
                reference,
                staged.display()
            )))?;
        }
        Ok(staged)
    }

    /// Renders the template once so unreadable templates and unknown placeholders surface
    /// before any round starts.
    pub fn check_template(&self) -> Result<(), OracleError> {
        self.render_script(&round_dir(&self.output_dir, 1)).map(|_| ())
    }

    fn render_script(&self, dir: &Path) -> Result<String, OracleError> {
        let template = fs::read_to_string(&self.settings.template).map_err(io_error(format!(
            "Failed to read template {}",
            self.settings.template.display()
        )))?;
        render(
            &template,
            &[
                ("INPUT_PDB_PATH", dir.display().to_string()),
                ("CHAINS_TO_DESIGN", self.settings.chains_to_design.clone()),
                ("OUTPUT_PATH", dir.display().to_string()),
                ("POSITIONS_TO_DESIGN", self.settings.positions_to_design.clone()),
                ("SEQS_PER_TARGET", self.settings.seqs_per_target.to_string()),
            ],
        )
    }

    /// Turns the tool's `seqs/*.fa` output into the next round's input sequences.
    ///
    /// The first record echoes the input structure's native sequence and is dropped.
    pub fn prepare_sequences(&self, dir: &Path, next_round: usize) -> Result<PathBuf, OracleError> {
        let seqs_dir = dir.join("seqs");
        let mut outputs = Vec::new();
        for entry in fs::read_dir(&seqs_dir).map_err(io_error(format!("Failed to list {}", seqs_dir.display())))? {
            let path = entry
                .map_err(io_error(format!("Failed to list {}", seqs_dir.display())))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "fa") {
                outputs.push(path);
            }
        }
        let source = match outputs.len() {
            0 => {
                return Err(OracleError::NoOutput {
                    oracle: ORACLE,
                    path: seqs_dir,
                });
            }
            1 => outputs.remove(0),
            n => {
                return Err(OracleError::InvalidOutput {
                    oracle: ORACLE,
                    message: format!("expected one FASTA file in {}, found {}", seqs_dir.display(), n),
                });
            }
        };

        let records = fasta::read_path(&source)
            .map_err(io_error(format!("Failed to read {}", source.display())))?;
        let designed: Vec<FastaRecord> = records
            .into_iter()
            .skip(1)
            .enumerate()
            .map(|(i, record)| {
                let mut chains: Vec<&str> = self.settings.constant_chains.iter().map(String::as_str).collect();
                chains.push(&record.sequence);
                FastaRecord::new(format!("Round_{}_seq_{}", next_round, i + 1), chains.join(":"))
            })
            .collect();
        if designed.is_empty() {
            return Err(OracleError::InvalidOutput {
                oracle: ORACLE,
                message: format!("{} holds no designed sequences", source.display()),
            });
        }

        let target = dir.join(format!("designed_sequences_round_{}.fa", next_round));
        fasta::write_path(&designed, &target)
            .map_err(io_error(format!("Failed to write {}", target.display())))?;
        debug!(path = %target.display(), count = designed.len(), "Wrote designed sequences.");
        Ok(target)
    }
}

impl SequenceOracle for MpnnOracle {
    fn design(&mut self, next_round: usize, reference: &StructureRef) -> Result<SequenceBatch, OracleError> {
        let dir = round_dir(&self.output_dir, next_round);
        self.stage_reference(reference, &dir)?;
        let script = self.render_script(&dir)?;
        run_script(&dir, &script, ORACLE)?;

        let fasta = self.prepare_sequences(&dir, next_round)?;
        info!(round = next_round, reference = %reference, "Sequence design finished.");
        Ok(SequenceBatch::new(next_round, fasta))
    }
}
