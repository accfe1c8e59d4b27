use super::template::render;
use super::{io_error, run_script};
use crate::config::models::round_dir;
use bindloop::core::io::batch::{ArtifactNaming, CandidateBatch};
use bindloop::engine::controller::{SequenceBatch, StructureOracle};
use bindloop::engine::error::OracleError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const ORACLE: &str = "structure prediction tool";

#[derive(Debug, Clone, PartialEq)]
pub struct StructureOracleSettings {
    /// Script template with `TEMPLATE_PATH`, `FASTA_PATH`, `OUTPUT_PATH` and `NUM_RECYCLE`.
    pub template: PathBuf,
    /// Directory of template structures handed to the predictor.
    pub pdb_templates: PathBuf,
    pub num_recycle: u32,
}

/// Folds each round's sequences with a ColabFold-style script.
pub struct ColabFoldOracle {
    settings: StructureOracleSettings,
    output_dir: PathBuf,
    naming: ArtifactNaming,
}

impl ColabFoldOracle {
    pub fn new(settings: StructureOracleSettings, output_dir: impl Into<PathBuf>, naming: ArtifactNaming) -> Self {
        Self {
            settings,
            output_dir: output_dir.into(),
            naming,
        }
    }

    pub fn results_dir(&self, round: usize) -> PathBuf {
        round_dir(&self.output_dir, round).join("colabfold_results")
    }

    /// Renders the template once so unreadable templates and unknown placeholders surface
    /// before any round starts.
    pub fn check_template(&self) -> Result<(), OracleError> {
        self.render_script(Path::new("sequences.fa"), &self.results_dir(0))
            .map(|_| ())
    }

    fn render_script(&self, fasta: &Path, output: &Path) -> Result<String, OracleError> {
        let template = fs::read_to_string(&self.settings.template).map_err(io_error(format!(
            "Failed to read template {}",
            self.settings.template.display()
        )))?;
        render(
            &template,
            &[
                ("TEMPLATE_PATH", self.settings.pdb_templates.display().to_string()),
                ("FASTA_PATH", fasta.display().to_string()),
                ("OUTPUT_PATH", output.display().to_string()),
                ("NUM_RECYCLE", self.settings.num_recycle.to_string()),
            ],
        )
    }
}

impl StructureOracle for ColabFoldOracle {
    fn predict(&mut self, round: usize, sequences: &SequenceBatch) -> Result<CandidateBatch, OracleError> {
        let output = self.results_dir(round);
        let script = self.render_script(&sequences.fasta, &output)?;
        run_script(&output, &script, ORACLE)?;

        let batch = CandidateBatch::discover(&output, &self.naming)
            .map_err(io_error(format!("Failed to list {}", output.display())))?;
        if batch.is_empty() {
            return Err(OracleError::NoOutput {
                oracle: ORACLE,
                path: output,
            });
        }
        info!(round, candidates = batch.len(), "Structure prediction finished.");
        Ok(batch)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn oracle_with_template(dir: &Path, template: &str) -> ColabFoldOracle {
        let template_path = dir.join("colabfold_template.sh");
        fs::write(&template_path, template).unwrap();
        ColabFoldOracle::new(
            StructureOracleSettings {
                template: template_path,
                pdb_templates: dir.join("templates"),
                num_recycle: 3,
            },
            dir.join("out"),
            ArtifactNaming::default(),
        )
    }

    #[test]
    fn rendered_script_runs_and_batch_is_discovered() {
        let dir = tempfile::tempdir().unwrap();
        let template = "#!/bin/sh\n\
            echo '{FASTA_PATH} {NUM_RECYCLE}' > {OUTPUT_PATH}/args.txt\n\
            touch {OUTPUT_PATH}/Round_1_seq_1_relaxed_rank_001_model_1.pdb\n\
            touch {OUTPUT_PATH}/Round_1_seq_1_predicted_aligned_error_v1.json\n\
            touch {OUTPUT_PATH}/Round_1_seq_1_scores_rank_001_model_1.json\n";
        let mut oracle = oracle_with_template(dir.path(), template);

        let batch = oracle
            .predict(1, &SequenceBatch::new(1, "designed.fa"))
            .unwrap();
        assert_eq!(batch.dir, dir.path().join("out/round_1/colabfold_results"));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.candidates[0].id.as_str(), "Round_1_seq_1");

        let args = fs::read_to_string(batch.dir.join("args.txt")).unwrap();
        assert_eq!(args.trim(), "designed.fa 3");
    }

    #[test]
    fn empty_output_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut oracle = oracle_with_template(dir.path(), "#!/bin/sh\ntrue\n");
        let err = oracle
            .predict(0, &SequenceBatch::new(0, "designed.fa"))
            .unwrap_err();
        assert!(matches!(err, OracleError::NoOutput { .. }));
    }

    #[test]
    fn check_template_reports_unknown_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = oracle_with_template(dir.path(), "run {FASTA_PATH} {MODEL}\n");
        assert!(matches!(oracle.check_template(), Err(OracleError::Template(_))));

        let oracle = oracle_with_template(dir.path(), "run {FASTA_PATH} {TEMPLATE_PATH}\n");
        assert!(oracle.check_template().is_ok());
    }

    #[test]
    fn missing_template_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut oracle = ColabFoldOracle::new(
            StructureOracleSettings {
                template: dir.path().join("absent.sh"),
                pdb_templates: dir.path().to_path_buf(),
                num_recycle: 5,
            },
            dir.path(),
            ArtifactNaming::default(),
        );
        let err = oracle
            .predict(0, &SequenceBatch::new(0, "designed.fa"))
            .unwrap_err();
        assert!(matches!(err, OracleError::Io { .. }));
    }
}
