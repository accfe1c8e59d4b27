use crate::oracles::colabfold::StructureOracleSettings;
use crate::oracles::mpnn::SequenceOracleSettings;
use bindloop::engine::config::DesignConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub output_dir: PathBuf,
    pub design: DesignConfig,
    pub structure_oracle: StructureOracleSettings,
    pub sequence_oracle: SequenceOracleSettings,
}

impl AppConfig {
    pub fn round_dir(&self, round: usize) -> PathBuf {
        round_dir(&self.output_dir, round)
    }
}

pub fn round_dir(output_dir: &std::path::Path, round: usize) -> PathBuf {
    output_dir.join(format!("round_{round}"))
}
