use crate::error::{CliError, Result};
use bindloop::core::models::selection::{AtomSelection, ChainRef, ResidueRange};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub search: Option<FileSearchConfig>,
    pub scoring: Option<FileScoringConfig>,
    pub selections: Option<FileSelectionsConfig>,
    pub artifacts: Option<FileArtifactsConfig>,
    pub structure_oracle: Option<FileStructureOracleConfig>,
    pub sequence_oracle: Option<FileSequenceOracleConfig>,
    pub resume: Option<FileResumeConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSearchConfig {
    pub total_rounds: Option<usize>,
    pub start_round: Option<usize>,
    pub min_improvement: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileScoringConfig {
    pub contact_cutoff: Option<f64>,
    pub compactness_threshold: Option<f64>,
    pub interface_error_weight: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSelectionsConfig {
    pub binder: Option<FileSelection>,
    pub target: Option<FileSelection>,
    pub compactness: Option<FileSelection>,
}

/// A chain given either by its ordinal position (`2`) or by its label (`"C"`).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FileChainRef {
    Index(usize),
    Label(String),
}

impl TryFrom<FileChainRef> for ChainRef {
    type Error = CliError;

    fn try_from(value: FileChainRef) -> Result<Self> {
        match value {
            FileChainRef::Index(index) => Ok(ChainRef::Index(index)),
            FileChainRef::Label(label) => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(ChainRef::Label(c)),
                    _ => Err(CliError::Config(format!(
                        "Chain label must be a single character, got '{}'",
                        label
                    ))),
                }
            }
        }
    }
}

/// Each field left out keeps the corresponding part of the default selection.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSelection {
    pub chains: Option<Vec<FileChainRef>>,
    pub atom_names: Option<Vec<String>>,
    pub residue_range: Option<[isize; 2]>,
}

impl FileSelection {
    pub fn merge_over(self, default: &AtomSelection) -> Result<AtomSelection> {
        let chains = match self.chains {
            Some(chains) => chains
                .into_iter()
                .map(ChainRef::try_from)
                .collect::<Result<Vec<_>>>()?,
            None => default.chains.clone(),
        };
        let residue_range = match self.residue_range {
            Some([start, end]) if start > end => {
                return Err(CliError::Config(format!(
                    "Residue range start {} is after its end {}",
                    start, end
                )));
            }
            Some([start, end]) => Some(ResidueRange::new(start, end)),
            None => default.residue_range,
        };
        Ok(AtomSelection {
            chains,
            atom_names: self.atom_names.unwrap_or_else(|| default.atom_names.clone()),
            residue_range,
        })
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileArtifactsConfig {
    pub structure_marker: Option<String>,
    pub structure_extension: Option<String>,
    pub pae_suffix: Option<String>,
    pub scores_marker: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileStructureOracleConfig {
    pub template: Option<PathBuf>,
    pub pdb_templates: Option<PathBuf>,
    pub num_recycle: Option<u32>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSequenceOracleConfig {
    pub template: Option<PathBuf>,
    pub chains_to_design: Option<String>,
    pub positions_to_design: Option<String>,
    pub seqs_per_target: Option<u32>,
    pub constant_chains: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileResumeConfig {
    pub best_structure: Option<PathBuf>,
    pub best_loss: Option<f64>,
}
