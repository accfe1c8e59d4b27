use super::state::AcceptanceRule;
use crate::core::io::batch::ArtifactNaming;
use crate::core::models::candidate::StructureRef;
use crate::core::models::selection::AtomSelection;
use crate::core::scoring::fitness::FitnessFunction;
use crate::core::scoring::metrics::MetricSettings;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoringConfig {
    pub metrics: MetricSettings,
    pub fitness: FitnessFunction,
    pub naming: ArtifactNaming,
}

/// A previously accepted design to continue the search from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumePoint {
    pub structure: StructureRef,
    /// Loss of the resumed design; `None` restarts the comparison from `+inf`.
    pub loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Rounds run are `start_round..total_rounds`.
    pub total_rounds: usize,
    pub start_round: usize,
    pub acceptance: AcceptanceRule,
    pub resume: Option<ResumePoint>,
}

impl SearchConfig {
    pub fn rounds(&self) -> std::ops::Range<usize> {
        self.start_round..self.total_rounds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    pub scoring: ScoringConfig,
    pub search: SearchConfig,
    pub summary_path: PathBuf,
}

fn positive_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a positive finite number, got {value}"),
        })
    }
}

fn non_negative_finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a non-negative finite number, got {value}"),
        })
    }
}

#[derive(Default)]
pub struct ScoringConfigBuilder {
    binder_selection: Option<AtomSelection>,
    target_selection: Option<AtomSelection>,
    compactness_selection: Option<AtomSelection>,
    contact_cutoff: Option<f64>,
    compactness_threshold: Option<f64>,
    interface_error_weight: Option<f64>,
    naming: Option<ArtifactNaming>,
}

impl ScoringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binder_selection(mut self, selection: AtomSelection) -> Self {
        self.binder_selection = Some(selection);
        self
    }
    pub fn target_selection(mut self, selection: AtomSelection) -> Self {
        self.target_selection = Some(selection);
        self
    }
    pub fn compactness_selection(mut self, selection: AtomSelection) -> Self {
        self.compactness_selection = Some(selection);
        self
    }
    pub fn contact_cutoff(mut self, cutoff_nm: f64) -> Self {
        self.contact_cutoff = Some(cutoff_nm);
        self
    }
    pub fn compactness_threshold(mut self, threshold_nm: f64) -> Self {
        self.compactness_threshold = Some(threshold_nm);
        self
    }
    pub fn interface_error_weight(mut self, weight: f64) -> Self {
        self.interface_error_weight = Some(weight);
        self
    }
    pub fn naming(mut self, naming: ArtifactNaming) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let contact_cutoff = self
            .contact_cutoff
            .ok_or(ConfigError::MissingParameter("contact_cutoff"))?;
        let compactness_threshold = self
            .compactness_threshold
            .ok_or(ConfigError::MissingParameter("compactness_threshold"))?;
        let interface_error_weight = self
            .interface_error_weight
            .ok_or(ConfigError::MissingParameter("interface_error_weight"))?;

        let metrics = MetricSettings {
            binder: self
                .binder_selection
                .ok_or(ConfigError::MissingParameter("binder_selection"))?,
            target: self
                .target_selection
                .ok_or(ConfigError::MissingParameter("target_selection"))?,
            compactness: self
                .compactness_selection
                .ok_or(ConfigError::MissingParameter("compactness_selection"))?,
            contact_cutoff: positive_finite("contact_cutoff", contact_cutoff)?,
        };
        let fitness = FitnessFunction::new(
            non_negative_finite("compactness_threshold", compactness_threshold)?,
            non_negative_finite("interface_error_weight", interface_error_weight)?,
        );
        Ok(ScoringConfig {
            metrics,
            fitness,
            naming: self.naming.unwrap_or_default(),
        })
    }
}

#[derive(Default)]
pub struct DesignConfigBuilder {
    scoring: Option<ScoringConfig>,
    total_rounds: Option<usize>,
    start_round: Option<usize>,
    min_improvement: Option<f64>,
    resume_structure: Option<PathBuf>,
    resume_loss: Option<f64>,
    summary_path: Option<PathBuf>,
}

impl DesignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = Some(scoring);
        self
    }
    pub fn total_rounds(mut self, rounds: usize) -> Self {
        self.total_rounds = Some(rounds);
        self
    }
    pub fn start_round(mut self, round: usize) -> Self {
        self.start_round = Some(round);
        self
    }
    pub fn min_improvement(mut self, delta: f64) -> Self {
        self.min_improvement = Some(delta);
        self
    }
    pub fn resume_structure(mut self, path: PathBuf) -> Self {
        self.resume_structure = Some(path);
        self
    }
    pub fn resume_loss(mut self, loss: f64) -> Self {
        self.resume_loss = Some(loss);
        self
    }
    pub fn summary_path(mut self, path: PathBuf) -> Self {
        self.summary_path = Some(path);
        self
    }

    pub fn build(self) -> Result<DesignConfig, ConfigError> {
        let total_rounds = self
            .total_rounds
            .ok_or(ConfigError::MissingParameter("total_rounds"))?;
        let start_round = self.start_round.unwrap_or(0);
        if start_round >= total_rounds {
            return Err(ConfigError::InvalidParameter {
                name: "start_round",
                reason: format!("must be below total_rounds ({total_rounds}), got {start_round}"),
            });
        }
        let min_improvement = non_negative_finite("min_improvement", self.min_improvement.unwrap_or(0.0))?;

        let resume = match (self.resume_structure, self.resume_loss) {
            (Some(path), loss) => {
                if let Some(loss) = loss {
                    if loss.is_nan() {
                        return Err(ConfigError::InvalidParameter {
                            name: "resume_loss",
                            reason: "must be a number".to_string(),
                        });
                    }
                }
                Some(ResumePoint {
                    structure: StructureRef::new(path),
                    loss,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::InvalidParameter {
                    name: "resume_loss",
                    reason: "requires resume_structure".to_string(),
                });
            }
            (None, None) => None,
        };

        Ok(DesignConfig {
            scoring: self
                .scoring
                .ok_or(ConfigError::MissingParameter("scoring"))?,
            search: SearchConfig {
                total_rounds,
                start_round,
                acceptance: AcceptanceRule::new(min_improvement),
                resume,
            },
            summary_path: self
                .summary_path
                .ok_or(ConfigError::MissingParameter("summary_path"))?,
        })
    }
}
