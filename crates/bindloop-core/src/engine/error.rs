use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use super::config::ConfigError;
use super::selector::RejectedCandidate;
use crate::core::io::artifacts::ArtifactError;
use crate::core::io::batch::ArtifactKind;
use crate::core::io::pdb::PdbError;
use crate::core::io::summary::SummaryError;
use crate::core::models::candidate::AlignmentError;
use crate::core::scoring::fitness::FitnessError;
use crate::core::scoring::metrics::MetricsError;

/// A data-integrity problem confined to one candidate.
///
/// The selector excludes the candidate and continues with the rest of the batch.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("Missing {kind} artifact")]
    MissingArtifact { kind: ArtifactKind },

    #[error("Failed to read structure '{path}': {source}", path = path.display())]
    Structure {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Failed to read {kind} artifact '{path}': {source}", path = path.display())]
    Artifact {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    #[error("Residue alignment mismatch: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("Metric evaluation failed: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Invalid fitness domain: {0}")]
    Fitness(#[from] FitnessError),
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("No candidate of the batch could be scored ({count} rejected)", count = rejected.len())]
    EmptyBatch { rejected: Vec<RejectedCandidate> },

    #[error("Failed to scan candidate directory '{dir}': {source}", dir = dir.display())]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A failure of one of the external tools. Always fatal for the round.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("The {oracle} exited with {status}")]
    ExitStatus {
        oracle: &'static str,
        status: ExitStatus,
    },

    #[error("The {oracle} produced no output in '{path}'", path = path.display())]
    NoOutput { oracle: &'static str, path: PathBuf },

    #[error("The {oracle} produced unusable output: {message}")]
    InvalidOutput {
        oracle: &'static str,
        message: String,
    },

    #[error("Invalid command template: {0}")]
    Template(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    StructurePrediction,
    Scoring,
    Deciding,
    SequenceDesign,
}

impl fmt::Display for RoundStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoundStep::StructurePrediction => "structure prediction",
            RoundStep::Scoring => "scoring",
            RoundStep::Deciding => "acceptance",
            RoundStep::SequenceDesign => "sequence design",
        })
    }
}

#[derive(Debug, Error)]
pub enum RoundError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("No accepted design exists to carry into sequence design")]
    NoCarriedDesign,

    #[error("Failed to record the accepted design: {0}")]
    Summary(#[from] SummaryError),
}

/// A round-fatal failure, naming the round and the step where it happened.
#[derive(Debug, Error)]
#[error("Round {round} failed during {step}: {source}")]
pub struct RoundFailure {
    pub round: usize,
    pub step: RoundStep,
    #[source]
    pub source: RoundError,
}

impl RoundFailure {
    pub fn new(round: usize, step: RoundStep, source: impl Into<RoundError>) -> Self {
        Self {
            round,
            step,
            source: source.into(),
        }
    }
}

/// Errors that prevent a workflow from starting or completing.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Summary log error: {0}")]
    Summary(#[from] SummaryError),
}
