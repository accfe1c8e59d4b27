use super::config::ScoringConfig;
use super::error::{CandidateError, SelectionError};
use super::progress::{Progress, ProgressReporter};
use crate::core::io::artifacts::{read_pae_path, read_scores_path};
use crate::core::io::batch::{ArtifactKind, CandidateArtifacts, CandidateBatch};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::candidate::{CandidateId, CandidateRecord, StructureRef};
use crate::core::scoring::metrics::{self, MetricSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub id: CandidateId,
    pub structure: StructureRef,
    pub metrics: MetricSet,
    pub loss: f64,
}

#[derive(Debug)]
pub struct RejectedCandidate {
    pub id: CandidateId,
    pub reason: CandidateError,
}

/// The outcome of scoring one batch: every scored candidate in enumeration order, the
/// rejected ones with their reasons, and the round's winner.
#[derive(Debug)]
pub struct SelectionReport {
    scored: Vec<ScoredCandidate>,
    rejected: Vec<RejectedCandidate>,
    best_index: usize,
}

impl SelectionReport {
    /// Builds a report, picking the first candidate with the minimum loss.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EmptyBatch`] if no candidate could be scored.
    pub fn new(
        scored: Vec<ScoredCandidate>,
        rejected: Vec<RejectedCandidate>,
    ) -> Result<Self, SelectionError> {
        let Some(best_index) = first_minimum(&scored) else {
            return Err(SelectionError::EmptyBatch { rejected });
        };
        Ok(Self {
            scored,
            rejected,
            best_index,
        })
    }

    pub fn best(&self) -> &ScoredCandidate {
        &self.scored[self.best_index]
    }

    pub fn min_loss(&self) -> f64 {
        self.best().loss
    }

    pub fn scored(&self) -> &[ScoredCandidate] {
        &self.scored
    }

    pub fn rejected(&self) -> &[RejectedCandidate] {
        &self.rejected
    }

    /// Scored candidates by ascending loss; equal losses keep enumeration order.
    pub fn ranked(&self) -> Vec<&ScoredCandidate> {
        let mut ranked: Vec<&ScoredCandidate> = self.scored.iter().collect();
        ranked.sort_by(|a, b| a.loss.total_cmp(&b.loss));
        ranked
    }
}

fn first_minimum(scored: &[ScoredCandidate]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, candidate) in scored.iter().enumerate() {
        match best {
            Some(current) if candidate.loss >= scored[current].loss => {}
            _ => best = Some(index),
        }
    }
    best
}

/// Reduces a candidate batch to a [`SelectionReport`].
pub trait BatchEvaluator {
    fn evaluate(
        &mut self,
        batch: &CandidateBatch,
        reporter: &ProgressReporter,
    ) -> Result<SelectionReport, SelectionError>;
}

impl<T: BatchEvaluator + ?Sized> BatchEvaluator for &mut T {
    fn evaluate(
        &mut self,
        batch: &CandidateBatch,
        reporter: &ProgressReporter,
    ) -> Result<SelectionReport, SelectionError> {
        (**self).evaluate(batch, reporter)
    }
}

fn require(path: &Option<PathBuf>, kind: ArtifactKind) -> Result<&Path, CandidateError> {
    path.as_deref()
        .ok_or(CandidateError::MissingArtifact { kind })
}

/// Loads, validates and scores the candidates of a batch.
#[derive(Debug, Clone, Default)]
pub struct CandidateSelector {
    config: ScoringConfig,
}

impl CandidateSelector {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn load_candidate(&self, artifacts: &CandidateArtifacts) -> Result<CandidateRecord, CandidateError> {
        let structure_path = require(&artifacts.structure, ArtifactKind::Structure)?;
        let pae_path = require(&artifacts.pae, ArtifactKind::ErrorMatrix)?;
        let scores_path = require(&artifacts.scores, ArtifactKind::Scores)?;

        let structure =
            PdbFile::read_from_path(structure_path).map_err(|source| CandidateError::Structure {
                path: structure_path.to_path_buf(),
                source,
            })?;
        let pae = read_pae_path(pae_path).map_err(|source| CandidateError::Artifact {
            kind: ArtifactKind::ErrorMatrix,
            path: pae_path.to_path_buf(),
            source,
        })?;
        let scores = read_scores_path(scores_path).map_err(|source| CandidateError::Artifact {
            kind: ArtifactKind::Scores,
            path: scores_path.to_path_buf(),
            source,
        })?;

        Ok(CandidateRecord::new(
            artifacts.id.clone(),
            StructureRef::new(structure_path),
            structure,
            pae,
            scores,
        )?)
    }

    pub fn score_record(&self, record: &CandidateRecord) -> Result<ScoredCandidate, CandidateError> {
        let metrics = metrics::evaluate(record, &self.config.metrics)?;
        let loss = self.config.fitness.loss(&metrics)?;
        Ok(ScoredCandidate {
            id: record.id().clone(),
            structure: record.structure_ref().clone(),
            metrics,
            loss,
        })
    }

    pub fn score_candidate(&self, artifacts: &CandidateArtifacts) -> Result<ScoredCandidate, CandidateError> {
        let record = self.load_candidate(artifacts)?;
        self.score_record(&record)
    }

    /// Scores every candidate in natural identifier order and selects the minimum loss.
    ///
    /// Malformed candidates are excluded with a warning; the batch fails only if none
    /// remain.
    pub fn select_best(
        &self,
        batch: &CandidateBatch,
        reporter: &ProgressReporter,
    ) -> Result<SelectionReport, SelectionError> {
        let mut ordered: Vec<&CandidateArtifacts> = batch.candidates.iter().collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        reporter.report(Progress::TaskStart {
            total_steps: ordered.len() as u64,
        });
        let mut scored = Vec::with_capacity(ordered.len());
        let mut rejected = Vec::new();
        for artifacts in ordered {
            match self.score_candidate(artifacts) {
                Ok(candidate) => {
                    debug!(
                        candidate = %candidate.id,
                        plddt = candidate.metrics.confidence,
                        iptm = candidate.metrics.agreement,
                        ipae = candidate.metrics.interface_error,
                        rg = candidate.metrics.compactness,
                        loss = candidate.loss,
                        "Scored candidate."
                    );
                    scored.push(candidate);
                }
                Err(reason) => {
                    warn!(candidate = %artifacts.id, "Rejected candidate: {}", reason);
                    rejected.push(RejectedCandidate {
                        id: artifacts.id.clone(),
                        reason,
                    });
                }
            }
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);

        SelectionReport::new(scored, rejected)
    }
}

impl BatchEvaluator for CandidateSelector {
    fn evaluate(
        &mut self,
        batch: &CandidateBatch,
        reporter: &ProgressReporter,
    ) -> Result<SelectionReport, SelectionError> {
        self.select_best(batch, reporter)
    }
}
