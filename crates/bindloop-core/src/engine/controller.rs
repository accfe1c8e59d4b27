use super::config::{ScoringConfig, SearchConfig};
use super::error::{OracleError, RoundError, RoundFailure, RoundStep};
use super::progress::{Progress, ProgressReporter};
use super::selector::{BatchEvaluator, CandidateSelector};
use super::state::{Decision, Phase, RoundState};
use crate::core::io::batch::CandidateBatch;
use crate::core::io::summary::{SummaryLog, SummaryRow};
use crate::core::models::candidate::StructureRef;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The sequences to fold in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceBatch {
    pub round: usize,
    pub fasta: PathBuf,
}

impl SequenceBatch {
    pub fn new(round: usize, fasta: impl Into<PathBuf>) -> Self {
        Self {
            round,
            fasta: fasta.into(),
        }
    }
}

/// Folds a round's sequences into a batch of candidate artifacts.
pub trait StructureOracle {
    fn predict(&mut self, round: usize, sequences: &SequenceBatch) -> Result<CandidateBatch, OracleError>;
}

/// Designs the sequences of `next_round` starting from a reference structure.
pub trait SequenceOracle {
    fn design(&mut self, next_round: usize, reference: &StructureRef) -> Result<SequenceBatch, OracleError>;
}

impl<T: StructureOracle + ?Sized> StructureOracle for &mut T {
    fn predict(&mut self, round: usize, sequences: &SequenceBatch) -> Result<CandidateBatch, OracleError> {
        (**self).predict(round, sequences)
    }
}

impl<T: SequenceOracle + ?Sized> SequenceOracle for &mut T {
    fn design(&mut self, next_round: usize, reference: &StructureRef) -> Result<SequenceBatch, OracleError> {
        (**self).design(next_round, reference)
    }
}

/// Drives the greedy search: predict, score, decide, design, for every round in the
/// configured range.
///
/// The controller owns the [`RoundState`]. It is replaced only after a decision is fully
/// committed (including the summary row), so a failed round leaves the last accepted
/// design untouched.
pub struct RoundController<S, Q, E = CandidateSelector> {
    search: SearchConfig,
    structure_oracle: S,
    sequence_oracle: Q,
    evaluator: E,
    summary: Option<SummaryLog>,
    phase: Phase,
    state: RoundState,
}

impl<S, Q> RoundController<S, Q, CandidateSelector>
where
    S: StructureOracle,
    Q: SequenceOracle,
{
    pub fn new(search: SearchConfig, scoring: ScoringConfig, structure_oracle: S, sequence_oracle: Q) -> Self {
        Self::with_evaluator(
            search,
            CandidateSelector::new(scoring),
            structure_oracle,
            sequence_oracle,
        )
    }
}

impl<S, Q, E> RoundController<S, Q, E>
where
    S: StructureOracle,
    Q: SequenceOracle,
    E: BatchEvaluator,
{
    pub fn with_evaluator(search: SearchConfig, evaluator: E, structure_oracle: S, sequence_oracle: Q) -> Self {
        let state = match &search.resume {
            Some(resume) => RoundState::resumed(resume.structure.clone(), resume.loss),
            None => RoundState::new(),
        };
        Self {
            search,
            structure_oracle,
            sequence_oracle,
            evaluator,
            summary: None,
            phase: Phase::Idle,
            state,
        }
    }

    /// Records every accepted design in `log`.
    pub fn with_summary(mut self, log: SummaryLog) -> Self {
        self.summary = Some(log);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn into_state(self) -> RoundState {
        self.state
    }

    /// Runs every configured round, starting from the `seed` sequences.
    ///
    /// # Errors
    ///
    /// Returns the first [`RoundFailure`]; the controller is then in [`Phase::Failed`] and
    /// its state holds the last accepted design.
    pub fn run(&mut self, seed: SequenceBatch, reporter: &ProgressReporter) -> Result<(), RoundFailure> {
        let mut sequences = seed;
        for round in self.search.rounds() {
            reporter.report(Progress::RoundStart {
                round,
                total_rounds: self.search.total_rounds,
            });
            match self.run_round(round, &sequences, reporter) {
                Ok((next, accepted)) => {
                    reporter.report(Progress::RoundFinish {
                        round,
                        accepted,
                        best_loss: self.state.best_loss(),
                    });
                    sequences = next;
                }
                Err(failure) => {
                    self.phase = Phase::Failed;
                    return Err(failure);
                }
            }
        }
        self.phase = Phase::Done;
        info!(
            best_loss = self.state.best_loss(),
            accepted = self.state.history().len(),
            "Search finished."
        );
        Ok(())
    }

    fn run_round(
        &mut self,
        round: usize,
        sequences: &SequenceBatch,
        reporter: &ProgressReporter,
    ) -> Result<(SequenceBatch, bool), RoundFailure> {
        info!(round, fasta = %sequences.fasta.display(), "Starting round.");

        self.enter(Phase::RunningStructurePrediction, reporter);
        let batch = self
            .structure_oracle
            .predict(round, sequences)
            .map_err(|e| RoundFailure::new(round, RoundStep::StructurePrediction, e))?;
        reporter.report(Progress::PhaseFinish);

        self.enter(Phase::Scoring, reporter);
        let report = self
            .evaluator
            .evaluate(&batch, reporter)
            .map_err(|e| RoundFailure::new(round, RoundStep::Scoring, e))?;
        reporter.report(Progress::PhaseFinish);
        let winner = report.best();
        debug!(
            round,
            scored = report.scored().len(),
            rejected = report.rejected().len(),
            candidate = %winner.id,
            loss = winner.loss,
            "Round winner selected."
        );

        self.enter(Phase::Deciding, reporter);
        let (next_state, decision) =
            self.state
                .clone()
                .decide(round, winner, &self.search.acceptance);
        match &decision {
            Decision::Accepted {
                previous_loss,
                entry,
            } => {
                if let Some(log) = &self.summary {
                    log.append(&SummaryRow::from(entry))
                        .map_err(|e| RoundFailure::new(round, RoundStep::Deciding, e))?;
                }
                info!(
                    round,
                    candidate = %entry.candidate,
                    loss = entry.loss,
                    previous_loss = *previous_loss,
                    "Accepted new best design."
                );
            }
            Decision::Rejected {
                round_loss,
                best_loss,
            } => {
                warn!(
                    round,
                    round_loss = *round_loss,
                    best_loss = *best_loss,
                    "Round did not improve on the best design; keeping it."
                );
            }
        }
        self.state = next_state;
        reporter.report(Progress::PhaseFinish);

        self.enter(Phase::RunningSequenceDesign, reporter);
        let reference = self
            .state
            .best_structure()
            .cloned()
            .ok_or_else(|| RoundFailure::new(round, RoundStep::SequenceDesign, RoundError::NoCarriedDesign))?;
        debug!(round, reference = %reference, "Designing sequences for next round.");
        let next = self
            .sequence_oracle
            .design(round + 1, &reference)
            .map_err(|e| RoundFailure::new(round, RoundStep::SequenceDesign, e))?;
        reporter.report(Progress::PhaseFinish);

        Ok((next, decision.is_accepted()))
    }

    fn enter(&mut self, phase: Phase, reporter: &ProgressReporter) {
        self.phase = phase;
        reporter.report(Progress::PhaseStart {
            name: match phase {
                Phase::RunningStructurePrediction => "Structure prediction",
                Phase::Scoring => "Scoring",
                Phase::Deciding => "Acceptance",
                Phase::RunningSequenceDesign => "Sequence design",
                Phase::Idle | Phase::Done | Phase::Failed => "Idle",
            },
        });
    }
}
