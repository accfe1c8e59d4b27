use crate::core::io::summary::SummaryLog;
use crate::engine::config::DesignConfig;
use crate::engine::controller::{RoundController, SequenceBatch, SequenceOracle, StructureOracle};
use crate::engine::error::{EngineError, RoundFailure};
use crate::engine::progress::ProgressReporter;
use crate::engine::state::RoundState;
use tracing::{debug, error, info, instrument};

#[derive(Debug)]
pub struct DesignOutcome {
    /// Final search state. On failure this is the state after the last committed round.
    pub state: RoundState,
    pub failure: Option<RoundFailure>,
}

impl DesignOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs the greedy design loop from `seed` (the start round's sequences).
///
/// A fresh search truncates the summary log; a resumed one appends to it. A round
/// failure does not discard the search state: it is returned alongside the failure.
///
/// # Errors
///
/// Returns [`EngineError::Summary`] if the summary log cannot be opened.
#[instrument(skip_all, name = "design_workflow")]
pub fn run<S, Q>(
    config: &DesignConfig,
    structure_oracle: S,
    sequence_oracle: Q,
    seed: SequenceBatch,
    reporter: &ProgressReporter,
) -> Result<DesignOutcome, EngineError>
where
    S: StructureOracle,
    Q: SequenceOracle,
{
    let search = &config.search;
    info!(
        start_round = search.start_round,
        total_rounds = search.total_rounds,
        min_improvement = search.acceptance.min_improvement,
        resumed = search.resume.is_some(),
        "Starting design search."
    );
    debug!(
        binder = %config.scoring.metrics.binder,
        target = %config.scoring.metrics.target,
        compactness = %config.scoring.metrics.compactness,
        contact_cutoff = config.scoring.metrics.contact_cutoff,
        "Scoring settings."
    );

    let fresh = search.start_round == 0 && search.resume.is_none();
    let summary = if fresh {
        SummaryLog::create(&config.summary_path)?
    } else {
        SummaryLog::open_append(&config.summary_path)?
    };

    let mut controller = RoundController::new(
        search.clone(),
        config.scoring.clone(),
        structure_oracle,
        sequence_oracle,
    )
    .with_summary(summary);

    let failure = controller.run(seed, reporter).err();
    if let Some(failure) = &failure {
        error!(round = failure.round, step = %failure.step, "{}", failure);
    }

    Ok(DesignOutcome {
        state: controller.into_state(),
        failure,
    })
}
