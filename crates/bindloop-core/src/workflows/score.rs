use crate::core::io::batch::CandidateBatch;
use crate::engine::config::ScoringConfig;
use crate::engine::error::{EngineError, SelectionError};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::selector::{CandidateSelector, SelectionReport};
use std::path::Path;
use tracing::{info, instrument};

/// Scores every candidate found in `dir` and selects the best one.
#[instrument(skip_all, name = "score_workflow", fields(dir = %dir.display()))]
pub fn run(
    dir: &Path,
    config: &ScoringConfig,
    reporter: &ProgressReporter,
) -> Result<SelectionReport, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Discovery" });
    let batch = CandidateBatch::discover(dir, &config.naming).map_err(|source| {
        SelectionError::Discovery {
            dir: dir.to_path_buf(),
            source,
        }
    })?;
    reporter.report(Progress::PhaseFinish);
    info!(candidates = batch.len(), "Discovered candidates.");

    reporter.report(Progress::PhaseStart { name: "Scoring" });
    let report = CandidateSelector::new(config.clone()).select_best(&batch, reporter)?;
    reporter.report(Progress::PhaseFinish);

    let best = report.best();
    info!(
        candidate = %best.id,
        loss = best.loss,
        scored = report.scored().len(),
        rejected = report.rejected().len(),
        "Batch scored."
    );
    Ok(report)
}
