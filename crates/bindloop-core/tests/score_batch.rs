mod common;

use bindloop::core::io::batch::ArtifactKind;
use bindloop::engine::config::ScoringConfig;
use bindloop::engine::error::{CandidateError, EngineError, SelectionError};
use bindloop::engine::progress::{Progress, ProgressReporter};
use bindloop::workflows::score;
use common::{Fixture, PAE_SUFFIX, SCORES_SUFFIX, STRUCTURE_SUFFIX, scores_json, write_candidate};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

const TOLERANCE: f64 = 1e-9;

#[test]
fn batch_is_scored_ranked_and_filtered() {
    let dir = tempdir().unwrap();
    let weak = Fixture::new(80.0, 0.5, 10.0);
    let strong = Fixture::new(90.0, 0.8, 4.0);
    write_candidate(dir.path(), "Round_0_seq_1", &weak);
    write_candidate(dir.path(), "Round_0_seq_2", &strong);
    write_candidate(dir.path(), "Round_0_seq_10", &Fixture::new(95.0, 0.9, 2.0).without_contact());

    // Missing error matrix.
    fs::write(
        dir.path().join(format!("Round_0_seq_3{STRUCTURE_SUFFIX}")),
        common::complex_pdb(true),
    )
    .unwrap();
    fs::write(
        dir.path().join(format!("Round_0_seq_3{SCORES_SUFFIX}")),
        scores_json(90.0, 4, 0.9),
    )
    .unwrap();

    // Confidence reported for fewer residues than the structure has.
    write_candidate(dir.path(), "Round_0_seq_4", &strong);
    fs::write(
        dir.path().join(format!("Round_0_seq_4{SCORES_SUFFIX}")),
        scores_json(90.0, 3, 0.9),
    )
    .unwrap();

    let report = score::run(dir.path(), &ScoringConfig::default(), &ProgressReporter::new()).unwrap();

    assert_eq!(report.best().id.as_str(), "Round_0_seq_2");
    assert!((report.min_loss() - strong.expected_loss()).abs() < TOLERANCE);

    let enumerated: Vec<&str> = report.scored().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(enumerated, vec!["Round_0_seq_1", "Round_0_seq_2", "Round_0_seq_10"]);
    let ranked: Vec<&str> = report.ranked().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ranked, vec!["Round_0_seq_2", "Round_0_seq_1", "Round_0_seq_10"]);

    let vetoed = &report.scored()[2];
    assert!(vetoed.metrics.interface_error.is_infinite());
    assert_eq!(vetoed.loss, f64::INFINITY);

    let weak_scored = &report.scored()[0];
    assert!((weak_scored.metrics.confidence - 80.0).abs() < TOLERANCE);
    assert!((weak_scored.metrics.interface_error - 10.0).abs() < TOLERANCE);
    assert!(weak_scored.metrics.compactness < 2.5);

    let rejected: Vec<&str> = report.rejected().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(rejected, vec!["Round_0_seq_3", "Round_0_seq_4"]);
    assert!(matches!(
        report.rejected()[0].reason,
        CandidateError::MissingArtifact {
            kind: ArtifactKind::ErrorMatrix
        }
    ));
    assert!(matches!(report.rejected()[1].reason, CandidateError::Alignment(_)));
}

#[test]
fn scoring_is_deterministic_regardless_of_creation_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let ids = ["s_1", "s_2", "s_3"];
    let tie = Fixture::new(85.0, 0.7, 5.0);
    for id in ids {
        write_candidate(first.path(), id, &tie);
    }
    for id in ids.iter().rev() {
        write_candidate(second.path(), id, &tie);
    }

    let config = ScoringConfig::default();
    let a = score::run(first.path(), &config, &ProgressReporter::new()).unwrap();
    let b = score::run(second.path(), &config, &ProgressReporter::new()).unwrap();
    assert_eq!(a.best().id.as_str(), "s_1");
    assert_eq!(b.best().id.as_str(), "s_1");
    assert_eq!(a.min_loss(), b.min_loss());
}

#[test]
fn batch_with_only_malformed_candidates_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(format!("s_1{PAE_SUFFIX}")), "not json").unwrap();
    fs::write(
        dir.path().join(format!("s_1{STRUCTURE_SUFFIX}")),
        common::complex_pdb(true),
    )
    .unwrap();
    fs::write(dir.path().join(format!("s_1{SCORES_SUFFIX}")), scores_json(90.0, 4, 0.8)).unwrap();

    let err = score::run(dir.path(), &ScoringConfig::default(), &ProgressReporter::new()).unwrap_err();
    match err {
        EngineError::Selection(SelectionError::EmptyBatch { rejected }) => {
            assert_eq!(rejected.len(), 1);
            assert!(matches!(
                rejected[0].reason,
                CandidateError::Artifact {
                    kind: ArtifactKind::ErrorMatrix,
                    ..
                }
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_directory_is_a_discovery_error() {
    let dir = tempdir().unwrap();
    let err = score::run(
        &dir.path().join("absent"),
        &ScoringConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::Selection(SelectionError::Discovery { .. })));
}

#[test]
fn progress_counts_every_candidate() {
    let dir = tempdir().unwrap();
    for id in ["a_1", "a_2", "a_3"] {
        write_candidate(dir.path(), id, &Fixture::new(70.0, 0.4, 8.0));
    }
    let increments = Mutex::new(0u64);
    let total = Mutex::new(0u64);
    let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
        Progress::TaskStart { total_steps } => *total.lock().unwrap() = total_steps,
        Progress::TaskIncrement => *increments.lock().unwrap() += 1,
        _ => {}
    }));
    score::run(dir.path(), &ScoringConfig::default(), &reporter).unwrap();
    drop(reporter);
    assert_eq!(total.into_inner().unwrap(), 3);
    assert_eq!(increments.into_inner().unwrap(), 3);
}
