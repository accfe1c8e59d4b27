use crate::cli::ScoreArgs;
use crate::config::build_scoring_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use bindloop::engine::error::{EngineError, SelectionError};
use bindloop::engine::progress::ProgressReporter;
use bindloop::engine::selector::{RejectedCandidate, SelectionReport};
use bindloop::workflows;
use std::fmt::Write;
use tracing::info;

pub fn run(args: ScoreArgs) -> Result<()> {
    let config = build_scoring_config(args.config.as_deref(), &args.set_values)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Scoring candidates in {:?}", &args.input);
    match workflows::score::run(&args.input, &config, &reporter) {
        Ok(report) => {
            print!("{}", format_report(&report));
            Ok(())
        }
        Err(EngineError::Selection(SelectionError::EmptyBatch { rejected })) => {
            print!("{}", format_rejected(&rejected));
            Err(EngineError::from(SelectionError::EmptyBatch { rejected }).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn format_report(report: &SelectionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<32} {:>8} {:>7} {:>8} {:>8} {:>10}",
        "Rank", "Candidate", "pLDDT", "ipTM", "iPAE", "Rg(nm)", "Loss"
    );
    for (rank, candidate) in report.ranked().iter().enumerate() {
        let metrics = &candidate.metrics;
        let marker = if candidate.id == report.best().id { "*" } else { " " };
        let interface = if metrics.has_interface() {
            format!("{:.3}", metrics.interface_error)
        } else {
            "none".to_string()
        };
        let _ = writeln!(
            out,
            "{:>3}{} {:<32} {:>8.2} {:>7.3} {:>8} {:>8.3} {:>10.4}",
            rank + 1,
            marker,
            candidate.id.as_str(),
            metrics.confidence,
            metrics.agreement,
            interface,
            metrics.compactness,
            candidate.loss
        );
    }
    out.push_str(&format_rejected(report.rejected()));
    out
}

fn format_rejected(rejected: &[RejectedCandidate]) -> String {
    let mut out = String::new();
    if rejected.is_empty() {
        return out;
    }
    let _ = writeln!(out, "\nRejected candidates:");
    for candidate in rejected {
        let _ = writeln!(out, "  {}: {}", candidate.id, candidate.reason);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindloop::core::io::batch::ArtifactKind;
    use bindloop::core::models::candidate::{CandidateId, StructureRef};
    use bindloop::core::scoring::metrics::MetricSet;
    use bindloop::engine::error::CandidateError;
    use bindloop::engine::selector::ScoredCandidate;

    fn scored(id: &str, interface_error: f64, loss: f64) -> ScoredCandidate {
        ScoredCandidate {
            id: CandidateId::new(id),
            structure: StructureRef::new(format!("{id}.pdb")),
            metrics: MetricSet {
                confidence: 85.0,
                agreement: 0.62,
                same_chain_agreement: 0.7,
                interface_error,
                compactness: 1.3,
            },
            loss,
        }
    }

    #[test]
    fn report_lists_candidates_by_loss_and_marks_the_winner() {
        let report = SelectionReport::new(
            vec![
                scored("Round_1_seq_1", 6.0, 4.5),
                scored("Round_1_seq_2", f64::INFINITY, f64::INFINITY),
                scored("Round_1_seq_3", 3.0, 1.25),
            ],
            vec![RejectedCandidate {
                id: CandidateId::new("Round_1_seq_4"),
                reason: CandidateError::MissingArtifact {
                    kind: ArtifactKind::Scores,
                },
            }],
        )
        .unwrap();

        let text = format_report(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Rank") && lines[0].contains("Loss"));
        assert!(lines[1].starts_with("  1*") && lines[1].contains("Round_1_seq_3"));
        assert!(lines[2].contains("Round_1_seq_1") && !lines[2].contains('*'));
        assert!(lines[3].contains("Round_1_seq_2") && lines[3].contains("none"));
        assert!(lines[2].contains("6.000"));
        assert!(text.contains("Rejected candidates:"));
        assert!(text.contains("Round_1_seq_4: Missing"));
    }

    #[test]
    fn rejected_section_is_omitted_when_empty() {
        let report = SelectionReport::new(vec![scored("s_1", 4.0, 2.0)], Vec::new()).unwrap();
        assert!(!format_report(&report).contains("Rejected"));
    }
}
