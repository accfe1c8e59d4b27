use super::selector::ScoredCandidate;
use crate::core::io::summary::SummaryRow;
use crate::core::models::candidate::{CandidateId, StructureRef};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RunningStructurePrediction,
    Scoring,
    Deciding,
    RunningSequenceDesign,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::RunningStructurePrediction => "running structure prediction",
            Phase::Scoring => "scoring",
            Phase::Deciding => "deciding",
            Phase::RunningSequenceDesign => "running sequence design",
            Phase::Done => "done",
            Phase::Failed => "failed",
        })
    }
}

/// Greedy acceptance: a round's winner replaces the global best only if it improves on
/// it by more than `min_improvement`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AcceptanceRule {
    pub min_improvement: f64,
}

impl AcceptanceRule {
    pub fn new(min_improvement: f64) -> Self {
        Self { min_improvement }
    }

    #[inline]
    pub fn accepts(&self, round_loss: f64, best_loss: f64) -> bool {
        round_loss < best_loss - self.min_improvement
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedDesign {
    pub round: usize,
    pub candidate: CandidateId,
    pub structure: StructureRef,
    pub loss: f64,
}

impl From<&AcceptedDesign> for SummaryRow {
    fn from(entry: &AcceptedDesign) -> Self {
        SummaryRow {
            round: entry.round,
            candidate: entry.candidate.to_string(),
            structure: entry.structure.to_string(),
            loss: entry.loss,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Accepted {
        previous_loss: f64,
        entry: AcceptedDesign,
    },
    Rejected {
        round_loss: f64,
        best_loss: f64,
    },
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }
}

/// The search state carried between rounds.
///
/// `best_loss` never increases: it only changes through an accepted [`Decision`], which
/// requires a strictly lower loss. The history is append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    best_loss: f64,
    best: Option<StructureRef>,
    history: Vec<AcceptedDesign>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            best_loss: f64::INFINITY,
            best: None,
            history: Vec::new(),
        }
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a search continued from an earlier design.
    pub fn resumed(structure: StructureRef, loss: Option<f64>) -> Self {
        Self {
            best_loss: loss.unwrap_or(f64::INFINITY),
            best: Some(structure),
            history: Vec::new(),
        }
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }

    /// The design that the next sequence-design step must start from.
    pub fn best_structure(&self) -> Option<&StructureRef> {
        self.best.as_ref()
    }

    pub fn history(&self) -> &[AcceptedDesign] {
        &self.history
    }

    pub fn last_accepted(&self) -> Option<&AcceptedDesign> {
        self.history.last()
    }

    /// Applies the acceptance rule to a round's winner and returns the next state.
    pub fn decide(
        mut self,
        round: usize,
        winner: &ScoredCandidate,
        rule: &AcceptanceRule,
    ) -> (Self, Decision) {
        if !rule.accepts(winner.loss, self.best_loss) {
            let decision = Decision::Rejected {
                round_loss: winner.loss,
                best_loss: self.best_loss,
            };
            return (self, decision);
        }

        let entry = AcceptedDesign {
            round,
            candidate: winner.id.clone(),
            structure: winner.structure.clone(),
            loss: winner.loss,
        };
        let previous_loss = self.best_loss;
        self.best_loss = winner.loss;
        self.best = Some(winner.structure.clone());
        self.history.push(entry.clone());
        (
            self,
            Decision::Accepted {
                previous_loss,
                entry,
            },
        )
    }
}
