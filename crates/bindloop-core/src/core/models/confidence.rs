/// Confidence summary reported by the structure oracle for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScores {
    /// Per-residue confidence (pLDDT) in `[0, 100]`, one entry per residue.
    pub plddt: Vec<f64>,
    /// Global same-chain consistency score (pTM) in `[0, 1]`.
    pub ptm: f64,
    /// Global cross-interface consistency score (ipTM) in `[0, 1]`.
    pub iptm: f64,
}

impl ConfidenceScores {
    pub fn new(plddt: Vec<f64>, ptm: f64, iptm: f64) -> Self {
        Self { plddt, ptm, iptm }
    }

    /// Mean per-residue confidence, or `None` when no residues are reported.
    pub fn mean_plddt(&self) -> Option<f64> {
        if self.plddt.is_empty() {
            return None;
        }
        Some(self.plddt.iter().sum::<f64>() / self.plddt.len() as f64)
    }

    pub fn residue_count(&self) -> usize {
        self.plddt.len()
    }
}
