use super::confidence::ConfidenceScores;
use super::pae::PaeMatrix;
use super::structure::Structure;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifier shared by all artifacts of one candidate within a round.
///
/// Identifiers order naturally: embedded digit runs compare by numeric value, so
/// `seq_2` sorts before `seq_10`. This is the canonical enumeration order of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialOrd for CandidateId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateId {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0).then_with(|| self.0.cmp(&other.0))
    }
}

/// Compares two strings treating runs of ASCII digits as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();
    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a_chars);
                let right = take_digits(&mut b_chars);
                let ordering = compare_digit_runs(&left, &right);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

fn compare_digit_runs(left: &str, right: &str) -> Ordering {
    let l = left.trim_start_matches('0');
    let r = right.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

/// Opaque, immutable handle to a predicted structure artifact.
///
/// Two handles are equal exactly when they address the same artifact. The handle is what
/// the round controller carries from round to round and hands to the sequence oracle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureRef {
    path: PathBuf,
}

impl StructureRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for StructureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Structure has {structure} residues but the error matrix covers {matrix}")]
    ErrorMatrix { structure: usize, matrix: usize },
    #[error("Structure has {structure} residues but {scores} per-residue confidence values were reported")]
    Confidence { structure: usize, scores: usize },
}

/// One fully loaded candidate whose artifacts are known to be residue-aligned.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    id: CandidateId,
    structure_ref: StructureRef,
    structure: Structure,
    pae: PaeMatrix,
    confidence: ConfidenceScores,
}

impl CandidateRecord {
    /// Bundles the three artifacts of a candidate, checking residue alignment.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError`] if the error matrix or the per-residue confidence does not
    /// cover exactly the structure's residues.
    pub fn new(
        id: CandidateId,
        structure_ref: StructureRef,
        structure: Structure,
        pae: PaeMatrix,
        confidence: ConfidenceScores,
    ) -> Result<Self, AlignmentError> {
        let residues = structure.residue_count();
        if pae.dim() != residues {
            return Err(AlignmentError::ErrorMatrix {
                structure: residues,
                matrix: pae.dim(),
            });
        }
        if confidence.residue_count() != residues {
            return Err(AlignmentError::Confidence {
                structure: residues,
                scores: confidence.residue_count(),
            });
        }
        Ok(Self {
            id,
            structure_ref,
            structure,
            pae,
            confidence,
        })
    }

    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn structure_ref(&self) -> &StructureRef {
        &self.structure_ref
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn pae(&self) -> &PaeMatrix {
        &self.pae
    }

    pub fn confidence(&self) -> &ConfidenceScores {
        &self.confidence
    }
}
