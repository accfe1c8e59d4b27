use crate::core::models::confidence::ConfidenceScores;
use crate::core::models::pae::{PaeMatrix, PaeShapeError};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed JSON artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid error matrix: {0}")]
    Shape(#[from] PaeShapeError),
    #[error("Artifact contains no records")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawPae {
    #[serde(alias = "pae")]
    predicted_aligned_error: Vec<Vec<f64>>,
}

// Older releases wrap the record in a single-element list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaeDocument {
    Record(RawPae),
    Wrapped(Vec<RawPae>),
}

#[derive(Debug, Deserialize)]
struct RawScores {
    plddt: Vec<f64>,
    ptm: f64,
    iptm: f64,
}

/// Reads a predicted aligned error artifact.
pub fn read_pae_from(reader: impl Read) -> Result<PaeMatrix, ArtifactError> {
    let raw = match serde_json::from_reader(reader)? {
        PaeDocument::Record(raw) => raw,
        PaeDocument::Wrapped(list) => list.into_iter().next().ok_or(ArtifactError::Empty)?,
    };
    Ok(PaeMatrix::from_rows(raw.predicted_aligned_error)?)
}

pub fn read_pae_path(path: impl AsRef<Path>) -> Result<PaeMatrix, ArtifactError> {
    read_pae_from(BufReader::new(File::open(path)?))
}

/// Reads a confidence summary artifact (`plddt`, `ptm`, `iptm`).
pub fn read_scores_from(reader: impl Read) -> Result<ConfidenceScores, ArtifactError> {
    let raw: RawScores = serde_json::from_reader(reader)?;
    Ok(ConfidenceScores::new(raw.plddt, raw.ptm, raw.iptm))
}

pub fn read_scores_path(path: impl AsRef<Path>) -> Result<ConfidenceScores, ArtifactError> {
    read_scores_from(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pae_record_and_ignores_extra_fields() {
        let json = r#"{"predicted_aligned_error": [[0.25, 4.0], [6.5, 0.25]], "max_predicted_aligned_error": 31.75}"#;
        let pae = read_pae_from(json.as_bytes()).unwrap();
        assert_eq!(pae.dim(), 2);
        assert_eq!(pae.get(0, 1), Some(4.0));
        assert_eq!(pae.get(1, 0), Some(6.5));
    }

    #[test]
    fn reads_pae_under_short_key() {
        let json = r#"{"pae": [[0.5, 2.0], [3.0, 0.5]]}"#;
        let pae = read_pae_from(json.as_bytes()).unwrap();
        assert_eq!(pae.get(0, 1), Some(2.0));
        assert_eq!(pae.get(1, 0), Some(3.0));
    }

    #[test]
    fn reads_wrapped_pae_record() {
        let json = r#"[{"predicted_aligned_error": [[1.0]]}]"#;
        let pae = read_pae_from(json.as_bytes()).unwrap();
        assert_eq!(pae.dim(), 1);
    }

    #[test]
    fn empty_wrapped_pae_is_rejected() {
        let err = read_pae_from("[]".as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::Empty));
    }

    #[test]
    fn non_square_pae_is_rejected() {
        let json = r#"{"predicted_aligned_error": [[1.0, 2.0], [3.0]]}"#;
        let err = read_pae_from(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::Shape(_)));
    }

    #[test]
    fn reads_scores_and_ignores_extra_fields() {
        let json = r#"{"max_pae": 31.75, "pae": [[0.0]], "plddt": [88.0, 92.0], "ptm": 0.81, "iptm": 0.74}"#;
        let scores = read_scores_from(json.as_bytes()).unwrap();
        assert_eq!(scores.plddt, vec![88.0, 92.0]);
        assert_eq!(scores.ptm, 0.81);
        assert_eq!(scores.iptm, 0.74);
    }

    #[test]
    fn scores_without_iptm_are_rejected() {
        let json = r#"{"plddt": [88.0], "ptm": 0.81}"#;
        let err = read_scores_from(json.as_bytes()).unwrap_err();
        assert!(matches!(err, ArtifactError::Json(_)));
    }
}
