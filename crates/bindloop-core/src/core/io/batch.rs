use crate::core::models::candidate::CandidateId;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Filename conventions that tie the three artifacts of a candidate together.
///
/// The candidate identifier is the part of the filename in front of the structure or
/// scores marker, or in front of the error-matrix suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    pub structure_marker: String,
    pub structure_extension: String,
    pub pae_suffix: String,
    pub scores_marker: String,
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self {
            structure_marker: "_relaxed_rank_001_".to_string(),
            structure_extension: "pdb".to_string(),
            pae_suffix: "_predicted_aligned_error_v1.json".to_string(),
            scores_marker: "_scores_rank_001_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Structure,
    ErrorMatrix,
    Scores,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ArtifactKind::Structure => "structure",
            ArtifactKind::ErrorMatrix => "error matrix",
            ArtifactKind::Scores => "confidence scores",
        })
    }
}

impl ArtifactNaming {
    /// Classifies a filename, returning the artifact kind and the candidate identifier.
    pub fn classify(&self, file_name: &str) -> Option<(ArtifactKind, CandidateId)> {
        let structure_ext = format!(".{}", self.structure_extension);
        if file_name.ends_with(&structure_ext) {
            if let Some(pos) = file_name.find(&self.structure_marker) {
                return Some((ArtifactKind::Structure, CandidateId::new(&file_name[..pos])));
            }
        }
        if let Some(id) = file_name.strip_suffix(&self.pae_suffix) {
            return Some((ArtifactKind::ErrorMatrix, CandidateId::new(id)));
        }
        if file_name.ends_with(".json") {
            if let Some(pos) = file_name.find(&self.scores_marker) {
                return Some((ArtifactKind::Scores, CandidateId::new(&file_name[..pos])));
            }
        }
        None
    }
}

/// The artifact paths found for one candidate. Any of them may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateArtifacts {
    pub id: CandidateId,
    pub structure: Option<PathBuf>,
    pub pae: Option<PathBuf>,
    pub scores: Option<PathBuf>,
}

impl CandidateArtifacts {
    pub fn new(id: CandidateId) -> Self {
        Self {
            id,
            structure: None,
            pae: None,
            scores: None,
        }
    }

    fn slot(&mut self, kind: ArtifactKind) -> &mut Option<PathBuf> {
        match kind {
            ArtifactKind::Structure => &mut self.structure,
            ArtifactKind::ErrorMatrix => &mut self.pae,
            ArtifactKind::Scores => &mut self.scores,
        }
    }
}

/// All candidates of one round, in canonical (natural identifier) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBatch {
    pub dir: PathBuf,
    pub candidates: Vec<CandidateArtifacts>,
}

impl CandidateBatch {
    /// Scans a structure-oracle output directory and groups artifacts by candidate.
    ///
    /// The directory listing order is irrelevant: candidates are ordered by identifier and
    /// duplicate artifacts of one kind resolve to the naturally-first filename.
    pub fn discover(dir: &Path, naming: &ArtifactNaming) -> io::Result<Self> {
        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                files.push((name.to_string(), entry.path()));
            }
        }
        files.sort_by(|a, b| CandidateId::new(&a.0).cmp(&CandidateId::new(&b.0)));

        let mut grouped: BTreeMap<CandidateId, CandidateArtifacts> = BTreeMap::new();
        for (name, path) in files {
            let Some((kind, id)) = naming.classify(&name) else {
                continue;
            };
            let slot = grouped
                .entry(id.clone())
                .or_insert_with(|| CandidateArtifacts::new(id.clone()))
                .slot(kind);
            match slot {
                Some(existing) => warn!(
                    candidate = %id,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "Duplicate {} artifact for candidate.",
                    kind
                ),
                None => *slot = Some(path),
            }
        }

        let candidates: Vec<CandidateArtifacts> = grouped.into_values().collect();
        debug!(
            dir = %dir.display(),
            count = candidates.len(),
            "Discovered candidate batch."
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            candidates,
        })
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
