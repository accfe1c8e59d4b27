use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const HEADER: [&str; 4] = ["round", "candidate", "structure", "loss"];

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("I/O error on summary '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CSV error on summary '{path}': {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// One accepted design in the search trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub round: usize,
    pub candidate: String,
    pub structure: String,
    pub loss: f64,
}

/// Append-only CSV record of every accepted design.
///
/// Each append opens, writes and flushes the file so that the trajectory on disk is
/// complete up to the last accepted round even if the run is interrupted.
#[derive(Debug, Clone)]
pub struct SummaryLog {
    path: PathBuf,
}

impl SummaryLog {
    /// Creates (or truncates) the log and writes the header row.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, SummaryError> {
        let log = Self { path: path.into() };
        let mut writer = csv::Writer::from_path(&log.path).map_err(|e| log.csv_error(e))?;
        writer.write_record(HEADER).map_err(|e| log.csv_error(e))?;
        writer.flush().map_err(|e| log.io_error(e))?;
        Ok(log)
    }

    /// Opens an existing log for appending, creating it if it is missing or empty.
    pub fn open_append(path: impl Into<PathBuf>) -> Result<Self, SummaryError> {
        let path = path.into();
        let has_content = fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);
        if has_content {
            Ok(Self { path })
        } else {
            Self::create(path)
        }
    }

    pub fn append(&self, row: &SummaryRow) -> Result<(), SummaryError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(row).map_err(|e| self.csv_error(e))?;
        writer.flush().map_err(|e| self.io_error(e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SummaryError {
        SummaryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> SummaryError {
        SummaryError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

pub fn read_summary(path: impl AsRef<Path>) -> Result<Vec<SummaryRow>, SummaryError> {
    let path = path.as_ref();
    let to_error = |source| SummaryError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(to_error)?;
    reader
        .deserialize()
        .collect::<Result<Vec<SummaryRow>, _>>()
        .map_err(to_error)
}
