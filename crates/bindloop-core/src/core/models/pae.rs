use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaeShapeError {
    #[error("Predicted aligned error matrix is empty")]
    Empty,
    #[error("Predicted aligned error matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Predicted aligned error between residue pairs.
///
/// Entry `(i, j)` is the expected position error of residue `j` when the prediction is
/// aligned on residue `i`. The matrix is square but not symmetric, so both orderings of a
/// residue pair carry independent information.
#[derive(Debug, Clone, PartialEq)]
pub struct PaeMatrix {
    values: DMatrix<f64>,
}

impl PaeMatrix {
    /// Builds the matrix from row-major nested rows as emitted by the prediction tool.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, PaeShapeError> {
        let dim = rows.len();
        if dim == 0 {
            return Err(PaeShapeError::Empty);
        }
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(PaeShapeError::NotSquare {
                row,
                len: values.len(),
                expected: dim,
            });
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Ok(Self {
            values: DMatrix::from_row_slice(dim, dim, &flat),
        })
    }

    /// Number of residues covered by the matrix.
    pub fn dim(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, aligned_on: usize, scored: usize) -> Option<f64> {
        self.values.get((aligned_on, scored)).copied()
    }
}
