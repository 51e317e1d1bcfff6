use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Sparse user-item interaction matrix in compressed sparse row form. Rows are
/// internal user indices, columns internal item indices, values interaction
/// weights. Immutable after load; queries only ever borrow rows from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrMatrix {
    pub n_rows: usize,
    pub n_cols: usize,
    pub indptr: Vec<usize>,
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

/// Borrowed view of one matrix row: the column indices the user interacted
/// with and the matching weights.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f32],
}

impl<'a> SparseRow<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + 'a {
        self.indices
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

impl CsrMatrix {
    /// Structural invariants checked once at load. A matrix that fails any of
    /// these is a corrupt artifact and the load is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.indptr.len() != self.n_rows + 1 {
            return Err(anyhow!(
                "indptr length {} does not match {} rows",
                self.indptr.len(),
                self.n_rows
            ));
        }

        if self.indptr.first() != Some(&0) {
            return Err(anyhow!("indptr must start at 0"));
        }

        if self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(anyhow!("indptr must be non-decreasing"));
        }

        let nnz = *self.indptr.last().unwrap_or(&0);
        if self.indices.len() != nnz || self.values.len() != nnz {
            return Err(anyhow!(
                "index/value storage ({}/{}) does not match indptr extent {}",
                self.indices.len(),
                self.values.len(),
                nnz
            ));
        }

        if let Some(&col) = self.indices.iter().find(|&&col| col >= self.n_cols) {
            return Err(anyhow!(
                "column index {} out of range for {} columns",
                col,
                self.n_cols
            ));
        }

        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(anyhow!("interaction weights contain NaN or infinity"));
        }

        Ok(())
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Row view for an internal user index, or `None` past the row bound.
    pub fn row(&self, row: usize) -> Option<SparseRow<'_>> {
        if row >= self.n_rows {
            return None;
        }

        let start = self.indptr[row];
        let end = self.indptr[row + 1];
        Some(SparseRow {
            indices: &self.indices[start..end],
            values: &self.values[start..end],
        })
    }
}
