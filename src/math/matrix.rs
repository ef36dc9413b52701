use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// Dense row-major matrix. Row `j`, column `k` holds the weight of the link
/// from source node `j` to destination node `k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from rows, rejecting ragged input.
    /// An empty row list yields a 0x0 matrix.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        if let Some((idx, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(NetworkError::config(format!(
                "row {idx} has {} columns, expected {cols}",
                row.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    /// Row-vector product `vᵀ·M`: `out[k] = Σ_j v[j] * M[j][k]`.
    ///
    /// `v` must have `rows` elements; the result has `cols` elements.
    pub fn vec_mul(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows);
        let mut out = vec![0.0; self.cols];
        for (row, &x) in self.data.iter().zip(v) {
            for (acc, &w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        out
    }

    /// Column-vector product `M·v`: `out[j] = Σ_k M[j][k] * v[k]`.
    ///
    /// `v` must have `cols` elements; the result has `rows` elements.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        self.data.iter()
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
