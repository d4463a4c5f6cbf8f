use crate::error::{LinfitError, LinfitResult};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense two-dimensional matrix of `f64` values.
///
/// Stores data in a flat contiguous `Vec<f64>` with row-major layout, so a
/// row is always a contiguous slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl Matrix {
    /// Create a matrix from row-major data.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> LinfitResult<Self> {
        if data.len() != rows * cols {
            return Err(LinfitError::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![data.len()],
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix from a nested slice of equally long rows.
    pub fn from_vec2d(data: &[Vec<f64>]) -> LinfitResult<Self> {
        if data.is_empty() {
            return Ok(Matrix::zeros(0, 0));
        }
        let rows = data.len();
        let cols = data[0].len();
        if let Some(bad) = data.iter().find(|r| r.len() != cols) {
            return Err(LinfitError::ShapeMismatch {
                expected: vec![rows, cols],
                got: vec![rows, bad.len()],
            });
        }
        let flat: Vec<f64> = data.iter().flat_map(|r| r.iter().copied()).collect();
        Matrix::new(flat, rows, cols)
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.cols, "column {} out of bounds ({})", col, self.cols);
        self.data[row * self.cols + col]
    }

    /// Overwrite the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(col < self.cols, "column {} out of bounds ({})", col, self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// Borrow row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Copy column `j` out of the matrix.
    pub fn column(&self, j: usize) -> LinfitResult<Vec<f64>> {
        if j >= self.cols {
            return Err(LinfitError::InvalidRange {
                from: j,
                to: j + 1,
            });
        }
        Ok((0..self.rows).map(|i| self.data[i * self.cols + j]).collect())
    }

    // ─── Slicing ────────────────────────────────────────────────────────────

    /// Copy rows `[from, to)` into a new matrix.
    pub fn row_range(&self, from: usize, to: usize) -> LinfitResult<Matrix> {
        if to <= from || to > self.rows {
            return Err(LinfitError::InvalidRange { from, to });
        }
        let data = self.data[from * self.cols..to * self.cols].to_vec();
        Matrix::new(data, to - from, self.cols)
    }

    /// Copy columns `[from, to)` of every row into a new matrix.
    pub fn column_range(&self, from: usize, to: usize) -> LinfitResult<Matrix> {
        if to <= from || to > self.cols {
            return Err(LinfitError::InvalidRange { from, to });
        }
        let width = to - from;
        let mut data = Vec::with_capacity(self.rows * width);
        for row in self.iter_rows() {
            data.extend_from_slice(&row[from..to]);
        }
        Matrix::new(data, self.rows, width)
    }

    /// First `n` rows (or all of them when the matrix is shorter).
    pub fn head(&self, n: usize) -> Matrix {
        let n = n.min(self.rows);
        Matrix {
            data: self.data[..n * self.cols].to_vec(),
            rows: n,
            cols: self.cols,
        }
    }

    /// Swap two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let cols = self.cols;
        let (left, right) = self.data.split_at_mut(hi * cols);
        left[lo * cols..(lo + 1) * cols].swap_with_slice(&mut right[..cols]);
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            write!(f, "{:5}  ", i + 1)?;
            for v in row {
                write!(f, "{:6.2}  ", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
