//! Dense row-major matrix with undefined cells.

use std::ops::Range;

use crate::error::{PlotError, Result};

/// `rows × cols` grid of optional values. `None` marks a cell with no data.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<f64>>,
}

impl Matrix {
    /// Creates a matrix where every cell is undefined.
    pub fn new_undefined(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(PlotError::InvalidArgument(
                "matrix rows have different lengths".into(),
            ));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at `(row, col)`. NaN is reported as undefined.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col].filter(|v| !v.is_nan())
    }

    /// Sets `(row, col)`. Panics if the index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of bounds");
        self.cells[row * self.cols + col] = Some(value);
    }

    /// Number of cells holding a value.
    pub fn defined_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.is_some_and(|v| !v.is_nan()))
            .count()
    }

    /// Copy of a contiguous block of rows.
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Matrix> {
        if range.start > range.end || range.end > self.rows {
            return Err(PlotError::InvalidArgument(format!(
                "row range {range:?} outside 0..{}",
                self.rows
            )));
        }
        Ok(Matrix {
            rows: range.len(),
            cols: self.cols,
            cells: self.cells[range.start * self.cols..range.end * self.cols].to_vec(),
        })
    }
}
