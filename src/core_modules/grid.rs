// THEORY:
// The `Grid` is the engine's equivalent of a frame buffer: a rectangle of
// characters stored as one flat, row-major `Vec<char>` with explicit extents.
//
// Key architectural principles:
// 1.  **Single Index Function**: every read goes through `index`, which maps
//     (row, col) to a flat offset and returns `None` outside the extents. There
//     is no other path into the buffer, so an out-of-range read cannot happen
//     silently.
// 2.  **Immutability**: extents are fixed at construction and no method hands
//     out mutable access. A `Grid` can be shared behind an `Arc` across any
//     number of scanning workers without locking.
// 3.  **Windows, not views**: `window` copies a sub-rectangle into a new `Grid`
//     after checking that it fits. This is the slicing step of a scan and the
//     single place where `OutOfBounds` originates.

use crate::core_modules::coordinate::coordinate::Cell;
use crate::error::{Result, SnapperError};
use std::fmt;

/// An immutable rectangle of characters in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns; identical for every row.
    cols: usize,
    /// The flattened cells, `rows * cols` long.
    cells: Vec<char>,
}

impl Grid {
    /// Builds a grid from a flat row-major buffer.
    pub fn new(rows: usize, cols: usize, cells: Vec<char>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SnapperError::MalformedGrid(format!(
                "extents must be non-zero, got {rows}x{cols}"
            )));
        }
        let Some(expected) = rows.checked_mul(cols) else {
            return Err(SnapperError::MalformedGrid(format!(
                "extents {rows}x{cols} overflow"
            )));
        };
        if cells.len() != expected {
            return Err(SnapperError::MalformedGrid(format!(
                "expected {expected} cells for {rows}x{cols}, found {}",
                cells.len()
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    /// Builds a grid from nested rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<char>>) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(SnapperError::MalformedGrid("no rows".to_string()));
        };
        let cols = first.len();
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(SnapperError::MalformedGrid(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Self::new(row_count, cols, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major flat offset of a cell, or `None` outside the extents.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.index(row, col).map(|i| self.cells[i])
    }

    #[inline]
    pub fn at(&self, cell: Cell) -> Option<char> {
        self.get(cell.row, cell.col)
    }

    /// Iterates one row's characters.
    pub fn row(&self, row: usize) -> Option<&[char]> {
        let start = self.index(row, 0)?;
        Some(&self.cells[start..start + self.cols])
    }

    /// Copies the `rows x cols` rectangle whose top-left corner is at
    /// (`row_offset`, `col_offset`).
    pub fn window(
        &self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Grid> {
        if !self.fits(row_offset, col_offset, rows, cols) {
            return Err(SnapperError::OutOfBounds {
                row_offset,
                col_offset,
                rows,
                cols,
                grid_rows: self.rows,
                grid_cols: self.cols,
            });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for r in row_offset..row_offset + rows {
            let start = r * self.cols + col_offset;
            cells.extend_from_slice(&self.cells[start..start + cols]);
        }
        Grid::new(rows, cols, cells)
    }

    /// Whether a `rows x cols` window at the given offset lies inside the grid.
    pub fn fits(&self, row_offset: usize, col_offset: usize, rows: usize, cols: usize) -> bool {
        match (row_offset.checked_add(rows), col_offset.checked_add(cols)) {
            (Some(bottom), Some(right)) => bottom <= self.rows && right <= self.cols,
            _ => false,
        }
    }

    pub fn dimensions(&self) -> String {
        format!("Grid Size (Rows x Cols = {},{})", self.rows, self.cols)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for c in row {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
