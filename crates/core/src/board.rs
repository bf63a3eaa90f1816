//! Board module - owns the cell grid
//!
//! The board is a `rows x cols` grid of alive/dead cells whose dimensions are
//! fixed at construction. Uses a flat vector in row-major order for cache
//! locality. Coordinates: (row, col) where row ranges `0..rows` (top to bottom)
//! and col ranges `0..cols` (left to right).
//!
//! Every coordinate access is bounds-checked. An out-of-range access is a caller
//! bug and surfaces as [`BoardError::OutOfRange`].

use thiserror::Error;

/// Board contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: u16,
        cols: u16,
    },
    #[error("board is {found_rows}x{found_cols}, expected {rows}x{cols}")]
    DimensionMismatch {
        rows: u16,
        cols: u16,
        found_rows: u16,
        found_cols: u16,
    },
    #[error("pattern row {row}: {reason}")]
    InvalidPattern { row: usize, reason: &'static str },
}

/// The cell grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: u16,
    cols: u16,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<bool>,
}

impl Board {
    /// Create an all-dead board.
    ///
    /// Panics if either dimension is zero; dimensions come from validated config.
    pub fn new(rows: u16, cols: u16) -> Self {
        assert!(rows > 0 && cols > 0, "board dimensions must be non-zero");
        Self {
            rows,
            cols,
            cells: vec![false; rows as usize * cols as usize],
        }
    }

    /// Build a board from ASCII rows, `#` alive and `.` dead.
    pub fn from_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let Some(first) = rows.first() else {
            return Err(BoardError::InvalidPattern {
                row: 0,
                reason: "pattern is empty",
            });
        };
        let width = first.len();
        if width == 0 || width > u16::MAX as usize || rows.len() > u16::MAX as usize {
            return Err(BoardError::InvalidPattern {
                row: 0,
                reason: "unsupported pattern size",
            });
        }

        let mut board = Self::new(rows.len() as u16, width as u16);
        for (r, line) in rows.iter().enumerate() {
            if line.len() != width {
                return Err(BoardError::InvalidPattern {
                    row: r,
                    reason: "row width differs from first row",
                });
            }
            for (c, b) in line.bytes().enumerate() {
                board.cells[r * width + c] = match b {
                    b'#' => true,
                    b'.' => false,
                    _ => {
                        return Err(BoardError::InvalidPattern {
                            row: r,
                            reason: "only '#' and '.' are allowed",
                        })
                    }
                };
            }
        }
        Ok(board)
    }

    /// Render as ASCII rows, `#` alive and `.` dead.
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|&alive| if alive { '#' } else { '.' }).collect())
            .collect()
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row >= self.rows as usize || col >= self.cols as usize {
            return Err(BoardError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols as usize + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        self.index(row, col).map(|i| self.cells[i])
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<(), BoardError> {
        let i = self.index(row, col)?;
        self.cells[i] = alive;
        Ok(())
    }

    /// Flip a cell, returning its new value
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool, BoardError> {
        let i = self.index(row, col)?;
        self.cells[i] = !self.cells[i];
        Ok(self.cells[i])
    }

    /// Signed lookup for neighborhood scans: anything outside the grid is dead.
    #[inline(always)]
    pub fn alive_at(&self, row: isize, col: isize) -> bool {
        if row < 0 || col < 0 || row >= self.rows as isize || col >= self.cols as isize {
            return false;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Replace this board's contents wholesale with `next`.
    ///
    /// The previous contents end up in `next`, which lets a caller keep
    /// ping-ponging between two allocations.
    pub fn swap_with(&mut self, next: &mut Board) -> Result<(), BoardError> {
        if self.rows != next.rows || self.cols != next.cols {
            return Err(BoardError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                found_rows: next.rows,
                found_cols: next.cols,
            });
        }
        std::mem::swap(&mut self.cells, &mut next.cells);
        Ok(())
    }

    /// A fresh all-dead board with the same dimensions
    pub fn all_dead(&self) -> Board {
        Board::new(self.rows, self.cols)
    }

    /// Kill every cell in place
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn is_all_dead(&self) -> bool {
        !self.cells.iter().any(|&alive| alive)
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> Result<&[bool], BoardError> {
        self.index(row, 0)?;
        let start = row * self.cols as usize;
        Ok(&self.cells[start..start + self.cols as usize])
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(3, 4);
        assert_eq!(board.index(0, 0), Ok(0));
        assert_eq!(board.index(0, 3), Ok(3));
        assert_eq!(board.index(1, 0), Ok(4));
        assert_eq!(board.index(2, 3), Ok(11));
        assert!(board.index(3, 0).is_err());
        assert!(board.index(0, 4).is_err());
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new(4, 5);
        board.set(0, 0, true).unwrap();
        board.set(2, 3, true).unwrap();

        assert_eq!(board.get(2, 3), Ok(true));
        assert!(board.cells[0]);
        assert!(board.cells[2 * 5 + 3]);
        assert_eq!(board.alive_count(), 2);
    }

    #[test]
    fn test_alive_at_is_dead_outside() {
        let board = Board::from_rows(&["##", "##"]).unwrap();
        assert!(board.alive_at(0, 0));
        assert!(!board.alive_at(-1, 0));
        assert!(!board.alive_at(0, -1));
        assert!(!board.alive_at(2, 0));
        assert!(!board.alive_at(0, 2));
    }

    #[test]
    fn test_pattern_roundtrip() {
        let rows = [".#.", "#.#", "..."];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.to_rows(), rows);
    }
}
