//! Evolution engine - Game of Life transition rules
//!
//! The grid is finite and non-toroidal: neighbors outside the board count as
//! dead. Every generation is computed from the previous one only; the result
//! is written into a private scratch board and then swapped into place, so an
//! observer never sees a half-updated generation.

use crate::board::{Board, BoardError};

/// Moore neighborhood offsets (row, col)
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Count live neighbors of (row, col). Out-of-bounds neighbors are dead.
#[inline]
pub fn live_neighbors(board: &Board, row: usize, col: usize) -> u8 {
    let (r, c) = (row as isize, col as isize);
    NEIGHBORS
        .iter()
        .filter(|&&(dr, dc)| board.alive_at(r + dr, c + dc))
        .count() as u8
}

/// Conway's rule: survive on 2 or 3, birth on exactly 3.
#[inline]
pub fn survives(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Compute the next generation into `out`.
///
/// `out` must have the same dimensions as `current`; its previous contents are
/// overwritten.
pub fn next_into(current: &Board, out: &mut Board) -> Result<(), BoardError> {
    if current.rows() != out.rows() || current.cols() != out.cols() {
        return Err(BoardError::DimensionMismatch {
            rows: current.rows(),
            cols: current.cols(),
            found_rows: out.rows(),
            found_cols: out.cols(),
        });
    }

    fill_next(current, out);
    Ok(())
}

/// Pure next-generation function.
pub fn next(board: &Board) -> Board {
    let mut out = board.all_dead();
    fill_next(board, &mut out);
    out
}

/// Caller guarantees matching dimensions.
fn fill_next(current: &Board, out: &mut Board) {
    let cols = current.cols() as usize;
    let src = current.cells();
    for (i, slot) in out.cells_mut().iter_mut().enumerate() {
        let (row, col) = (i / cols, i % cols);
        *slot = survives(src[i], live_neighbors(current, row, col));
    }
}

/// Double-buffered evolution engine.
///
/// Owns the scratch buffer so advancing a board does not allocate.
#[derive(Debug, Clone)]
pub struct Evolution {
    scratch: Board,
}

impl Evolution {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            scratch: Board::new(rows, cols),
        }
    }

    /// Replace `board` with its next generation.
    pub fn advance(&mut self, board: &mut Board) -> Result<(), BoardError> {
        next_into(board, &mut self.scratch)?;
        board.swap_with(&mut self.scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table() {
        assert!(!survives(true, 0));
        assert!(!survives(true, 1));
        assert!(survives(true, 2));
        assert!(survives(true, 3));
        assert!(!survives(true, 4));
        assert!(!survives(false, 2));
        assert!(survives(false, 3));
        assert!(!survives(false, 4));
    }

    #[test]
    fn corner_neighbors_ignore_outside() {
        let board = Board::from_rows(&["##", "##"]).unwrap();
        assert_eq!(live_neighbors(&board, 0, 0), 3);
        assert_eq!(live_neighbors(&board, 1, 1), 3);
    }

    #[test]
    fn next_matches_next_into() {
        let board = Board::from_rows(&["#..", ".##", "##."]).unwrap();
        let mut out = Board::new(3, 3);
        next_into(&board, &mut out).unwrap();
        assert_eq!(next(&board), out);
        assert!(next_into(&board, &mut Board::new(2, 3)).is_err());
    }

    #[test]
    fn advance_reuses_scratch() {
        let mut board = Board::from_rows(&[".....", "..#..", "..#..", "..#..", "....."]).unwrap();
        let mut evo = Evolution::new(5, 5);
        evo.advance(&mut board).unwrap();
        assert_eq!(board.to_rows(), [".....", ".....", ".###.", ".....", "....."]);
        evo.advance(&mut board).unwrap();
        assert_eq!(board.to_rows(), [".....", "..#..", "..#..", "..#..", "....."]);
    }

    #[test]
    fn advance_rejects_mismatched_board() {
        let mut board = Board::new(3, 3);
        let mut evo = Evolution::new(4, 4);
        assert!(matches!(
            evo.advance(&mut board),
            Err(BoardError::DimensionMismatch { .. })
        ));
    }
}
