use std::sync::Arc;

use crate::board::Board;
use crate::types::{Cursor, Mode};

/// Immutable view of the controller published to readers.
///
/// The board is shared behind an `Arc`, so a reader that holds a snapshot keeps
/// seeing exactly that generation no matter what the controller does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub board: Arc<Board>,
    pub mode: Mode,
    /// Only present while editing
    pub cursor: Option<Cursor>,
    pub generation: u64,
}

impl BoardSnapshot {
    /// Startup snapshot: all-dead board, editing, cursor at the origin.
    pub fn initial(rows: u16, cols: u16) -> Self {
        Self {
            board: Arc::new(Board::new(rows, cols)),
            mode: Mode::Editing,
            cursor: Some(Cursor::default()),
            generation: 0,
        }
    }

    pub fn rows(&self) -> u16 {
        self.board.rows()
    }

    pub fn cols(&self) -> u16 {
        self.board.cols()
    }

    /// Whether (row, col) is under the rendered cursor
    pub fn is_cursor(&self, row: u16, col: u16) -> bool {
        self.cursor == Some(Cursor::new(row, col))
    }
}
