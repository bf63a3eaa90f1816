//! Controller state machine - edit / run orchestration
//!
//! The controller owns the board, the cursor and the generation counter. It
//! applies classified [`Command`]s according to the active [`Mode`] and
//! advances generations either on request (RunningSingle) or on a fixed
//! cadence driven by [`Controller::tick`] (RunningContinuous).
//!
//! ```text
//!            Confirm                  ToggleContinuous
//! Editing ───────────▶ RunningSingle ◀───────────────▶ RunningContinuous
//!    ▲                      │                                │
//!    └────── Reset ─────────┴────────────── Reset ───────────┘
//! ```

use std::sync::Arc;

use crate::board::{Board, BoardError};
use crate::evolution::Evolution;
use crate::snapshot::BoardSnapshot;
use crate::types::{Command, Cursor, Mode};

/// What applying a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Command is not meaningful in the current mode
    Ignored,
    CursorMoved(Cursor),
    CellToggled { cursor: Cursor, alive: bool },
    ModeChanged(Mode),
    /// A generation was produced; carries the new counter value
    Advanced(u64),
    Reset,
    Shutdown,
}

impl Outcome {
    /// Whether readers should be handed a new snapshot
    pub fn changes_view(&self) -> bool {
        !matches!(self, Outcome::Ignored | Outcome::Shutdown)
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    board: Board,
    evolution: Evolution,
    mode: Mode,
    cursor: Cursor,
    generation: u64,
    /// Continuous-mode cadence
    generation_ms: u32,
    /// Time accumulated towards the next automatic generation
    cadence_timer_ms: u32,
    shutdown: bool,
}

impl Controller {
    /// Create a controller with an all-dead board, editing at the origin.
    pub fn new(rows: u16, cols: u16, generation_ms: u32) -> Self {
        Self {
            board: Board::new(rows, cols),
            evolution: Evolution::new(rows, cols),
            mode: Mode::Editing,
            cursor: Cursor::default(),
            generation: 0,
            generation_ms: generation_ms.max(1),
            cadence_timer_ms: 0,
            shutdown: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Apply one classified command.
    ///
    /// Errors are board contract violations and mean the controller state can no
    /// longer be trusted.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, BoardError> {
        if command == Command::Shutdown {
            self.shutdown = true;
            return Ok(Outcome::Shutdown);
        }
        if command == Command::Reset {
            self.reset();
            return Ok(Outcome::Reset);
        }

        match (self.mode, command) {
            (Mode::Editing, Command::Move(dir)) => {
                let next = self
                    .cursor
                    .step(dir, self.board.rows(), self.board.cols());
                if next == self.cursor {
                    return Ok(Outcome::Ignored);
                }
                self.cursor = next;
                Ok(Outcome::CursorMoved(next))
            }
            (Mode::Editing, Command::ToggleCell) => {
                let alive = self
                    .board
                    .toggle(self.cursor.row as usize, self.cursor.col as usize)?;
                Ok(Outcome::CellToggled {
                    cursor: self.cursor,
                    alive,
                })
            }
            (Mode::Editing, Command::Confirm) => {
                // The drawn board becomes generation 0.
                self.generation = 0;
                self.mode = Mode::RunningSingle;
                Ok(Outcome::ModeChanged(self.mode))
            }
            (Mode::RunningSingle, Command::ToggleCell) => {
                self.advance()?;
                Ok(Outcome::Advanced(self.generation))
            }
            (Mode::RunningSingle, Command::ToggleContinuous) => {
                self.mode = Mode::RunningContinuous;
                self.cadence_timer_ms = 0;
                Ok(Outcome::ModeChanged(self.mode))
            }
            (Mode::RunningContinuous, Command::ToggleContinuous) => {
                self.mode = Mode::RunningSingle;
                self.cadence_timer_ms = 0;
                Ok(Outcome::ModeChanged(self.mode))
            }
            _ => Ok(Outcome::Ignored),
        }
    }

    /// Advance the continuous-mode cadence by `elapsed_ms`.
    ///
    /// Returns the number of generations produced (0 outside RunningContinuous).
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<u32, BoardError> {
        if self.mode != Mode::RunningContinuous || self.shutdown {
            return Ok(0);
        }

        self.cadence_timer_ms = self.cadence_timer_ms.saturating_add(elapsed_ms);
        let mut produced = 0;
        while self.cadence_timer_ms >= self.generation_ms {
            self.cadence_timer_ms -= self.generation_ms;
            self.advance()?;
            produced += 1;
        }
        Ok(produced)
    }

    /// Run the evolution engine once. All-or-nothing: the board is only replaced
    /// after the whole next generation has been computed.
    fn advance(&mut self) -> Result<(), BoardError> {
        self.evolution.advance(&mut self.board)?;
        self.generation += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.board.clear();
        self.generation = 0;
        self.cadence_timer_ms = 0;
        self.mode = Mode::Editing;
    }

    /// Immutable snapshot for readers.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: Arc::new(self.board.clone()),
            mode: self.mode,
            cursor: (self.mode == Mode::Editing).then_some(self.cursor),
            generation: self.generation,
        }
    }

    /// Replace the board for tests and demos. Dimensions must match.
    pub fn load_board(&mut self, mut board: Board) -> Result<(), BoardError> {
        self.board.swap_with(&mut board)
    }
}
