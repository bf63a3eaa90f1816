//! Core module - board, evolution and controller logic
//!
//! This module contains the Game of Life rules and the edit/run state machine.
//! It has **zero dependencies** on terminals, networking or threads, making it:
//!
//! - **Deterministic**: the same command sequence always yields the same board
//! - **Testable**: every rule and transition is covered by plain unit tests
//! - **Portable**: usable from the threaded runtime, tests or benchmarks alike
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size cell grid with bounds-checked access and wholesale swap
//! - [`evolution`]: non-toroidal Game of Life transition, double-buffered
//! - [`controller`]: Editing / RunningSingle / RunningContinuous state machine
//! - [`snapshot`]: immutable views published to readers
//! - [`config`]: startup configuration
//!
//! # Example
//!
//! ```
//! use life_core::Controller;
//! use life_types::{Command, Direction, Mode};
//!
//! let mut controller = Controller::new(18, 32, 1000);
//!
//! // Draw a cell and start running
//! controller.apply(Command::Move(Direction::Right)).unwrap();
//! controller.apply(Command::ToggleCell).unwrap();
//! controller.apply(Command::Confirm).unwrap();
//! assert_eq!(controller.mode(), Mode::RunningSingle);
//!
//! // A lonely cell dies in the next generation
//! controller.apply(Command::ToggleCell).unwrap();
//! assert_eq!(controller.generation(), 1);
//! assert!(controller.board().is_all_dead());
//! ```

pub mod board;
pub mod config;
pub mod controller;
pub mod evolution;
pub mod snapshot;

pub use life_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError};
pub use config::{ConfigError, LifeConfig};
pub use controller::{Controller, Outcome};
pub use evolution::{live_neighbors, next, next_into, survives, Evolution};
pub use snapshot::BoardSnapshot;
