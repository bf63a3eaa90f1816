//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the appliance.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (board logic, input classification, video streaming,
//! the remote key link).
//!
//! # Frame Geometry
//!
//! The reference display is a 1280x720 RGB stream. The board is derived from it
//! by dividing each axis by the expansion ratio `k`:
//!
//! - **Rows**: `FRAME_HEIGHT / k` (18 at the default ratio of 40)
//! - **Cols**: `FRAME_WIDTH / k` (32 at the default ratio of 40)
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_LONG_PRESS_MS` | 2000 | Hold time that turns the center control into Confirm |
//! | `DEFAULT_GENERATION_MS` | 1000 | Continuous-mode cadence |
//! | `DEFAULT_REFRESH_MS` | 33 | Display refresh cadence (~30 Hz) |
//! | `DEFAULT_POLL_MS` | 10 | Controller poll tick |
//!
//! # Key Words
//!
//! Keys travel over word-oriented transports as `u32` values:
//!
//! | Word | Key | Boundary name |
//! |------|-----|---------------|
//! | 0 | Escape | `esc` |
//! | 1 | Up | `up` |
//! | 2 | Down | `down` |
//! | 3 | Left | `left` |
//! | 4 | Right | `right` |
//! | 5 | ToggleCell | `space` |
//! | 6 | ToggleContinuous | `c` |
//! | 7 | Confirm | `enter` |
//! | 8 | Reset | `backspace` |
//!
//! # Examples
//!
//! ```
//! use life_types::{KeyId, Mode, FRAME_HEIGHT, FRAME_WIDTH, DEFAULT_EXPANSION_RATIO};
//!
//! // Decode a key word
//! assert_eq!(KeyId::from_code(5), Some(KeyId::ToggleCell));
//! assert_eq!(KeyId::from_code(42), None);
//!
//! // Boundary names are case-insensitive
//! assert_eq!(KeyId::from_name("Enter"), Some(KeyId::Confirm));
//!
//! // Default grid
//! assert_eq!(FRAME_HEIGHT / DEFAULT_EXPANSION_RATIO as u32, 18);
//! assert_eq!(FRAME_WIDTH / DEFAULT_EXPANSION_RATIO as u32, 32);
//!
//! assert_eq!(Mode::default(), Mode::Editing);
//! ```

/// Reference frame width in pixels
pub const FRAME_WIDTH: u32 = 1280;

/// Reference frame height in pixels
pub const FRAME_HEIGHT: u32 = 720;

/// Pixels per cell edge, per axis
pub const DEFAULT_EXPANSION_RATIO: u16 = 40;

/// Short/long press threshold in milliseconds
pub const DEFAULT_LONG_PRESS_MS: u64 = 2000;

/// Continuous-mode generation cadence in milliseconds
pub const DEFAULT_GENERATION_MS: u32 = 1000;

/// Display refresh cadence in milliseconds
pub const DEFAULT_REFRESH_MS: u64 = 33;

/// Controller poll tick in milliseconds
pub const DEFAULT_POLL_MS: u64 = 10;

/// Raw key identifiers from the closed input enumeration.
///
/// Physical key names are mapped onto these at the boundary; everything past
/// the boundary only sees `KeyId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    Escape,
    Up,
    Down,
    Left,
    Right,
    /// The "center" control. Short press toggles, long press confirms.
    ToggleCell,
    ToggleContinuous,
    Confirm,
    Reset,
}

impl KeyId {
    /// All identifiers in word order
    pub const ALL: [KeyId; 9] = [
        KeyId::Escape,
        KeyId::Up,
        KeyId::Down,
        KeyId::Left,
        KeyId::Right,
        KeyId::ToggleCell,
        KeyId::ToggleContinuous,
        KeyId::Confirm,
        KeyId::Reset,
    ];

    /// Decode a transport word
    ///
    /// # Examples
    ///
    /// ```
    /// use life_types::KeyId;
    ///
    /// assert_eq!(KeyId::from_code(0), Some(KeyId::Escape));
    /// assert_eq!(KeyId::from_code(8), Some(KeyId::Reset));
    /// assert_eq!(KeyId::from_code(99), None);
    /// ```
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Encode as a transport word
    pub fn code(&self) -> u32 {
        match self {
            KeyId::Escape => 0,
            KeyId::Up => 1,
            KeyId::Down => 2,
            KeyId::Left => 3,
            KeyId::Right => 4,
            KeyId::ToggleCell => 5,
            KeyId::ToggleContinuous => 6,
            KeyId::Confirm => 7,
            KeyId::Reset => 8,
        }
    }

    /// Parse a boundary key name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use life_types::KeyId;
    ///
    /// assert_eq!(KeyId::from_name("esc"), Some(KeyId::Escape));
    /// assert_eq!(KeyId::from_name("SPACE"), Some(KeyId::ToggleCell));
    /// assert_eq!(KeyId::from_name("backspace"), Some(KeyId::Reset));
    /// assert_eq!(KeyId::from_name("tab"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "esc" | "escape" => Some(KeyId::Escape),
            "up" => Some(KeyId::Up),
            "down" => Some(KeyId::Down),
            "left" => Some(KeyId::Left),
            "right" => Some(KeyId::Right),
            "space" => Some(KeyId::ToggleCell),
            "c" => Some(KeyId::ToggleContinuous),
            "enter" => Some(KeyId::Confirm),
            "backspace" => Some(KeyId::Reset),
            _ => None,
        }
    }

    /// Boundary key name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyId::Escape => "esc",
            KeyId::Up => "up",
            KeyId::Down => "down",
            KeyId::Left => "left",
            KeyId::Right => "right",
            KeyId::ToggleCell => "space",
            KeyId::ToggleContinuous => "c",
            KeyId::Confirm => "enter",
            KeyId::Reset => "backspace",
        }
    }
}

/// Edge reported by an input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    /// Key went down (or auto-repeated while held)
    Down,
    /// Key was released
    Up,
    /// Key-down from a source that never reports hold state
    Tap,
}

/// A timestamped raw input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub key: KeyId,
    pub edge: KeyEdge,
    /// Milliseconds on the appliance clock
    pub at_ms: u64,
}

impl RawEvent {
    pub fn down(key: KeyId, at_ms: u64) -> Self {
        Self {
            key,
            edge: KeyEdge::Down,
            at_ms,
        }
    }

    pub fn up(key: KeyId, at_ms: u64) -> Self {
        Self {
            key,
            edge: KeyEdge::Up,
            at_ms,
        }
    }

    pub fn tap(key: KeyId, at_ms: u64) -> Self {
        Self {
            key,
            edge: KeyEdge::Tap,
            at_ms,
        }
    }
}

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Semantic commands produced by the input classifier
///
/// These are consumed by the controller state machine. What a command does
/// depends on the active [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Terminal shutdown signal, propagated to the boundary
    Shutdown,
    /// Move the cursor one cell (Editing only)
    Move(Direction),
    /// Flip the cell under the cursor (Editing) or advance one generation (RunningSingle)
    ToggleCell,
    /// Switch between single-step and continuous running
    ToggleContinuous,
    /// Accept the drawn board and start running
    Confirm,
    /// Clear the board and return to Editing
    Reset,
}

impl Command {
    /// Command for a key that needs no press-duration discrimination.
    pub fn from_key(key: KeyId) -> Self {
        match key {
            KeyId::Escape => Command::Shutdown,
            KeyId::Up => Command::Move(Direction::Up),
            KeyId::Down => Command::Move(Direction::Down),
            KeyId::Left => Command::Move(Direction::Left),
            KeyId::Right => Command::Move(Direction::Right),
            KeyId::ToggleCell => Command::ToggleCell,
            KeyId::ToggleContinuous => Command::ToggleContinuous,
            KeyId::Confirm => Command::Confirm,
            KeyId::Reset => Command::Reset,
        }
    }
}

/// Controller mode. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Editing,
    RunningSingle,
    RunningContinuous,
}

impl Mode {
    /// snake_case name (for logs and the link protocol)
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Editing => "editing",
            Mode::RunningSingle => "running_single",
            Mode::RunningContinuous => "running_continuous",
        }
    }
}

/// Cursor position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    pub row: u16,
    pub col: u16,
}

impl Cursor {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Step one cell, clamped to a `rows x cols` grid. Moving off an edge is a no-op.
    pub fn step(self, dir: Direction, rows: u16, cols: u16) -> Self {
        let mut next = self;
        match dir {
            Direction::Up => next.row = self.row.saturating_sub(1),
            Direction::Down => {
                if self.row + 1 < rows {
                    next.row = self.row + 1;
                }
            }
            Direction::Left => next.col = self.col.saturating_sub(1),
            Direction::Right => {
                if self.col + 1 < cols {
                    next.col = self.col + 1;
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_matches_reference_frame() {
        assert_eq!(FRAME_WIDTH % DEFAULT_EXPANSION_RATIO as u32, 0);
        assert_eq!(FRAME_HEIGHT % DEFAULT_EXPANSION_RATIO as u32, 0);
    }

    #[test]
    fn key_words_cover_the_closed_enumeration() {
        for code in 0..9u32 {
            let key = KeyId::from_code(code).expect("word in range");
            assert_eq!(key.code(), code);
            assert_eq!(KeyId::from_name(key.as_str()), Some(key));
        }
        assert_eq!(KeyId::from_code(9), None);
        assert_eq!(KeyId::from_name("f1"), None);
    }

    #[test]
    fn cursor_steps_clamp_at_edges() {
        let c = Cursor::new(0, 0);
        assert_eq!(c.step(Direction::Up, 4, 4), c);
        assert_eq!(c.step(Direction::Left, 4, 4), c);
        assert_eq!(c.step(Direction::Down, 4, 4), Cursor::new(1, 0));

        let c = Cursor::new(3, 3);
        assert_eq!(c.step(Direction::Down, 4, 4), c);
        assert_eq!(c.step(Direction::Right, 4, 4), c);
    }
}
