//! Input module - raw key edges to controller commands.
//!
//! This module is independent of the runtime. It maps `crossterm` key events
//! into raw [`crate::types::KeyId`] edges and classifies those edges into
//! [`crate::types::Command`]s, including short/long press discrimination for
//! sources that report hold state (and a release timeout for those that don't).

pub mod classifier;
pub mod map;
pub mod press;

pub use life_types as types;

pub use classifier::{HoldBinding, InputClassifier, MAX_HOLD_CONTROLS};
pub use map::{key_id, raw_event, should_quit, EdgeReporting};
pub use press::{PressKind, PressTracker};
