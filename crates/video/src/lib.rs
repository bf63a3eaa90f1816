//! Video module - board snapshots to a pixel stream and onto a display.
//!
//! The producer side rasterizes a pinned [`life_core::BoardSnapshot`] into a
//! row-major stream of RGB beats, expanding every cell into a `k x k` block and
//! honoring a ready/valid handshake. Sinks validate frame boundaries and either
//! assemble raw frames ([`FrameAssembler`]) or draw to a terminal
//! ([`TerminalSink`]).
//!
//! Goals:
//! - Keep the producer independent of any display backend
//! - Never skip or repeat a pixel when the consumer stalls
//! - Draw on a terminal with 2 columns per cell to keep cells square-ish

pub mod fb;
pub mod producer;
pub mod stream;
pub mod terminal;

pub use life_core as core;
pub use life_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Palette, Rgb};
pub use producer::{frame_pixels, FramePixels, FrameProducer, PumpStats};
pub use stream::{Beat, FrameAssembler, PixelSink, StreamCursor, StreamError};
pub use terminal::{
    encode_diff_into, encode_full_into, restore_terminal, status_line, TerminalSink,
};
