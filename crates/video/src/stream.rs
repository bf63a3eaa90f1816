//! Pixel stream protocol.
//!
//! One [`Beat`] is one pixel transfer. Frames are row-major; the first beat of a
//! frame carries `start_of_frame`, the last beat of every line carries
//! `end_of_line`, and the very last beat also carries `end_of_frame`.
//! Sinks validate the boundaries with a [`StreamCursor`]; any deviation is a
//! [`StreamError`] and is fatal for the stream.

use life_core::BoardSnapshot;
use thiserror::Error;

use crate::fb::Rgb;

/// One pixel transfer on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beat {
    pub pixel: Rgb,
    pub start_of_frame: bool,
    pub end_of_line: bool,
    pub end_of_frame: bool,
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("start-of-frame in the middle of a frame at pixel ({x}, {y})")]
    UnexpectedStart { x: u32, y: u32 },
    #[error("pixel ({x}, {y}) arrived before any start-of-frame")]
    MissingStart { x: u32, y: u32 },
    #[error("end-of-line flag wrong at column {x} of a {width}-pixel line")]
    EndOfLine { x: u32, width: u32 },
    #[error("end-of-frame flag wrong at pixel ({x}, {y})")]
    EndOfFrame { x: u32, y: u32 },
    #[error("sink i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer side of the ready/valid handshake.
pub trait PixelSink {
    /// A pass over `snapshot` is about to start.
    fn begin_frame(&mut self, _snapshot: &BoardSnapshot) {}

    /// Whether the sink takes a beat this cycle
    fn ready(&mut self) -> bool {
        true
    }

    /// Deliver one beat. Only called in a cycle where [`PixelSink::ready`] returned true.
    fn accept(&mut self, beat: Beat) -> Result<(), StreamError>;

    /// The producer gave up on the frame in flight.
    fn frame_abandoned(&mut self) {}
}

/// Tracks the raster position of incoming beats and checks frame boundaries.
#[derive(Debug, Clone)]
pub struct StreamCursor {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    in_frame: bool,
}

impl StreamCursor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
            in_frame: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Validate `beat` and return the pixel position it belongs to.
    pub fn advance(&mut self, beat: &Beat) -> Result<(u32, u32), StreamError> {
        let (x, y) = (self.x, self.y);

        if beat.start_of_frame {
            if self.in_frame {
                return Err(StreamError::UnexpectedStart { x, y });
            }
            self.in_frame = true;
        } else if !self.in_frame {
            return Err(StreamError::MissingStart { x, y });
        }

        let last_col = x + 1 == self.width;
        let last_row = y + 1 == self.height;
        if beat.end_of_line != last_col {
            return Err(StreamError::EndOfLine {
                x,
                width: self.width,
            });
        }
        if beat.end_of_frame != (last_col && last_row) {
            return Err(StreamError::EndOfFrame { x, y });
        }

        if last_col {
            self.x = 0;
            self.y += 1;
        } else {
            self.x += 1;
        }
        if beat.end_of_frame {
            self.reset();
        }
        Ok((x, y))
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
        self.in_frame = false;
    }
}

/// Sink that validates the protocol and assembles frames as flat RGB bytes.
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    cursor: StreamCursor,
    building: Vec<u8>,
    last_frame: Option<Vec<u8>>,
    frames_completed: u64,
}

impl FrameAssembler {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cursor: StreamCursor::new(width, height),
            building: Vec::with_capacity(width as usize * height as usize * 3),
            last_frame: None,
            frames_completed: 0,
        }
    }

    /// The most recently completed frame (RGB triples, row-major)
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Pixels received so far in the frame in flight
    pub fn pixels_in_flight(&self) -> usize {
        self.building.len() / 3
    }

    /// Pixel of the last completed frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let frame = self.last_frame.as_ref()?;
        if x >= self.cursor.width() || y >= self.cursor.height() {
            return None;
        }
        let i = (y as usize * self.cursor.width() as usize + x as usize) * 3;
        Some(Rgb::new(frame[i], frame[i + 1], frame[i + 2]))
    }
}

impl PixelSink for FrameAssembler {
    fn accept(&mut self, beat: Beat) -> Result<(), StreamError> {
        self.cursor.advance(&beat)?;
        self.building.extend_from_slice(&beat.pixel.to_bytes());
        if beat.end_of_frame {
            let done = std::mem::take(&mut self.building);
            if let Some(mut old) = self.last_frame.replace(done) {
                old.clear();
                self.building = old;
            }
            self.frames_completed += 1;
        }
        Ok(())
    }

    fn frame_abandoned(&mut self) {
        self.cursor.reset();
        self.building.clear();
    }
}
