//! Frame producer - rasterizes a board snapshot into a pixel stream.
//!
//! The producer walks the frame row-major and expands every cell into a
//! `k x k` block. It is clocked: each [`FrameProducer::clock`] call is one
//! handshake cycle. A beat is only delivered in a cycle where the consumer is
//! ready; otherwise the producer keeps presenting the same beat at the same
//! position, so a stall never skips or repeats a pixel.
//!
//! The snapshot is pinned for the whole pass. Publishing a new generation while
//! a frame is in flight does not affect that frame.

use life_core::BoardSnapshot;

use crate::fb::{Palette, Rgb};
use crate::stream::{Beat, PixelSink, StreamError};

#[derive(Debug, Clone)]
struct ActiveFrame {
    snapshot: BoardSnapshot,
    width: u32,
    height: u32,
    x: u32,
    y: u32,
}

/// Result of a [`FrameProducer::pump`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpStats {
    pub delivered: u64,
    pub stalled: u64,
    /// The frame finished during this call
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct FrameProducer {
    ratio: u16,
    palette: Palette,
    frame: Option<ActiveFrame>,
    frames_started: u64,
    frames_completed: u64,
}

impl FrameProducer {
    pub fn new(ratio: u16, palette: Palette) -> Self {
        assert!(ratio > 0, "expansion ratio must be non-zero");
        Self {
            ratio,
            palette,
            frame: None,
            frames_started: 0,
            frames_completed: 0,
        }
    }

    pub fn ratio(&self) -> u16 {
        self.ratio
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Begin a pass over `snapshot`.
    ///
    /// Returns false (and leaves the current pass untouched) if a frame is
    /// already in flight.
    pub fn start(&mut self, snapshot: BoardSnapshot) -> bool {
        if self.frame.is_some() {
            return false;
        }
        let k = self.ratio as u32;
        self.frame = Some(ActiveFrame {
            width: snapshot.cols() as u32 * k,
            height: snapshot.rows() as u32 * k,
            snapshot,
            x: 0,
            y: 0,
        });
        self.frames_started += 1;
        true
    }

    pub fn is_busy(&self) -> bool {
        self.frame.is_some()
    }

    /// Pixel position of the beat currently presented
    pub fn position(&self) -> Option<(u32, u32)> {
        self.frame.as_ref().map(|f| (f.x, f.y))
    }

    /// Generation of the snapshot being streamed
    pub fn generation(&self) -> Option<u64> {
        self.frame.as_ref().map(|f| f.snapshot.generation)
    }

    /// Stream dimensions of the frame in flight
    pub fn geometry(&self) -> Option<(u32, u32)> {
        self.frame.as_ref().map(|f| (f.width, f.height))
    }

    pub fn frames_started(&self) -> u64 {
        self.frames_started
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Valid + data: the beat presented this cycle, if any.
    pub fn output(&self) -> Option<Beat> {
        let f = self.frame.as_ref()?;
        let k = self.ratio as u32;
        let (row, col) = ((f.y / k) as u16, (f.x / k) as u16);
        let idx = row as usize * f.snapshot.cols() as usize + col as usize;
        let alive = f.snapshot.board.cells()[idx];
        let pixel: Rgb = self
            .palette
            .color(alive, f.snapshot.is_cursor(row, col));

        let end_of_line = f.x + 1 == f.width;
        Some(Beat {
            pixel,
            start_of_frame: f.x == 0 && f.y == 0,
            end_of_line,
            end_of_frame: end_of_line && f.y + 1 == f.height,
        })
    }

    /// One handshake cycle. Returns the beat transferred, or `None` when idle
    /// or when the consumer was not ready (position held).
    pub fn clock(&mut self, ready: bool) -> Option<Beat> {
        if !ready {
            return None;
        }
        let beat = self.output()?;
        let Some(f) = self.frame.as_mut() else {
            return None;
        };

        f.x += 1;
        if f.x == f.width {
            f.x = 0;
            f.y += 1;
        }
        if beat.end_of_frame {
            self.frame = None;
            self.frames_completed += 1;
        }
        Some(beat)
    }

    /// Run up to `max_cycles` handshake cycles against `sink`.
    pub fn pump<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        max_cycles: u64,
    ) -> Result<PumpStats, StreamError> {
        let mut stats = PumpStats::default();
        for _ in 0..max_cycles {
            if self.frame.is_none() {
                break;
            }
            let ready = sink.ready();
            match self.clock(ready) {
                Some(beat) => {
                    stats.delivered += 1;
                    sink.accept(beat)?;
                    if beat.end_of_frame {
                        stats.complete = true;
                        break;
                    }
                }
                None => stats.stalled += 1,
            }
        }
        Ok(stats)
    }

    /// Drop the frame in flight. Returns true if there was one.
    pub fn abandon(&mut self) -> bool {
        self.frame.take().is_some()
    }
}

/// Always-ready iterator over one full frame.
#[derive(Debug, Clone)]
pub struct FramePixels {
    producer: FrameProducer,
}

impl Iterator for FramePixels {
    type Item = Beat;

    fn next(&mut self) -> Option<Beat> {
        self.producer.clock(true)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match (self.producer.geometry(), self.producer.position()) {
            (Some((w, h)), Some((x, y))) => {
                (w as usize * h as usize) - (y as usize * w as usize + x as usize)
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FramePixels {}

/// Rasterize one snapshot as an iterator of beats.
pub fn frame_pixels(snapshot: BoardSnapshot, ratio: u16, palette: Palette) -> FramePixels {
    let mut producer = FrameProducer::new(ratio, palette);
    producer.start(snapshot);
    FramePixels { producer }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::Board;
    use std::sync::Arc;

    fn snapshot(rows: &[&str]) -> BoardSnapshot {
        BoardSnapshot {
            board: Arc::new(Board::from_rows(rows).unwrap()),
            mode: life_core::types::Mode::RunningSingle,
            cursor: None,
            generation: 0,
        }
    }

    #[test]
    fn block_expansion_row_major() {
        let palette = Palette::default();
        let beats: Vec<Beat> = frame_pixels(snapshot(&["#.", ".#"]), 2, palette).collect();
        assert_eq!(beats.len(), 16);

        let expect = |alive: bool| palette.color(alive, false);
        // First line: cell (0,0) twice then cell (0,1) twice.
        assert_eq!(beats[0].pixel, expect(true));
        assert_eq!(beats[1].pixel, expect(true));
        assert_eq!(beats[2].pixel, expect(false));
        assert_eq!(beats[3].pixel, expect(false));
        // Last line belongs to board row 1.
        assert_eq!(beats[12].pixel, expect(false));
        assert_eq!(beats[15].pixel, expect(true));

        assert!(beats[0].start_of_frame);
        assert_eq!(beats.iter().filter(|b| b.start_of_frame).count(), 1);
        assert_eq!(beats.iter().filter(|b| b.end_of_line).count(), 4);
        assert!(beats[15].end_of_frame);
        assert_eq!(beats.iter().filter(|b| b.end_of_frame).count(), 1);
    }

    #[test]
    fn start_is_ignored_while_busy() {
        let mut p = FrameProducer::new(1, Palette::default());
        assert!(p.start(snapshot(&["#"])));
        assert!(!p.start(snapshot(&["."])));
        let beat = p.clock(true).unwrap();
        assert_eq!(beat.pixel, Palette::default().alive);
        assert!(!p.is_busy());
        assert_eq!(p.frames_completed(), 1);
    }

    #[test]
    fn not_ready_holds_output() {
        let mut p = FrameProducer::new(1, Palette::default());
        p.start(snapshot(&["#.#"]));
        p.clock(true);
        let held = p.output();
        assert_eq!(p.clock(false), None);
        assert_eq!(p.output(), held);
        assert_eq!(p.position(), Some((1, 0)));
    }

    #[test]
    fn size_hint_counts_down() {
        let mut it = frame_pixels(snapshot(&["..", ".."]), 3, Palette::default());
        assert_eq!(it.len(), 36);
        it.next();
        assert_eq!(it.len(), 35);
    }
}
