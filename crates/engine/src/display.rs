//! Display loop - streams the latest snapshot to a sink on a fixed cadence.
//!
//! Runs on a blocking thread. Each pass pins one snapshot and pumps it one line
//! at a time, checking the shutdown signal between lines so an in-flight frame
//! can be abandoned promptly.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, error, trace};

use crate::core::BoardSnapshot;
use crate::publish::SnapshotReader;
use crate::shutdown::Shutdown;
use crate::video::{FrameProducer, PixelSink};

/// Sink and counters handed back when the display loop stops.
#[derive(Debug)]
pub struct DisplaySummary<S> {
    pub sink: S,
    pub frames: u64,
    pub abandoned: u64,
}

pub struct DisplayLoop<S> {
    producer: FrameProducer,
    sink: S,
    snapshots: SnapshotReader,
    shutdown: Shutdown,
    refresh: Duration,
    abandoned: u64,
}

impl<S: PixelSink> DisplayLoop<S> {
    pub fn new(
        producer: FrameProducer,
        sink: S,
        snapshots: SnapshotReader,
        shutdown: Shutdown,
        refresh_ms: u64,
    ) -> Self {
        Self {
            producer,
            sink,
            snapshots,
            shutdown,
            refresh: Duration::from_millis(refresh_ms.max(1)),
            abandoned: 0,
        }
    }

    /// Run until shutdown. Sink errors trigger shutdown before being returned.
    pub fn run(mut self) -> Result<DisplaySummary<S>> {
        if let Err(e) = self.run_inner() {
            error!(error = %e, "display loop failed");
            self.shutdown.trigger();
            return Err(e);
        }
        Ok(DisplaySummary {
            frames: self.producer.frames_completed(),
            abandoned: self.abandoned,
            sink: self.sink,
        })
    }

    fn run_inner(&mut self) -> Result<()> {
        while !self.shutdown.is_triggered() {
            let started = Instant::now();
            if !self.stream_frame()? {
                break;
            }
            if let Some(rest) = self.refresh.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        debug!(
            frames = self.producer.frames_completed(),
            abandoned = self.abandoned,
            "display loop stopped"
        );
        Ok(())
    }

    /// Stream one full frame. Returns false if it was abandoned for shutdown.
    fn stream_frame(&mut self) -> Result<bool> {
        let snapshot = self.snapshots.latest();
        self.sink.begin_frame(&snapshot);
        // The producer pins its own copy; the board itself stays shared.
        self.producer.start(BoardSnapshot::clone(&snapshot));

        let line = self
            .producer
            .geometry()
            .map(|(w, _)| w as u64)
            .unwrap_or(1);

        while self.producer.is_busy() {
            if self.shutdown.is_triggered() {
                self.producer.abandon();
                self.sink.frame_abandoned();
                self.abandoned += 1;
                return Ok(false);
            }
            let stats = self.producer.pump(&mut self.sink, line)?;
            if stats.delivered == 0 {
                std::thread::yield_now();
            }
        }
        trace!(generation = snapshot.generation, "frame streamed");
        Ok(true)
    }
}
