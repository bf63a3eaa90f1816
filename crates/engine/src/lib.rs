//! Engine module - the appliance runtime.
//!
//! Wires the pure pieces together into two concurrent activities:
//!
//! - **control** (tokio task): key events and a periodic poll drive the
//!   [`life_core::Controller`]; every change is published as an immutable
//!   snapshot
//! - **display** (blocking thread): the latest snapshot is streamed to a
//!   [`life_video::PixelSink`] on the refresh cadence
//!
//! Keys enter through a single-slot channel ([`KeySender`]) that applies
//! backpressure instead of dropping. Both activities stop on a shared
//! [`Shutdown`] signal, raised by an Escape key, by any fatal error or by the
//! embedding program.

pub mod channel;
pub mod control;
pub mod display;
pub mod publish;
pub mod shutdown;

pub use life_core as core;
pub use life_input as input;
pub use life_types as types;
pub use life_video as video;

pub use channel::{key_channel, Clock, KeyChannelClosed, KeyReceiver, KeySender};
pub use control::{ControlLoop, ControlSummary};
pub use display::{DisplayLoop, DisplaySummary};
pub use publish::{snapshot_channel, SnapshotPublisher, SnapshotReader};
pub use shutdown::Shutdown;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::{BoardSnapshot, Controller, LifeConfig};
use crate::input::InputClassifier;
use crate::types::Mode;
use crate::video::{FrameProducer, Palette, PixelSink};

/// What a finished run leaves behind.
#[derive(Debug)]
pub struct RunSummary<S> {
    pub sink: S,
    pub mode: Mode,
    pub generation: u64,
    pub commands: u64,
    pub frames: u64,
    pub abandoned_frames: u64,
}

/// A configured appliance, ready to run.
pub struct Appliance {
    config: LifeConfig,
    clock: Clock,
    keys: KeySender,
    key_rx: KeyReceiver,
    publisher: SnapshotPublisher,
    shutdown: Shutdown,
}

impl Appliance {
    pub fn new(config: LifeConfig) -> Self {
        let (keys, key_rx) = key_channel();
        let (publisher, _) = snapshot_channel(BoardSnapshot::initial(config.rows, config.cols));
        Self {
            config,
            clock: Clock::new(),
            keys,
            key_rx,
            publisher,
            shutdown: Shutdown::new(),
        }
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    /// Handle for an input source
    pub fn key_sender(&self) -> KeySender {
        self.keys.clone()
    }

    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    pub fn snapshots(&self) -> SnapshotReader {
        self.publisher.subscribe()
    }

    /// Clock that input sources must use to timestamp events
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Run control and display until shutdown.
    pub async fn run<S>(self, sink: S) -> Result<RunSummary<S>>
    where
        S: PixelSink + Send + 'static,
    {
        let Appliance {
            config,
            clock,
            keys,
            key_rx,
            publisher,
            shutdown,
        } = self;
        // Only external senders keep the key channel open.
        drop(keys);

        info!(
            rows = config.rows,
            cols = config.cols,
            ratio = config.ratio,
            long_press_ms = config.long_press_ms,
            generation_ms = config.generation_ms,
            "appliance starting"
        );

        let display_loop = DisplayLoop::new(
            FrameProducer::new(config.ratio, Palette::default()),
            sink,
            publisher.subscribe(),
            shutdown.clone(),
            config.refresh_ms,
        );
        let display_task = tokio::task::spawn_blocking(move || display_loop.run());

        let control = ControlLoop::new(
            Controller::new(config.rows, config.cols, config.generation_ms),
            InputClassifier::with_config(config.long_press_ms, config.release_timeout_ms),
            key_rx,
            publisher,
            shutdown.clone(),
            clock,
            config.poll_ms,
        );
        let control = control.run().await;
        shutdown.trigger();

        let displayed = display_task.await.context("display thread panicked")?;
        let control = control?;
        let displayed = displayed?;

        info!(
            generation = control.generation,
            frames = displayed.frames,
            "appliance stopped"
        );
        Ok(RunSummary {
            sink: displayed.sink,
            mode: control.mode,
            generation: control.generation,
            commands: control.commands,
            frames: displayed.frames,
            abandoned_frames: displayed.abandoned,
        })
    }
}
