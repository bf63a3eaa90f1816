//! Key conveyance between input sources and the control loop.
//!
//! A single-slot channel: a sender waits for the slot to drain instead of
//! dropping or overwriting, so events arrive exactly once and in order.

use std::time::Instant;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::types::RawEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("key channel closed")]
pub struct KeyChannelClosed;

/// Create the key channel.
pub fn key_channel() -> (KeySender, KeyReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (KeySender { tx }, KeyReceiver { rx })
}

#[derive(Debug, Clone)]
pub struct KeySender {
    tx: mpsc::Sender<RawEvent>,
}

impl KeySender {
    /// Deliver `event`, waiting while the slot is occupied.
    pub async fn send(&self, event: RawEvent) -> Result<(), KeyChannelClosed> {
        self.tx.send(event).await.map_err(|_| KeyChannelClosed)
    }

    /// Blocking variant for plain threads. Must not be called from async code.
    pub fn blocking_send(&self, event: RawEvent) -> Result<(), KeyChannelClosed> {
        self.tx.blocking_send(event).map_err(|_| KeyChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct KeyReceiver {
    rx: mpsc::Receiver<RawEvent>,
}

impl KeyReceiver {
    pub async fn recv(&mut self) -> Option<RawEvent> {
        self.rx.recv().await
    }
}

/// Monotonic millisecond clock shared by every input source.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
