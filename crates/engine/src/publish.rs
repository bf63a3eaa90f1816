//! Snapshot publication: one writer (the control loop), any number of readers.
//!
//! Readers always get a whole `Arc<BoardSnapshot>`; there is no way to observe a
//! partially updated board.

use std::sync::Arc;

use tokio::sync::watch;

use crate::core::BoardSnapshot;

pub fn snapshot_channel(initial: BoardSnapshot) -> (SnapshotPublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (SnapshotPublisher { tx }, SnapshotReader { rx })
}

#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Arc<BoardSnapshot>>,
}

impl SnapshotPublisher {
    pub fn publish(&self, snapshot: BoardSnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    pub fn subscribe(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<BoardSnapshot>>,
}

impl SnapshotReader {
    /// Latest published snapshot
    pub fn latest(&self) -> Arc<BoardSnapshot> {
        Arc::clone(&self.rx.borrow())
    }

    /// Wait for a snapshot newer than the last one seen by this reader.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Arc<BoardSnapshot>> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }
}
