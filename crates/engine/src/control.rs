//! Control loop - classifies key events and drives the controller.
//!
//! Runs as a single tokio task. It is the only owner of the [`Controller`];
//! every state change it makes is published as a fresh snapshot.

use std::time::Duration;

use anyhow::Result;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::channel::{Clock, KeyReceiver};
use crate::core::{Controller, Outcome};
use crate::input::InputClassifier;
use crate::publish::SnapshotPublisher;
use crate::shutdown::Shutdown;
use crate::types::{Command, Mode};

/// Final controller state once the loop has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSummary {
    pub mode: Mode,
    pub generation: u64,
    pub commands: u64,
}

pub struct ControlLoop {
    controller: Controller,
    classifier: InputClassifier,
    keys: KeyReceiver,
    publisher: SnapshotPublisher,
    shutdown: Shutdown,
    clock: Clock,
    poll: Duration,
    commands: u64,
}

impl ControlLoop {
    pub fn new(
        controller: Controller,
        classifier: InputClassifier,
        keys: KeyReceiver,
        publisher: SnapshotPublisher,
        shutdown: Shutdown,
        clock: Clock,
        poll_ms: u64,
    ) -> Self {
        Self {
            controller,
            classifier,
            keys,
            publisher,
            shutdown,
            clock,
            poll: Duration::from_millis(poll_ms.max(1)),
            commands: 0,
        }
    }

    /// Run until shutdown. Any error triggers shutdown before it is returned.
    pub async fn run(mut self) -> Result<ControlSummary> {
        let result = self.run_inner().await;
        self.shutdown.trigger();
        if let Err(e) = &result {
            error!(error = %e, "control loop failed");
        }
        result.map(|()| ControlSummary {
            mode: self.controller.mode(),
            generation: self.controller.generation(),
            commands: self.commands,
        })
    }

    async fn run_inner(&mut self) -> Result<()> {
        self.publisher.publish(self.controller.snapshot());

        let mut ticker = tokio::time::interval(self.poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick_ms = self.clock.now_ms();
        let mut keys_open = true;
        let shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    debug!("control loop observed shutdown");
                    return Ok(());
                }

                event = self.keys.recv(), if keys_open => match event {
                    Some(event) => {
                        debug!(key = event.key.as_str(), edge = ?event.edge, at_ms = event.at_ms, "key event");
                        if let Some(command) = self.classifier.on_event(event) {
                            self.dispatch(command)?;
                        }
                    }
                    None => {
                        warn!("all key senders dropped; input disabled");
                        keys_open = false;
                    }
                },

                _ = ticker.tick() => {
                    let now = self.clock.now_ms();
                    for command in self.classifier.poll(now) {
                        self.dispatch(command)?;
                    }

                    let elapsed = now.saturating_sub(last_tick_ms);
                    last_tick_ms = now;
                    let produced = self
                        .controller
                        .tick(u32::try_from(elapsed).unwrap_or(u32::MAX))?;
                    if produced > 0 {
                        debug!(produced, generation = self.controller.generation(), "cadence advanced");
                        self.publisher.publish(self.controller.snapshot());
                    }
                }
            }

            if self.controller.is_shutdown() {
                info!("shutdown requested");
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        self.commands += 1;
        let outcome = self.controller.apply(command)?;
        match outcome {
            Outcome::ModeChanged(mode) => {
                info!(mode = mode.as_str(), generation = self.controller.generation(), "mode changed");
            }
            Outcome::Reset => info!("board reset"),
            Outcome::Ignored => debug!(?command, mode = self.controller.mode().as_str(), "command ignored"),
            _ => debug!(?command, ?outcome, "command applied"),
        }
        if outcome == Outcome::Reset {
            // A half-held center press must not turn into Confirm on the new board.
            self.classifier.reset();
        }
        if outcome.changes_view() {
            self.publisher.publish(self.controller.snapshot());
        }
        Ok(())
    }
}
