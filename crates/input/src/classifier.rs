//! Input classifier - raw key edges to semantic commands.
//!
//! Keys without a hold binding map straight to their command on the down edge.
//! Keys with a [`HoldBinding`] go through a [`PressTracker`] and produce the
//! binding's short or long command instead. The default binding multiplexes the
//! center control: short press toggles, long press confirms.

use arrayvec::ArrayVec;

use crate::press::{PressKind, PressTracker};
use crate::types::{Command, KeyEdge, KeyId, RawEvent, DEFAULT_LONG_PRESS_MS};

/// Upper bound on controls with short/long discrimination.
pub const MAX_HOLD_CONTROLS: usize = 4;

/// Short/long command pair for one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldBinding {
    pub key: KeyId,
    pub short: Command,
    pub long: Command,
}

impl HoldBinding {
    /// Center control: short press toggles, long press confirms.
    pub const CENTER: HoldBinding = HoldBinding {
        key: KeyId::ToggleCell,
        short: Command::ToggleCell,
        long: Command::Confirm,
    };

    fn command(&self, kind: PressKind) -> Command {
        match kind {
            PressKind::Short => self.short,
            PressKind::Long => self.long,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputClassifier {
    holds: ArrayVec<(HoldBinding, PressTracker), MAX_HOLD_CONTROLS>,
    long_press_ms: u64,
    release_timeout_ms: Option<u64>,
}

impl InputClassifier {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_LONG_PRESS_MS, None)
    }

    /// Classifier with the center binding and the given timings. A release
    /// timeout is only for sources that never report key-up.
    pub fn with_config(long_press_ms: u64, release_timeout_ms: Option<u64>) -> Self {
        Self {
            holds: ArrayVec::new(),
            long_press_ms,
            release_timeout_ms,
        }
        .with_binding(HoldBinding::CENTER)
    }

    /// Add or replace a hold binding. Extra bindings beyond
    /// [`MAX_HOLD_CONTROLS`] are ignored.
    pub fn with_binding(mut self, binding: HoldBinding) -> Self {
        let tracker = PressTracker::new(self.long_press_ms, self.release_timeout_ms);
        if let Some(slot) = self.holds.iter_mut().find(|(b, _)| b.key == binding.key) {
            *slot = (binding, tracker);
        } else {
            let _ = self.holds.try_push((binding, tracker));
        }
        self
    }

    /// True while any hold-bound control is down
    pub fn is_holding(&self) -> bool {
        self.holds.iter().any(|(_, t)| !t.is_idle())
    }

    /// Classify one raw event.
    pub fn on_event(&mut self, event: RawEvent) -> Option<Command> {
        if event.edge == KeyEdge::Tap {
            // Pre-classified source: no hold information, short semantics.
            return Some(match self.binding(event.key) {
                Some(binding) => binding.short,
                None => Command::from_key(event.key),
            });
        }

        if let Some((binding, tracker)) = self.holds.iter_mut().find(|(b, _)| b.key == event.key) {
            let kind = match event.edge {
                KeyEdge::Down => tracker.press(event.at_ms),
                _ => tracker.release(event.at_ms),
            };
            return kind.map(|k| binding.command(k));
        }

        match event.edge {
            KeyEdge::Down => Some(Command::from_key(event.key)),
            _ => None,
        }
    }

    /// Periodic check for held controls.
    pub fn poll(&mut self, now_ms: u64) -> ArrayVec<Command, MAX_HOLD_CONTROLS> {
        let mut commands = ArrayVec::new();
        for (binding, tracker) in self.holds.iter_mut() {
            if let Some(kind) = tracker.poll(now_ms) {
                commands.push(binding.command(kind));
            }
        }
        commands
    }

    pub fn reset(&mut self) {
        for (_, tracker) in self.holds.iter_mut() {
            tracker.reset();
        }
    }

    fn binding(&self, key: KeyId) -> Option<&HoldBinding> {
        self.holds.iter().map(|(b, _)| b).find(|b| b.key == key)
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new()
    }
}
