//! Short/long press discrimination for a single control.
//!
//! Each control runs a small state machine:
//!
//! ```text
//! Idle ──press──▶ Pressed(t0) ──release before threshold──▶ Idle   (Short)
//!                     │
//!                     └──poll/edge past threshold──▶ LongHeld ──release──▶ Idle
//!                                                    (Long, fired once)
//! ```
//!
//! Sources that never emit release edges can opt into a release timeout: a
//! press whose last edge is older than the timeout is auto-released. Sources
//! with real release edges run without one, since an OS auto-repeat delay can
//! exceed any sensible timeout.

/// Classified press duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressed { since_ms: u64, last_seen_ms: u64 },
    LongHeld { last_seen_ms: u64 },
}

/// Press state for one control.
#[derive(Debug, Clone)]
pub struct PressTracker {
    state: PressState,
    long_press_ms: u64,
    release_timeout_ms: Option<u64>,
}

impl PressTracker {
    pub fn new(long_press_ms: u64, release_timeout_ms: Option<u64>) -> Self {
        Self {
            state: PressState::Idle,
            long_press_ms,
            release_timeout_ms,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == PressState::Idle
    }

    pub fn is_long_held(&self) -> bool {
        matches!(self.state, PressState::LongHeld { .. })
    }

    /// Key-down (or auto-repeat) edge.
    pub fn press(&mut self, now_ms: u64) -> Option<PressKind> {
        match self.state {
            PressState::Idle => {
                self.state = PressState::Pressed {
                    since_ms: now_ms,
                    last_seen_ms: now_ms,
                };
                None
            }
            PressState::Pressed { since_ms, .. } => {
                if now_ms.saturating_sub(since_ms) >= self.long_press_ms {
                    self.state = PressState::LongHeld {
                        last_seen_ms: now_ms,
                    };
                    Some(PressKind::Long)
                } else {
                    self.state = PressState::Pressed {
                        since_ms,
                        last_seen_ms: now_ms,
                    };
                    None
                }
            }
            PressState::LongHeld { .. } => {
                self.state = PressState::LongHeld {
                    last_seen_ms: now_ms,
                };
                None
            }
        }
    }

    /// Key-up edge.
    pub fn release(&mut self, now_ms: u64) -> Option<PressKind> {
        let state = std::mem::replace(&mut self.state, PressState::Idle);
        match state {
            PressState::Idle => None,
            PressState::Pressed { since_ms, .. } => Some(self.classify(since_ms, now_ms)),
            // Already fired when promoted.
            PressState::LongHeld { .. } => None,
        }
    }

    /// Periodic check while held: promotes to LongHeld once the threshold
    /// elapses, and auto-releases stale presses.
    pub fn poll(&mut self, now_ms: u64) -> Option<PressKind> {
        match self.state {
            PressState::Idle => None,
            PressState::Pressed {
                since_ms,
                last_seen_ms,
            } => {
                if self.timed_out(last_seen_ms, now_ms) {
                    // The release happened somewhere after the last edge we saw.
                    self.state = PressState::Idle;
                    return Some(self.classify(since_ms, last_seen_ms));
                }
                if now_ms.saturating_sub(since_ms) >= self.long_press_ms {
                    self.state = PressState::LongHeld {
                        last_seen_ms,
                    };
                    return Some(PressKind::Long);
                }
                None
            }
            PressState::LongHeld { last_seen_ms } => {
                if self.timed_out(last_seen_ms, now_ms) {
                    self.state = PressState::Idle;
                }
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = PressState::Idle;
    }

    fn timed_out(&self, last_seen_ms: u64, now_ms: u64) -> bool {
        self.release_timeout_ms
            .is_some_and(|timeout| now_ms.saturating_sub(last_seen_ms) > timeout)
    }

    fn classify(&self, since_ms: u64, released_ms: u64) -> PressKind {
        if released_ms.saturating_sub(since_ms) >= self.long_press_ms {
            PressKind::Long
        } else {
            PressKind::Short
        }
    }
}
