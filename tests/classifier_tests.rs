//! Classifier tests - short/long press and release timeouts

use life_appliance::core::LifeConfig;
use life_appliance::input::{EdgeReporting, InputClassifier, PressKind, PressTracker};
use life_appliance::types::{Command, Direction, KeyId, RawEvent};

const LONG: u64 = 2_000;
const TIMEOUT: Option<u64> = Some(600);

#[test]
fn test_short_press_below_threshold() {
    let mut ic = InputClassifier::with_config(LONG, None);
    assert_eq!(ic.on_event(RawEvent::down(KeyId::ToggleCell, 1_000)), None);
    assert!(ic.poll(1_030).is_empty());
    assert_eq!(
        ic.on_event(RawEvent::up(KeyId::ToggleCell, 1_060)),
        Some(Command::ToggleCell)
    );
}

#[test]
fn test_long_press_fires_once_before_release() {
    let mut ic = InputClassifier::with_config(LONG, None);
    ic.on_event(RawEvent::down(KeyId::ToggleCell, 0));

    assert!(ic.poll(1_999).is_empty());
    assert_eq!(ic.poll(2_000).as_slice(), &[Command::Confirm]);
    // Still held: nothing more.
    assert!(ic.poll(2_010).is_empty());
    assert!(ic.poll(2_040).is_empty());
    // Release after promotion: nothing.
    assert_eq!(ic.on_event(RawEvent::up(KeyId::ToggleCell, 2_050)), None);
    assert!(!ic.is_holding());
}

#[test]
fn test_repeats_keep_a_press_alive_without_release_edges() {
    let mut ic = InputClassifier::with_config(LONG, TIMEOUT);
    let mut commands = Vec::new();
    // Auto-repeat every 100 ms for 2.5 s, never a release.
    for t in (0..=2_500).step_by(100) {
        commands.extend(ic.on_event(RawEvent::down(KeyId::ToggleCell, t)));
        commands.extend(ic.poll(t + 10));
    }
    commands.extend(ic.poll(5_000));
    assert_eq!(commands, vec![Command::Confirm]);
    assert!(!ic.is_holding());
}

/// Held center key on a terminal with release edges, default timings. The
/// first OS auto-repeat arrives after 660 ms, later than any short timeout.
#[test]
fn test_default_hold_with_slow_repeat_confirms_once() {
    let config = LifeConfig::default();
    let timeout = EdgeReporting::PressRelease.release_timeout(Some(600));
    let mut ic = InputClassifier::with_config(config.long_press_ms, timeout);

    let mut commands = Vec::new();
    commands.extend(ic.on_event(RawEvent::down(KeyId::ToggleCell, 0)));
    let mut next_repeat = 660;
    for now in (10..2_510).step_by(10) {
        if now == next_repeat {
            commands.extend(ic.on_event(RawEvent::down(KeyId::ToggleCell, now)));
            next_repeat += 40;
        }
        commands.extend(ic.poll(now));
    }
    commands.extend(ic.on_event(RawEvent::up(KeyId::ToggleCell, 2_510)));

    assert_eq!(commands, vec![Command::Confirm]);
    assert!(!ic.is_holding());
}

#[test]
fn test_release_timeout_classifies_a_tap_as_short() {
    let mut ic = InputClassifier::with_config(LONG, TIMEOUT);
    ic.on_event(RawEvent::down(KeyId::ToggleCell, 0));
    assert!(ic.poll(600).is_empty());
    assert_eq!(ic.poll(601).as_slice(), &[Command::ToggleCell]);
    assert!(!ic.is_holding());
}

#[test]
fn test_plain_keys_ignore_hold_time() {
    let mut ic = InputClassifier::with_config(LONG, TIMEOUT);
    assert_eq!(
        ic.on_event(RawEvent::down(KeyId::Up, 0)),
        Some(Command::Move(Direction::Up))
    );
    assert!(ic.poll(10_000).is_empty());
    assert_eq!(ic.on_event(RawEvent::up(KeyId::Up, 10_000)), None);
    assert_eq!(
        ic.on_event(RawEvent::tap(KeyId::Escape, 10_001)),
        Some(Command::Shutdown)
    );
}

#[test]
fn test_tracker_state_machine() {
    let mut t = PressTracker::new(100, Some(1_000));
    assert!(t.is_idle());
    assert_eq!(t.press(0), None);
    assert_eq!(t.release(99), Some(PressKind::Short));
    assert!(t.is_idle());

    t.press(200);
    assert_eq!(t.poll(300), Some(PressKind::Long));
    assert!(t.is_long_held());
    assert_eq!(t.release(400), None);

    // A late release without any poll still classifies as long.
    t.press(500);
    assert_eq!(t.release(700), Some(PressKind::Long));
}
