//! Controller tests - edit / run state machine

use life_appliance::core::{Board, Controller, Outcome};
use life_appliance::types::{Command, Cursor, Direction, Mode};

fn running(rows: &[&str]) -> Controller {
    let board = Board::from_rows(rows).unwrap();
    let mut c = Controller::new(board.rows(), board.cols(), 100);
    c.load_board(board).unwrap();
    c.apply(Command::Confirm).unwrap();
    c
}

#[test]
fn test_cursor_clamps_at_origin() {
    let mut c = Controller::new(4, 4, 100);
    assert_eq!(c.apply(Command::Move(Direction::Up)).unwrap(), Outcome::Ignored);
    assert_eq!(c.apply(Command::Move(Direction::Left)).unwrap(), Outcome::Ignored);
    assert_eq!(c.cursor(), Cursor::new(0, 0));
}

#[test]
fn test_cursor_clamps_at_far_corner() {
    let mut c = Controller::new(3, 2, 100);
    for _ in 0..10 {
        c.apply(Command::Move(Direction::Down)).unwrap();
        c.apply(Command::Move(Direction::Right)).unwrap();
    }
    assert_eq!(c.cursor(), Cursor::new(2, 1));
    assert_eq!(
        c.apply(Command::Move(Direction::Up)).unwrap(),
        Outcome::CursorMoved(Cursor::new(1, 1))
    );
}

#[test]
fn test_edit_then_confirm_starts_single_step() {
    let mut c = Controller::new(5, 5, 100);
    c.apply(Command::Move(Direction::Down)).unwrap();
    assert_eq!(
        c.apply(Command::ToggleCell).unwrap(),
        Outcome::CellToggled {
            cursor: Cursor::new(1, 0),
            alive: true
        }
    );
    assert_eq!(
        c.apply(Command::Confirm).unwrap(),
        Outcome::ModeChanged(Mode::RunningSingle)
    );
    assert_eq!(c.mode(), Mode::RunningSingle);
    assert_eq!(c.generation(), 0);
    assert_eq!(c.board().get(1, 0), Ok(true));
}

#[test]
fn test_single_step_advances_exactly_one_generation() {
    let mut c = running(&[".....", ".....", ".###.", ".....", "....."]);
    assert_eq!(c.apply(Command::ToggleCell).unwrap(), Outcome::Advanced(1));
    assert_eq!(
        c.board().to_rows(),
        vec![".....", "..#..", "..#..", "..#..", "....."]
    );
    assert_eq!(c.apply(Command::ToggleCell).unwrap(), Outcome::Advanced(2));
    assert_eq!(c.generation(), 2);
}

#[test]
fn test_commands_outside_their_mode_are_ignored() {
    let mut c = Controller::new(3, 3, 100);
    assert_eq!(c.apply(Command::ToggleContinuous).unwrap(), Outcome::Ignored);
    assert_eq!(c.mode(), Mode::Editing);

    c.apply(Command::Confirm).unwrap();
    assert_eq!(c.apply(Command::Move(Direction::Down)).unwrap(), Outcome::Ignored);
    assert_eq!(c.apply(Command::Confirm).unwrap(), Outcome::Ignored);
    assert_eq!(c.cursor(), Cursor::new(0, 0));

    c.apply(Command::ToggleContinuous).unwrap();
    assert_eq!(c.apply(Command::ToggleCell).unwrap(), Outcome::Ignored);
    assert_eq!(c.generation(), 0);
}

#[test]
fn test_continuous_toggles_back_to_single() {
    let mut c = running(&["...", "...", "..."]);
    assert_eq!(
        c.apply(Command::ToggleContinuous).unwrap(),
        Outcome::ModeChanged(Mode::RunningContinuous)
    );
    assert_eq!(c.tick(250).unwrap(), 2);
    assert_eq!(
        c.apply(Command::ToggleContinuous).unwrap(),
        Outcome::ModeChanged(Mode::RunningSingle)
    );
    assert_eq!(c.tick(1_000).unwrap(), 0);
    assert_eq!(c.generation(), 2);
}

#[test]
fn test_reset_from_any_running_mode() {
    for continuous in [false, true] {
        let mut c = running(&["##.", "##.", "..."]);
        if continuous {
            c.apply(Command::ToggleContinuous).unwrap();
            c.tick(300).unwrap();
        } else {
            c.apply(Command::ToggleCell).unwrap();
        }
        assert!(c.generation() > 0);

        assert_eq!(c.apply(Command::Reset).unwrap(), Outcome::Reset);
        assert_eq!(c.mode(), Mode::Editing);
        assert_eq!(c.generation(), 0);
        assert!(c.board().is_all_dead());
    }
}

#[test]
fn test_reset_keeps_cursor() {
    let mut c = Controller::new(4, 4, 100);
    c.apply(Command::Move(Direction::Right)).unwrap();
    c.apply(Command::Move(Direction::Down)).unwrap();
    c.apply(Command::ToggleCell).unwrap();
    c.apply(Command::Reset).unwrap();
    assert_eq!(c.cursor(), Cursor::new(1, 1));
    assert!(c.board().is_all_dead());
}

#[test]
fn test_snapshot_is_independent_of_later_changes() {
    let mut c = running(&[".....", ".....", ".###.", ".....", "....."]);
    let before = c.snapshot();
    c.apply(Command::ToggleCell).unwrap();
    let after = c.snapshot();

    assert_eq!(before.generation, 0);
    assert_eq!(before.board.to_rows()[2], ".###.");
    assert_eq!(after.generation, 1);
    assert_eq!(after.board.to_rows()[2], "..#..");
    assert_eq!(after.cursor, None);
}
