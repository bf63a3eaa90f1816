//! Key probe: shows how terminal keys are classified.
//!
//! Prints every raw edge and every command the classifier produces, including
//! long presses promoted by the poll. Handy for checking whether a terminal
//! reports key releases. Esc / q / Ctrl-C quits.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use life_appliance::core::LifeConfig;
use life_appliance::input::{raw_event, EdgeReporting, InputClassifier};
use life_appliance::types::Command;

fn main() -> Result<()> {
    let config = LifeConfig::from_env()?;
    terminal::enable_raw_mode()?;

    let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
    let reporting = if enhanced {
        EdgeReporting::PressRelease
    } else {
        EdgeReporting::PressOnly
    };

    let result = run(&config, reporting);

    if enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = terminal::disable_raw_mode();
    result
}

fn run(config: &LifeConfig, reporting: EdgeReporting) -> Result<()> {
    let mut out = io::stdout();
    let release_timeout_ms = reporting.release_timeout(config.release_timeout_ms);
    write!(
        out,
        "edge reporting: {:?}, long press {} ms, release timeout {:?} ms\r\n",
        reporting, config.long_press_ms, release_timeout_ms
    )?;
    out.flush()?;

    let mut classifier = InputClassifier::with_config(config.long_press_ms, release_timeout_ms);
    let epoch = Instant::now();
    let poll = Duration::from_millis(config.poll_ms);

    loop {
        let now = epoch.elapsed().as_millis() as u64;
        for command in classifier.poll(now) {
            write!(out, "{:>8} ms  poll     -> {:?}\r\n", now, command)?;
        }

        if event::poll(poll)? {
            if let Event::Key(key) = event::read()? {
                let now = epoch.elapsed().as_millis() as u64;
                let Some(raw) = raw_event(key, now, reporting) else {
                    write!(out, "{:>8} ms  unmapped {:?} {:?}\r\n", now, key.code, key.kind)?;
                    out.flush()?;
                    continue;
                };
                let command = classifier.on_event(raw);
                write!(
                    out,
                    "{:>8} ms  {:<5} {:<9} -> {:?}\r\n",
                    now,
                    format!("{:?}", raw.edge),
                    raw.key.as_str(),
                    command
                )?;
                if command == Some(Command::Shutdown) {
                    out.flush()?;
                    return Ok(());
                }
            }
        }
        out.flush()?;
    }
}
