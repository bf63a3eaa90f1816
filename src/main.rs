//! Game of Life appliance (default binary).
//!
//! Draws the board on the terminal through the pixel-stream sink, reads keys
//! with crossterm on a dedicated thread and optionally accepts remote keys
//! over TCP.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use life_appliance::core::LifeConfig;
use life_appliance::engine::{Appliance, Clock, KeySender, Shutdown};
use life_appliance::input::{raw_event, EdgeReporting};
use life_appliance::link::{run_server, LinkConfig, LinkHandles};
use life_appliance::video::{restore_terminal, TerminalSink};

/// How long the input thread waits for an event before re-checking shutdown
const INPUT_POLL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let mut config = LifeConfig::from_env().context("invalid LIFE_* configuration")?;
    let link = LinkConfig::from_env();
    init_logging()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("life-rt")
        .build()?;

    let mut sink = TerminalSink::new(config.rows, config.cols, config.ratio);
    sink.enter()?;
    let reporting = enable_release_events();
    config.release_timeout_ms = reporting.release_timeout(config.release_timeout_ms);
    info!(?reporting, release_timeout_ms = ?config.release_timeout_ms, "terminal ready");

    let appliance = Appliance::new(config);
    let shutdown = appliance.shutdown();
    let result = spawn_input_thread(
        appliance.key_sender(),
        appliance.clock(),
        shutdown.clone(),
        reporting,
    )
    .and_then(|input| {
        let result = runtime.block_on(run(appliance, link, sink));
        shutdown.trigger();
        match input.join() {
            Ok(Err(e)) => warn!(error = %e, "input thread failed"),
            Err(_) => warn!("input thread panicked"),
            Ok(Ok(())) => {}
        }
        result
    });
    // The input thread may fail before the appliance runs.
    shutdown.trigger();

    // Always try to restore terminal state.
    if reporting == EdgeReporting::PressRelease {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = restore_terminal();
    result
}

async fn run(appliance: Appliance, link: LinkConfig, sink: TerminalSink) -> Result<()> {
    let link_task = if link.disabled {
        info!("remote key link disabled");
        None
    } else {
        let handles = LinkHandles {
            keys: appliance.key_sender(),
            snapshots: appliance.snapshots(),
            clock: appliance.clock(),
            shutdown: appliance.shutdown(),
            ratio: appliance.config().ratio,
        };
        Some(tokio::spawn(run_server(link, handles, None)))
    };

    let shutdown = appliance.shutdown();
    let summary = appliance.run(sink).await;
    shutdown.trigger();

    if let Some(task) = link_task {
        match task.await {
            Ok(Err(e)) => warn!(error = %e, "remote key link failed"),
            Err(e) => warn!(error = %e, "remote key link task aborted"),
            Ok(Ok(())) => {}
        }
    }

    let summary = summary?;
    info!(
        mode = summary.mode.as_str(),
        generation = summary.generation,
        commands = summary.commands,
        frames = summary.frames,
        frames_drawn = summary.sink.frames_drawn(),
        "bye"
    );
    Ok(())
}

/// Ask the terminal for release events. Terminals without the keyboard
/// enhancement protocol only report presses.
fn enable_release_events() -> EdgeReporting {
    let supported = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if supported
        && execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok()
    {
        EdgeReporting::PressRelease
    } else {
        EdgeReporting::PressOnly
    }
}

fn spawn_input_thread(
    keys: KeySender,
    clock: Clock,
    shutdown: Shutdown,
    reporting: EdgeReporting,
) -> Result<JoinHandle<Result<()>>> {
    let handle = std::thread::Builder::new()
        .name("life-input".to_string())
        .spawn(move || -> Result<()> {
            while !shutdown.is_triggered() {
                if !event::poll(INPUT_POLL)? {
                    continue;
                }
                let Event::Key(key) = event::read()? else {
                    continue;
                };
                let Some(raw) = raw_event(key, clock.now_ms(), reporting) else {
                    debug!(code = ?key.code, kind = ?key.kind, "unmapped key");
                    continue;
                };
                if keys.blocking_send(raw).is_err() {
                    break;
                }
            }
            Ok(())
        })
        .context("failed to spawn input thread")?;
    Ok(handle)
}

/// Logs go to `LIFE_LOG_PATH` (the terminal belongs to the board). Without it
/// logging stays off.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var("LIFE_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
