//! TerminalSink: a pixel-stream consumer that displays on a real terminal.
//!
//! The stream carries `k x k` blocks per cell; the sink samples the top-left
//! pixel of every block into a framebuffer (2 columns per cell to compensate
//! for the glyph aspect ratio), and on end-of-frame flushes only the runs that
//! changed since the previous frame.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use life_core::BoardSnapshot;

use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::stream::{Beat, PixelSink, StreamCursor, StreamError};

/// Terminal columns per board cell
const CELL_W: u16 = 2;

pub struct TerminalSink {
    stdout: io::Stdout,
    ratio: u32,
    cursor: StreamCursor,
    next: FrameBuffer,
    last: Option<FrameBuffer>,
    status: String,
    buf: Vec<u8>,
    frames_drawn: u64,
}

impl TerminalSink {
    /// Sink for a `rows x cols` board streamed at expansion ratio `ratio`.
    pub fn new(rows: u16, cols: u16, ratio: u16) -> Self {
        let k = ratio.max(1) as u32;
        Self {
            stdout: io::stdout(),
            ratio: k,
            cursor: StreamCursor::new(cols as u32 * k, rows as u32 * k),
            next: FrameBuffer::new(cols.saturating_mul(CELL_W), rows.saturating_add(1)),
            last: None,
            status: String::new(),
            buf: Vec::with_capacity(64 * 1024),
            frames_drawn: 0,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    /// Text shown below the board on the next completed frame.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn present(&mut self) -> io::Result<()> {
        let status_row = self.next.height().saturating_sub(1);
        let blank = CellStyle::default();
        self.next.fill_span(0, status_row, self.next.width(), blank.bg);
        let status = std::mem::take(&mut self.status);
        let style = CellStyle {
            bold: true,
            ..blank
        };
        self.next.put_str(0, status_row, &status, style);
        self.status = status;

        self.buf.clear();
        match self.last.take() {
            Some(mut prev) => {
                encode_diff_into(&prev, &self.next, &mut self.buf)?;
                self.flush_buf()?;
                // Swap current into prev so the next frame can diff without cloning.
                std::mem::swap(&mut prev, &mut self.next);
                self.last = Some(prev);
            }
            None => {
                encode_full_into(&self.next, &mut self.buf)?;
                self.flush_buf()?;
                self.last = Some(self.next.clone());
            }
        }
        self.frames_drawn += 1;
        Ok(())
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()
    }
}

impl PixelSink for TerminalSink {
    fn begin_frame(&mut self, snapshot: &BoardSnapshot) {
        self.status = status_line(snapshot);
    }

    fn accept(&mut self, beat: Beat) -> Result<(), StreamError> {
        let (x, y) = self.cursor.advance(&beat)?;
        if x % self.ratio == 0 && y % self.ratio == 0 {
            let col = (x / self.ratio) as u16;
            let row = (y / self.ratio) as u16;
            self.next.fill_span(col * CELL_W, row, CELL_W, beat.pixel);
        }
        if beat.end_of_frame {
            self.present()?;
        }
        Ok(())
    }

    fn frame_abandoned(&mut self) {
        self.cursor.reset();
    }
}

/// Leave the alternate screen and raw mode.
///
/// Safe to call without a live [`TerminalSink`], e.g. after the sink was lost
/// to an error.
pub fn restore_terminal() -> Result<()> {
    let mut buf: Vec<u8> = Vec::new();
    buf.queue(ResetColor)?;
    buf.queue(SetAttribute(Attribute::Reset))?;
    buf.queue(terminal::EnableLineWrap)?;
    buf.queue(cursor::Show)?;
    buf.queue(terminal::LeaveAlternateScreen)?;
    let mut stdout = io::stdout();
    stdout.write_all(&buf)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// One-line summary shown under the board.
pub fn status_line(snapshot: &BoardSnapshot) -> String {
    match snapshot.cursor {
        Some(c) => format!(
            " {} | cursor {},{} | alive {} | space toggle, hold space/enter run, esc quit",
            snapshot.mode.as_str(),
            c.row,
            c.col,
            snapshot.board.alive_count()
        ),
        None => format!(
            " {} | gen {} | alive {} | space step, c continuous, backspace reset, esc quit",
            snapshot.mode.as_str(),
            snapshot.generation,
            snapshot.board.alive_count()
        ),
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current_style: Option<CellStyle> = None;
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        if y + 1 < fb.height() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> io::Result<()> {
    let mut current_style: Option<CellStyle> = None;

    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current_style != Some(cell.style) {
                apply_style_into(out, cell.style)?;
                current_style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    })?;

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> io::Result<()> {
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> io::Result<()>,
) -> io::Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    for y in 0..next.height() {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
