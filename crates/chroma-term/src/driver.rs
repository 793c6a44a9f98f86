// SPDX-License-Identifier: MIT
//
// The driver contract between widgets and the terminal.
//
// Widgets never touch stdout or termios. They receive a `&mut impl Driver`
// on every render and update call and use exactly four capabilities:
// ask where the cursor is, move it, write text, and (for the key loop)
// block for the next key. `TerminalDriver` implements this over a real
// TTY; `ScreenDriver` (see `screen.rs`) implements it in memory.
//
// The cursor is the one piece of shared state between a widget and the
// code around it. Getting the position from a real terminal is a round
// trip: we send a Device Status Report and parse the Cursor Position
// Report that comes back on stdin. Keys typed while we wait for that
// reply are queued, not dropped.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use tracing::{trace, warn};

use crate::ansi;
use crate::input::{Event, KeyCode, KeyEvent, Modifiers, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Position, Terminal};

/// How long to wait for the rest of an escape sequence after a lone ESC.
const ESC_TIMEOUT: Duration = Duration::from_millis(25);

/// How long a terminal may take to answer a cursor position query.
const CURSOR_REPORT_TIMEOUT: Duration = Duration::from_secs(1);

// ─── Key ─────────────────────────────────────────────────────────────────────

/// A logical key, already reduced to what the picker can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    CtrlC,
    Other,
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let plain = event.modifiers.is_empty();
        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(Modifiers::CTRL) => Self::CtrlC,
            KeyCode::Up => Self::Up,
            KeyCode::Down => Self::Down,
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            // Vi-style navigation.
            KeyCode::Char('k') if plain => Self::Up,
            KeyCode::Char('j') if plain => Self::Down,
            KeyCode::Char('h') if plain => Self::Left,
            KeyCode::Char('l') if plain => Self::Right,
            _ => Self::Other,
        }
    }
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Everything a widget needs from a terminal.
///
/// Implementations must not emit output of their own between calls: a
/// widget that saves the cursor, writes, and restores it relies on nothing
/// else moving the cursor in the meantime.
pub trait Driver {
    /// The current cursor position.
    ///
    /// # Errors
    ///
    /// Returns an error if the position cannot be determined.
    fn cursor_position(&mut self) -> io::Result<Position>;

    /// Move the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the output fails.
    fn set_cursor_position(&mut self, pos: Position) -> io::Result<()>;

    /// Write raw text. No newline translation is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the output fails.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Block until the next key press.
    ///
    /// # Errors
    ///
    /// Returns an error if input is closed or fails.
    fn read_key(&mut self) -> io::Result<Key>;
}

impl<D: Driver + ?Sized> Driver for &mut D {
    fn cursor_position(&mut self) -> io::Result<Position> {
        (**self).cursor_position()
    }

    fn set_cursor_position(&mut self, pos: Position) -> io::Result<()> {
        (**self).set_cursor_position(pos)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn read_key(&mut self) -> io::Result<Key> {
        (**self).read_key()
    }
}

// ─── Inbox ───────────────────────────────────────────────────────────────────

/// Input that has been read but not yet handed out as a [`Key`].
///
/// Holds the parser's unfinished bytes and the keys that arrived while a
/// cursor report was awaited.
#[derive(Debug, Default)]
struct Inbox {
    parser: Parser,
    keys: VecDeque<KeyEvent>,
}

impl Inbox {
    /// Parse `bytes`, queue the keys, and return the last cursor report.
    fn feed(&mut self, bytes: &[u8]) -> Option<Position> {
        let events = self.parser.advance(bytes);
        self.dispatch(events)
    }

    /// Stop waiting for the rest of a buffered sequence and queue what it
    /// held as keys.
    fn settle(&mut self) {
        let events = self.parser.flush();
        self.dispatch(events);
    }

    fn has_partial(&self) -> bool {
        self.parser.has_pending()
    }

    fn next_key(&mut self) -> Option<Key> {
        self.keys.pop_front().map(Key::from)
    }

    fn dispatch(&mut self, events: Vec<Event>) -> Option<Position> {
        let mut report = None;
        for event in events {
            match event {
                Event::Key(key) => self.keys.push_back(key),
                Event::CursorPosition(pos) => report = Some(pos),
            }
        }
        report
    }
}

// ─── TerminalDriver ──────────────────────────────────────────────────────────

/// [`Driver`] over the process's controlling terminal.
///
/// Creating one enters raw mode and hides the cursor; dropping it (or
/// calling [`leave`](Self::leave)) restores the terminal.
pub struct TerminalDriver {
    terminal: Terminal,
    stdout: io::Stdout,
    reader: StdinReader,
    inbox: Inbox,
}

impl TerminalDriver {
    /// Enter raw mode and return a driver bound to stdin/stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled.
    pub fn new() -> io::Result<Self> {
        let mut terminal = Terminal::new();
        terminal.enter()?;

        Ok(Self {
            terminal,
            stdout: io::stdout(),
            reader: StdinReader::new(),
            inbox: Inbox::default(),
        })
    }

    /// Flush pending output and restore the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.terminal.leave()
    }
}

impl Driver for TerminalDriver {
    fn cursor_position(&mut self) -> io::Result<Position> {
        // A half-read sequence would swallow the start of the reply.
        if self.inbox.has_partial() {
            self.inbox.settle();
        }

        self.stdout.write_all(ansi::REQUEST_CURSOR_POSITION.as_bytes())?;
        self.stdout.flush()?;

        loop {
            let Some(chunk) = self.reader.read(Some(CURSOR_REPORT_TIMEOUT))? else {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "terminal did not answer the cursor position query",
                ));
            };
            if let Some(pos) = self.inbox.feed(chunk) {
                trace!(col = pos.col, row = pos.row, "cursor position report");
                return Ok(pos);
            }
        }
    }

    fn set_cursor_position(&mut self, pos: Position) -> io::Result<()> {
        write!(self.stdout, "{}", ansi::CursorTo(pos))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.stdout.write_all(text.as_bytes())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        self.stdout.flush()?;

        loop {
            if let Some(key) = self.inbox.next_key() {
                return Ok(key);
            }

            let timeout = self.inbox.has_partial().then_some(ESC_TIMEOUT);
            let Some(chunk) = self.reader.read(timeout)? else {
                self.inbox.settle();
                continue;
            };
            if let Some(pos) = self.inbox.feed(chunk) {
                warn!(col = pos.col, row = pos.row, "discarding unsolicited cursor report");
            }
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = self.stdout.flush();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
