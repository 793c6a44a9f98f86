// SPDX-License-Identifier: MIT
//
// In-memory terminal: a `Driver` that paints into a character grid.
//
// `ScreenDriver` exists so widget code can be exercised without a TTY.
// It keeps three views of what happened:
//
//   calls  — every driver call in order, for asserting that an operation
//            touched the terminal (or, for no-ops, that it did not)
//   output — the concatenation of every `write`, byte for byte
//   grid   — the emulated screen, with the SGR state each cell was
//            painted in, for asserting what the user would see
//
// The emulation covers what the picker emits: printable text, `\r`, `\n`,
// CUP, CUU, and the SGR sequences for reset, 24-bit foreground, and the
// black-on-white highlight. Other escape sequences are consumed and
// ignored. The grid grows on demand and never scrolls.

use std::collections::VecDeque;
use std::io;

use unicode_width::UnicodeWidthChar;

use crate::color::Rgb;
use crate::driver::{Driver, Key};
use crate::terminal::Position;

// ─── Call ────────────────────────────────────────────────────────────────────

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CursorPosition,
    SetCursorPosition(Position),
    Write(String),
    ReadKey,
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A painted grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// 24-bit foreground in effect when the cell was painted.
    pub fg: Option<Rgb>,
    /// Whether the black-on-white highlight was in effect.
    pub highlighted: bool,
}

impl Cell {
    const BLANK: Self = Self {
        ch: ' ',
        fg: None,
        highlighted: false,
    };
}

/// SGR state carried between writes, as a real terminal would.
#[derive(Debug, Clone, Copy, Default)]
struct Pen {
    fg: Option<Rgb>,
    highlighted: bool,
}

// ─── ScreenDriver ────────────────────────────────────────────────────────────

/// A [`Driver`] backed by an emulated screen.
///
/// # Example
///
/// ```
/// use chroma_term::driver::Driver;
/// use chroma_term::screen::{Call, ScreenDriver};
/// use chroma_term::terminal::Position;
///
/// let mut screen = ScreenDriver::at(Position::new(2, 1));
/// screen.write("hi")?;
/// assert_eq!(screen.row_text(1), "  hi");
/// assert_eq!(screen.cursor(), Position::new(4, 1));
/// assert_eq!(screen.calls(), [Call::Write("hi".into())]);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ScreenDriver {
    cursor: Position,
    pen: Pen,
    grid: Vec<Vec<Cell>>,
    calls: Vec<Call>,
    output: String,
    keys: VecDeque<Key>,
}

impl ScreenDriver {
    /// An empty screen with the cursor at the top-left corner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty screen with the cursor at `pos`.
    #[must_use]
    pub fn at(pos: Position) -> Self {
        Self {
            cursor: pos,
            ..Self::default()
        }
    }

    /// Queue keys to be returned by [`Driver::read_key`], in order.
    #[must_use]
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.keys.extend(keys);
        self
    }

    /// Current emulated cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// Every driver call so far.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Drain the call log, returning what it held.
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    /// Everything written so far, escape sequences included.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The cell at `pos`, or `None` if nothing was ever painted there.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.grid
            .get(usize::from(pos.row))?
            .get(usize::from(pos.col))
            .copied()
    }

    /// The characters on `row`, with trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        self.grid
            .get(usize::from(row))
            .map(|cells| cells.iter().map(|c| c.ch).collect::<String>())
            .unwrap_or_default()
            .trim_end()
            .to_owned()
    }

    /// Every row's text, top to bottom.
    #[must_use]
    pub fn screen(&self) -> Vec<String> {
        (0..self.grid.len())
            .map(|row| self.row_text(u16::try_from(row).unwrap_or(u16::MAX)))
            .collect()
    }

    // ── Emulation ───────────────────────────────────────────────────────

    fn put(&mut self, ch: char) {
        let width = ch.width().unwrap_or(0);
        if width == 0 {
            return;
        }

        let row = usize::from(self.cursor.row);
        let col = usize::from(self.cursor.col);
        if self.grid.len() <= row {
            self.grid.resize_with(row + 1, Vec::new);
        }
        let line = &mut self.grid[row];
        if line.len() < col + width {
            line.resize(col + width, Cell::BLANK);
        }
        line[col] = Cell {
            ch,
            fg: self.pen.fg,
            highlighted: self.pen.highlighted,
        };

        #[allow(clippy::cast_possible_truncation)] // width is 1 or 2
        let advance = width as u16;
        self.cursor.col = self.cursor.col.saturating_add(advance);
    }

    fn apply_csi(&mut self, params: &str, final_char: char) {
        let nums: Vec<u16> = params
            .split(';')
            .map(|p| p.parse().unwrap_or(0))
            .collect();

        match final_char {
            'H' => {
                let row = nums.first().copied().unwrap_or(1).max(1) - 1;
                let col = nums.get(1).copied().unwrap_or(1).max(1) - 1;
                self.cursor = Position::new(col, row);
            }
            'A' => {
                let n = nums.first().copied().unwrap_or(1).max(1);
                self.cursor.row = self.cursor.row.saturating_sub(n);
            }
            'm' => self.apply_sgr(&nums),
            _ => {}
        }
    }

    fn apply_sgr(&mut self, nums: &[u16]) {
        match nums {
            [] | [0] => self.pen = Pen::default(),
            [38, 2, r, g, b] => {
                let channel = |v: u16| u8::try_from(v).unwrap_or(u8::MAX);
                self.pen.fg = Some(Rgb::new(channel(*r), channel(*g), channel(*b)));
            }
            [30, 47] => self.pen.highlighted = true,
            _ => {}
        }
    }

    fn emulate(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\x1b' => {
                    if chars.peek() != Some(&'[') {
                        continue;
                    }
                    chars.next();
                    let mut params = String::new();
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            self.apply_csi(&params, c);
                            break;
                        }
                        params.push(c);
                    }
                }
                '\r' => self.cursor.col = 0,
                '\n' => self.cursor.row = self.cursor.row.saturating_add(1),
                c if c.is_control() => {}
                c => self.put(c),
            }
        }
    }
}

impl Driver for ScreenDriver {
    fn cursor_position(&mut self) -> io::Result<Position> {
        self.calls.push(Call::CursorPosition);
        Ok(self.cursor)
    }

    fn set_cursor_position(&mut self, pos: Position) -> io::Result<()> {
        self.calls.push(Call::SetCursorPosition(pos));
        self.cursor = pos;
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.calls.push(Call::Write(text.to_owned()));
        self.output.push_str(text);
        self.emulate(text);
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        self.calls.push(Call::ReadKey);
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
