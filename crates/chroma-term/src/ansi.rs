// SPDX-License-Identifier: MIT
//
// ANSI escape sequence encoding.
//
// Fixed sequences are `&'static str` constants. Parameterized sequences are
// small `Display` types, so callers can splice them into a `format!` that
// builds a whole row, or `write!` them straight to a terminal handle. No
// state and no decisions about when to emit — that belongs to the widgets.
//
// Positions are 0-indexed in our API and converted to 1-indexed for the
// terminal (ANSI standard uses 1-based coordinates).

use std::fmt;

use crate::color::Rgb;
use crate::terminal::Position;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Hide the cursor (DECTCEM reset).
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show the cursor (DECTCEM set).
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Device Status Report: ask the terminal where the cursor is.
///
/// The terminal answers on stdin with a Cursor Position Report,
/// `ESC [ row ; col R` (1-indexed).
pub const REQUEST_CURSOR_POSITION: &str = "\x1b[6n";

/// Move the cursor to a position using CUP (Cursor Position).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorTo(pub Position);

impl fmt::Display for CursorTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Position { col, row } = self.0;
        write!(
            f,
            "\x1b[{};{}H",
            u32::from(row) + 1,
            u32::from(col) + 1
        )
    }
}

/// Move the cursor up `n` rows without changing the column (CUU).
///
/// `CursorUp(0)` encodes to nothing: terminals treat a zero count as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorUp(pub u16);

impl fmt::Display for CursorUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return Ok(());
        }
        write!(f, "\x1b[{}A", self.0)
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
pub const RESET: &str = "\x1b[0m";

/// Black text on a white background, used for the selected slider thumb.
pub const HIGHLIGHT: &str = "\x1b[30;47m";

/// Set the foreground color to a 24-bit `TrueColor` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fg(pub Rgb);

impl fmt::Display for Fg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb { r, g, b } = self.0;
        write!(f, "\x1b[38;2;{r};{g};{b}m")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
