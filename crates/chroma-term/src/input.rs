// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into the few things the picker reacts to:
//
//   arrows          CSI `ESC [ A..D` (any parameters) and SS3 `ESC O A..D`
//   cursor reports  `ESC [ row ; col R`, the reply to a DSR query
//   control bytes   Ctrl+letter (Ctrl+C is 0x03 with ISIG off)
//   text            printable ASCII and UTF-8, plus Alt+char
//
// Anything else is consumed and dropped. Bytes of an unfinished sequence
// stay buffered across reads. A lone ESC is ambiguous until more input
// arrives or the caller gives up waiting and calls `flush`.

use bitflags::bitflags;

use crate::terminal::Position;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Reply to a Device Status Report, 0-indexed.
    CursorPosition(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    #[must_use]
    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::CTRL,
        }
    }

    #[must_use]
    pub const fn alt(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::ALT,
        }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character, or the letter of a Ctrl combination.
    Char(char),
    Escape,
    Up,
    Down,
    Left,
    Right,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const ALT  = 0b01;
        const CTRL = 0b10;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental byte-to-event parser.
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` and return every event that is now complete.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Skip(n) => pos += n,
                Parsed::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// Whether an unfinished sequence is buffered.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up on the buffered sequence.
    ///
    /// An ESC becomes an Escape key and printable bytes become characters;
    /// anything else is dropped. Never yields a cursor report.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x20..=0x7E => Some(KeyEvent::plain(KeyCode::Char(char::from(byte)))),
                _ => None,
            })
            .map(Event::Key)
            .collect();
        self.buf.clear();
        events
    }
}

// ─── Parsing ────────────────────────────────────────────────────────────────

enum Parsed {
    /// An event and the number of bytes it used.
    Event(Event, usize),
    /// Bytes to drop without an event.
    Skip(usize),
    Incomplete,
}

const fn key(event: KeyEvent, consumed: usize) -> Parsed {
    Parsed::Event(Event::Key(event), consumed)
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        b @ 0x01..=0x1A => key(KeyEvent::ctrl(KeyCode::Char(char::from(b - 1 + b'a'))), 1),
        b @ 0x20..=0x7E => key(KeyEvent::plain(KeyCode::Char(char::from(b))), 1),
        0xC0..=0xF7 => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };

    match next {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        // The second ESC may open a sequence of its own, so only the
        // first one is consumed.
        0x1B => key(KeyEvent::plain(KeyCode::Escape), 1),
        b @ 0x20..=0x7E => key(KeyEvent::alt(KeyCode::Char(char::from(b))), 2),
        _ => key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

/// `ESC [ params final`. Parameter and intermediate bytes are 0x20..=0x3F,
/// the final byte 0x40..=0x7E.
fn parse_csi(buf: &[u8]) -> Parsed {
    let Some(offset) = buf[2..].iter().position(|b| !(0x20..=0x3F).contains(b)) else {
        return Parsed::Incomplete;
    };
    let end = 2 + offset;
    let consumed = end + 1;

    let code = match buf[end] {
        b'R' => {
            return match parse_csi_params(&buf[2..end])[..] {
                [row, col] => Parsed::Event(
                    Event::CursorPosition(Position::new(
                        col.saturating_sub(1),
                        row.saturating_sub(1),
                    )),
                    consumed,
                ),
                _ => Parsed::Skip(consumed),
            };
        }
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        // Not a final byte: the sequence is malformed up to here.
        0x00..=0x3F | 0x7F..=0xFF => return Parsed::Skip(end),
        _ => return Parsed::Skip(consumed),
    };
    key(KeyEvent::plain(code), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    let Some(&last) = buf.get(2) else {
        return Parsed::Incomplete;
    };
    let code = match last {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        _ => return Parsed::Skip(3),
    };
    key(KeyEvent::plain(code), 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    if buf.len() < len {
        return Parsed::Incomplete;
    }

    match std::str::from_utf8(&buf[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => key(KeyEvent::plain(KeyCode::Char(ch)), len),
        None => Parsed::Skip(1),
    }
}

/// Semicolon-separated decimal parameters; empty fields are 0.
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn plain(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn report(col: u16, row: u16) -> Event {
        Event::CursorPosition(Position::new(col, row))
    }

    // ── Characters ──────────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(parse(b"hj"), [plain(KeyCode::Char('h')), plain(KeyCode::Char('j'))]);
    }

    #[test]
    fn ctrl_c_byte() {
        assert_eq!(parse(b"\x03"), [Event::Key(KeyEvent::ctrl(KeyCode::Char('c')))]);
    }

    #[test]
    fn unhandled_bytes_are_dropped() {
        assert!(parse(b"\x00\x7f\x1c").is_empty());
    }

    #[test]
    fn utf8_char() {
        assert_eq!(parse("é←".as_bytes()), [plain(KeyCode::Char('é')), plain(KeyCode::Char('←'))]);
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "←".as_bytes();
        let mut parser = Parser::new();
        assert!(parser.advance(&bytes[..2]).is_empty());
        assert_eq!(parser.advance(&bytes[2..]), [plain(KeyCode::Char('←'))]);
    }

    #[test]
    fn invalid_utf8_lead_is_skipped() {
        assert_eq!(parse(b"\xC3(x"), [plain(KeyCode::Char('(')), plain(KeyCode::Char('x'))]);
    }

    // ── Arrows ──────────────────────────────────────────────────────────

    #[test]
    fn csi_arrows() {
        assert_eq!(
            parse(b"\x1b[A\x1b[B\x1b[C\x1b[D"),
            [
                plain(KeyCode::Up),
                plain(KeyCode::Down),
                plain(KeyCode::Right),
                plain(KeyCode::Left),
            ]
        );
    }

    #[test]
    fn ss3_arrows() {
        assert_eq!(parse(b"\x1bOA\x1bOD"), [plain(KeyCode::Up), plain(KeyCode::Left)]);
    }

    #[test]
    fn arrow_parameters_are_ignored() {
        assert_eq!(parse(b"\x1b[1;5C"), [plain(KeyCode::Right)]);
    }

    #[test]
    fn other_csi_sequences_are_dropped() {
        assert_eq!(parse(b"\x1b[3~\x1b[Hx"), [plain(KeyCode::Char('x'))]);
    }

    #[test]
    fn split_arrow() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.advance(b"A"), [plain(KeyCode::Up)]);
        assert!(!parser.has_pending());
    }

    // ── Cursor reports ──────────────────────────────────────────────────

    #[test]
    fn report_is_zero_indexed() {
        assert_eq!(parse(b"\x1b[12;40R"), [report(39, 11)]);
        assert_eq!(parse(b"\x1b[1;1R"), [report(0, 0)]);
    }

    #[test]
    fn report_between_keys() {
        assert_eq!(
            parse(b"\x1b[C\x1b[5;9Rl"),
            [plain(KeyCode::Right), report(8, 4), plain(KeyCode::Char('l'))]
        );
    }

    #[test]
    fn report_split_across_reads() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[3;").is_empty());
        assert_eq!(parser.advance(b"7R"), [report(6, 2)]);
    }

    #[test]
    fn report_needs_two_parameters() {
        assert!(parse(b"\x1b[5R").is_empty());
    }

    // ── Escape ──────────────────────────────────────────────────────────

    #[test]
    fn alt_char() {
        assert_eq!(parse(b"\x1bx"), [Event::Key(KeyEvent::alt(KeyCode::Char('x')))]);
    }

    #[test]
    fn lone_escape_waits_then_flushes() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), [plain(KeyCode::Escape)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn report_behind_a_pending_escape() {
        let mut parser = Parser::new();
        assert_eq!(parser.advance(b"l\x1b"), [plain(KeyCode::Char('l'))]);
        assert_eq!(
            parser.advance(b"\x1b[3;9R"),
            [plain(KeyCode::Escape), report(8, 2)]
        );
        assert!(!parser.has_pending());
    }

    #[test]
    fn escape_before_arrow() {
        assert_eq!(parse(b"\x1b\x1b[A"), [plain(KeyCode::Escape), plain(KeyCode::Up)]);
    }

    #[test]
    fn flush_keeps_printable_leftovers() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[1;").is_empty());
        assert_eq!(
            parser.flush(),
            [
                plain(KeyCode::Escape),
                plain(KeyCode::Char('[')),
                plain(KeyCode::Char('1')),
                plain(KeyCode::Char(';')),
            ]
        );
    }

    // ── Parameters ──────────────────────────────────────────────────────

    #[test]
    fn csi_params() {
        assert!(parse_csi_params(b"").is_empty());
        assert_eq!(parse_csi_params(b"12;40"), [12, 40]);
        assert_eq!(parse_csi_params(b";5"), [0, 5]);
        assert_eq!(parse_csi_params(b"99999"), [u16::MAX]);
    }
}
