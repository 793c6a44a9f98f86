// SPDX-License-Identifier: MIT
//
// Row painting helpers shared by the slider and the picker.
//
// Everything here is pure: values in, text out. The widgets decide where
// and when to write it.

use chroma_term::ansi::{self, Fg};
use chroma_term::color::Rgb;

/// Track glyph for positions without the thumb.
pub const TRACK: char = '─';

/// Thumb glyph.
pub const THUMB: char = '│';

/// The color swatch at the start of every picker row.
pub const SWATCH: &str = "████████";

/// Line break. The terminal is in raw mode, so `\n` alone would keep the
/// column.
pub const LINE_BREAK: &str = "\r\n";

/// Clamp an arbitrary integer into a color channel.
#[must_use]
pub fn clamp_channel(value: i32) -> u8 {
    u8::try_from(value.clamp(0, i32::from(u8::MAX))).unwrap_or(u8::MAX)
}

/// The label segment that precedes a slider track, e.g. `"  [R] "`.
#[must_use]
pub fn label_segment(label: &str) -> String {
    format!("  [{label}] ")
}

/// The bracketed numeric readout after a slider track.
///
/// The number is left-aligned in two columns and that pair right-aligned
/// in three, so one- and two-digit values carry a trailing space:
/// `" [  8  ]"`, `" [  80 ]"`, `" [ 200 ]"`.
#[must_use]
pub fn value_field(value: i32) -> String {
    format!(" [ {:>3} ]", format!("{value:<2}"))
}

/// The track for positions `first..=last`, with the thumb at `thumb`.
///
/// A thumb outside the range is simply not drawn.
#[must_use]
pub fn track(first: i32, last: i32, thumb: i32, highlighted: bool) -> String {
    let mut out = String::new();
    for i in first..=last {
        if i != thumb {
            out.push(TRACK);
        } else if highlighted {
            out.push_str(ansi::HIGHLIGHT);
            out.push(THUMB);
            out.push_str(ansi::RESET);
        } else {
            out.push(THUMB);
        }
    }
    out
}

/// The swatch painted in `color`, with attributes reset afterwards.
#[must_use]
pub fn swatch(color: Rgb) -> String {
    format!("{}{SWATCH}{}", Fg(color), ansi::RESET)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
