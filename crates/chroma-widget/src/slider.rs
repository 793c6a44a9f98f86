// SPDX-License-Identifier: MIT
//
// Slider — one bounded integer drawn as a track with a thumb.
//
//     [R] ──────────│───────────────────── [  80 ]
//
// The slider paints at whatever column the cursor is on when `render` is
// first called and remembers that spot as its origin. Later value or
// selection changes repaint the same cells in place and put the cursor
// back where the caller left it.
//
// The value is never snapped to `step`. Only the thumb is quantized:
// it sits at `value / step`, so with step 8 the values 8 and 12 share a
// track position while the readout shows each exactly.

use std::io;

use chroma_term::driver::Driver;
use chroma_term::terminal::Position;
use tracing::{debug, trace};

use crate::cursor::CursorGuard;
use crate::error::SliderError;
use crate::paint;

/// Bounds and step of an RGB channel slider.
pub const CHANNEL_MIN: i32 = 0;
pub const CHANNEL_MAX: i32 = 255;
pub const CHANNEL_STEP: i32 = 8;

/// Widest track a slider may draw, in positions.
pub const MAX_TRACK_LEN: i64 = 1024;

/// A bounded, stepped value with an in-place terminal rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    value: i32,
    minimum: i32,
    maximum: i32,
    step: i32,
    label: String,
    /// Where the first `render` started. `None` until then.
    origin: Option<Position>,
    selected: bool,
}

impl Slider {
    /// Build a slider.
    ///
    /// # Errors
    ///
    /// Rejects `minimum > maximum`, a non-positive `step`, a `value`
    /// outside `[minimum, maximum]`, and a track longer than
    /// [`MAX_TRACK_LEN`] positions.
    pub fn new(
        value: i32,
        minimum: i32,
        maximum: i32,
        step: i32,
        label: impl Into<String>,
    ) -> Result<Self, SliderError> {
        if minimum > maximum {
            return Err(SliderError::InvertedBounds { minimum, maximum });
        }
        if step <= 0 {
            return Err(SliderError::NonPositiveStep { step });
        }
        if !(minimum..=maximum).contains(&value) {
            return Err(SliderError::ValueOutOfRange {
                value,
                minimum,
                maximum,
            });
        }
        let positions = track_positions(minimum, maximum, step);
        if positions > MAX_TRACK_LEN {
            return Err(SliderError::TrackTooLong {
                positions,
                limit: MAX_TRACK_LEN,
            });
        }

        Ok(Self {
            value,
            minimum,
            maximum,
            step,
            label: label.into(),
            origin: None,
            selected: false,
        })
    }

    /// An RGB channel slider: `0..=255`, step 8.
    ///
    /// Infallible, since every `u8` is in range.
    #[must_use]
    pub fn channel(value: u8, label: impl Into<String>) -> Self {
        Self {
            value: i32::from(value),
            minimum: CHANNEL_MIN,
            maximum: CHANNEL_MAX,
            step: CHANNEL_STEP,
            label: label.into(),
            origin: None,
            selected: false,
        }
    }

    /// Start out selected (or not). Only meaningful before the first render.
    #[must_use]
    pub const fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    #[must_use]
    pub const fn minimum(&self) -> i32 {
        self.minimum
    }

    #[must_use]
    pub const fn maximum(&self) -> i32 {
        self.maximum
    }

    #[must_use]
    pub const fn step(&self) -> i32 {
        self.step
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Screen position captured by the first render.
    #[must_use]
    pub const fn origin(&self) -> Option<Position> {
        self.origin
    }

    #[must_use]
    pub const fn has_rendered(&self) -> bool {
        self.origin.is_some()
    }

    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Track position of the thumb (`value / step`).
    #[must_use]
    pub const fn thumb_position(&self) -> i32 {
        self.value / self.step
    }

    /// Number of discrete track positions.
    #[must_use]
    pub fn track_len(&self) -> i64 {
        track_positions(self.minimum, self.maximum, self.step)
    }

    /// The exact text a render writes: label, track, readout.
    #[must_use]
    pub fn painted(&self) -> String {
        let mut out = paint::label_segment(&self.label);
        out.push_str(&paint::track(
            self.minimum / self.step,
            self.maximum / self.step,
            self.thumb_position(),
            self.selected,
        ));
        out.push_str(&paint::value_field(self.value));
        out
    }

    // ── Drawing ─────────────────────────────────────────────────────────

    /// Paint at the current cursor position and remember it as the origin.
    ///
    /// Leaves the cursor right after the painted text; no line break.
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn render<D: Driver + ?Sized>(&mut self, driver: &mut D) -> io::Result<()> {
        let origin = driver.cursor_position()?;
        self.origin = Some(origin);
        driver.write(&self.painted())
    }

    /// Set the value, clamped into `[minimum, maximum]`.
    ///
    /// An unchanged value touches nothing. A changed value on a rendered
    /// slider is repainted in place.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaint.
    pub fn set_value<D: Driver + ?Sized>(&mut self, driver: &mut D, value: i32) -> io::Result<()> {
        let value = value.clamp(self.minimum, self.maximum);
        if value == self.value {
            trace!(label = %self.label, value, "slider value unchanged");
            return Ok(());
        }

        self.value = value;
        self.repaint(driver)
    }

    /// Set the highlight state and repaint (if rendered), even when the
    /// flag did not change.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaint.
    pub fn set_selected<D: Driver + ?Sized>(
        &mut self,
        driver: &mut D,
        selected: bool,
    ) -> io::Result<()> {
        self.selected = selected;
        self.repaint(driver)
    }

    fn repaint<D: Driver + ?Sized>(&self, driver: &mut D) -> io::Result<()> {
        let Some(origin) = self.origin else {
            return Ok(());
        };

        debug!(
            label = %self.label,
            value = self.value,
            selected = self.selected,
            "slider repaint"
        );

        let mut guard = CursorGuard::save(driver)?;
        guard.set_cursor_position(origin)?;
        guard.write(&self.painted())?;
        guard.restore()
    }
}

/// Positions from `minimum / step` to `maximum / step` inclusive.
fn track_positions(minimum: i32, maximum: i32, step: i32) -> i64 {
    i64::from(maximum / step) - i64::from(minimum / step) + 1
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_term::screen::{Call, ScreenDriver};
    use pretty_assertions::assert_eq;

    fn rgb_slider(value: u8) -> Slider {
        Slider::channel(value, "R")
    }

    /// Column of the thumb glyph within a painted channel slider row.
    fn thumb_column(row: &str) -> usize {
        row.chars()
            .position(|c| c == paint::THUMB)
            .expect("row has a thumb")
    }

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn new_accepts_valid_shape() {
        let s = Slider::new(5, 0, 10, 2, "X").unwrap();
        assert_eq!(s.value(), 5);
        assert_eq!((s.minimum(), s.maximum(), s.step()), (0, 10, 2));
        assert_eq!(s.label(), "X");
        assert!(!s.has_rendered());
        assert!(!s.is_selected());
        assert_eq!(s.origin(), None);
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        assert_eq!(
            Slider::new(5, 10, 0, 1, "X"),
            Err(SliderError::InvertedBounds {
                minimum: 10,
                maximum: 0
            })
        );
    }

    #[test]
    fn new_rejects_non_positive_step() {
        assert_eq!(
            Slider::new(0, 0, 10, 0, "X"),
            Err(SliderError::NonPositiveStep { step: 0 })
        );
        assert_eq!(
            Slider::new(0, 0, 10, -4, "X"),
            Err(SliderError::NonPositiveStep { step: -4 })
        );
    }

    #[test]
    fn new_rejects_value_out_of_range() {
        assert_eq!(
            Slider::new(11, 0, 10, 1, "X"),
            Err(SliderError::ValueOutOfRange {
                value: 11,
                minimum: 0,
                maximum: 10
            })
        );
    }

    #[test]
    fn new_rejects_overlong_track() {
        assert_eq!(
            Slider::new(0, i32::MIN, i32::MAX, 1, "X"),
            Err(SliderError::TrackTooLong {
                positions: 1 << 32,
                limit: MAX_TRACK_LEN,
            })
        );
        assert!(matches!(
            Slider::new(0, 0, 1024, 1, "X"),
            Err(SliderError::TrackTooLong { positions: 1025, .. })
        ));
    }

    #[test]
    fn extreme_bounds_with_wide_step() {
        let mut screen = ScreenDriver::new();
        let mut s = Slider::new(0, i32::MIN, i32::MAX, i32::MAX, "X").unwrap();
        assert_eq!(s.track_len(), 3);
        s.render(&mut screen).unwrap();
        s.set_value(&mut screen, i32::MAX).unwrap();
        assert_eq!(s.value(), i32::MAX);
        assert!(screen.row_text(0).starts_with("  [X] ──│ ["));
    }

    #[test]
    fn longest_track_is_accepted() {
        let s = Slider::new(0, 0, 1023, 1, "X").unwrap();
        assert_eq!(s.track_len(), MAX_TRACK_LEN);
    }

    #[test]
    fn single_point_range_is_valid() {
        let s = Slider::new(3, 3, 3, 1, "X").unwrap();
        assert_eq!(s.track_len(), 1);
    }

    #[test]
    fn channel_shape() {
        let s = rgb_slider(80);
        assert_eq!((s.minimum(), s.maximum(), s.step()), (0, 255, 8));
        assert_eq!(s.track_len(), 32);
    }

    // ── Quantization ────────────────────────────────────────────────────

    #[test]
    fn neighbouring_values_share_a_thumb_position() {
        assert_eq!(rgb_slider(8).thumb_position(), 1);
        assert_eq!(rgb_slider(12).thumb_position(), 1);
        assert_eq!(rgb_slider(15).thumb_position(), 1);
        assert_eq!(rgb_slider(16).thumb_position(), 2);
    }

    #[test]
    fn quantized_thumbs_paint_in_the_same_cell() {
        let mut a = ScreenDriver::new();
        rgb_slider(8).render(&mut a).unwrap();
        let mut b = ScreenDriver::new();
        rgb_slider(12).render(&mut b).unwrap();

        let (row_a, row_b) = (a.row_text(0), b.row_text(0));
        assert_eq!(thumb_column(&row_a), thumb_column(&row_b));
        assert!(row_a.ends_with("[  8  ]"));
        assert!(row_b.ends_with("[  12 ]"));
    }

    // ── Rendering ───────────────────────────────────────────────────────

    #[test]
    fn render_paints_label_track_and_value() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(8);
        s.render(&mut screen).unwrap();

        let expected = format!("  [R] ─│{} [  8  ]", "─".repeat(30));
        assert_eq!(screen.row_text(0), expected);
    }

    #[test]
    fn render_records_origin_and_leaves_cursor_after_text() {
        let mut screen = ScreenDriver::at(Position::new(8, 2));
        let mut s = rgb_slider(200);
        s.render(&mut screen).unwrap();

        assert_eq!(s.origin(), Some(Position::new(8, 2)));
        assert!(s.has_rendered());
        // 6 label + 32 track + 8 readout
        assert_eq!(screen.cursor(), Position::new(8 + 46, 2));
    }

    #[test]
    fn render_emits_no_line_break() {
        let mut screen = ScreenDriver::new();
        rgb_slider(1).render(&mut screen).unwrap();
        assert!(!screen.output().contains('\n'));
        assert!(!screen.output().contains('\r'));
    }

    #[test]
    fn selected_thumb_is_highlighted() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(0).with_selected(true);
        s.render(&mut screen).unwrap();

        assert!(screen.output().contains("\x1b[30;47m│\x1b[0m"));
        let thumb = screen.cell(Position::new(6, 0)).unwrap();
        assert_eq!(thumb.ch, '│');
        assert!(thumb.highlighted);
        assert!(!screen.cell(Position::new(7, 0)).unwrap().highlighted);
    }

    #[test]
    fn render_at_max_puts_thumb_last() {
        let mut screen = ScreenDriver::new();
        rgb_slider(255).render(&mut screen).unwrap();
        assert_eq!(thumb_column(&screen.row_text(0)), 6 + 31);
    }

    // ── set_value ───────────────────────────────────────────────────────

    #[test]
    fn set_value_in_range_is_exact() {
        let mut screen = ScreenDriver::new();
        let mut s = Slider::new(0, -10, 10, 3, "X").unwrap();
        for v in -10..=10 {
            s.set_value(&mut screen, v).unwrap();
            assert_eq!(s.value(), v);
        }
    }

    #[test]
    fn set_value_clamps() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(100);
        s.set_value(&mut screen, 999).unwrap();
        assert_eq!(s.value(), 255);
        s.set_value(&mut screen, -999).unwrap();
        assert_eq!(s.value(), 0);
        s.set_value(&mut screen, i32::MIN).unwrap();
        assert_eq!(s.value(), 0);
    }

    #[test]
    fn set_value_before_render_is_silent() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(10);
        s.set_value(&mut screen, 20).unwrap();
        assert_eq!(s.value(), 20);
        assert!(screen.calls().is_empty());
    }

    #[test]
    fn set_value_unchanged_touches_nothing() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(10);
        s.render(&mut screen).unwrap();
        screen.take_calls();

        s.set_value(&mut screen, 10).unwrap();
        assert!(screen.calls().is_empty());
    }

    #[test]
    fn set_value_clamped_to_current_touches_nothing() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(255);
        s.render(&mut screen).unwrap();
        screen.take_calls();

        s.set_value(&mut screen, 256).unwrap();
        assert!(screen.calls().is_empty());
    }

    #[test]
    fn set_value_repaints_in_place_and_restores_cursor() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(80);
        s.render(&mut screen).unwrap();
        screen.write("\r\nfooter").unwrap();
        let caller = screen.cursor();
        screen.take_calls();

        s.set_value(&mut screen, 81).unwrap();

        assert_eq!(
            screen.calls(),
            [
                Call::CursorPosition,
                Call::SetCursorPosition(Position::new(0, 0)),
                Call::Write(s.painted()),
                Call::SetCursorPosition(caller),
            ]
        );
        assert_eq!(screen.cursor(), caller);
        assert!(screen.row_text(0).ends_with("[  81 ]"));
        assert_eq!(screen.row_text(1), "footer");
    }

    #[test]
    fn repaint_matches_fresh_render() {
        let mut live = ScreenDriver::new();
        let mut s = rgb_slider(3);
        s.render(&mut live).unwrap();
        s.set_value(&mut live, 250).unwrap();

        let mut fresh = ScreenDriver::new();
        rgb_slider(250).render(&mut fresh).unwrap();

        assert_eq!(live.screen(), fresh.screen());
    }

    // ── set_selected ────────────────────────────────────────────────────

    #[test]
    fn set_selected_before_render_is_silent() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(0);
        s.set_selected(&mut screen, true).unwrap();
        assert!(s.is_selected());
        assert!(screen.calls().is_empty());
    }

    #[test]
    fn set_selected_always_repaints() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(0);
        s.render(&mut screen).unwrap();
        screen.take_calls();

        s.set_selected(&mut screen, false).unwrap();
        assert_eq!(screen.calls().len(), 4);
    }

    #[test]
    fn set_selected_toggles_highlight_on_screen() {
        let mut screen = ScreenDriver::new();
        let mut s = rgb_slider(0);
        s.render(&mut screen).unwrap();
        let thumb = Position::new(6, 0);
        assert!(!screen.cell(thumb).unwrap().highlighted);

        s.set_selected(&mut screen, true).unwrap();
        assert!(screen.cell(thumb).unwrap().highlighted);

        s.set_selected(&mut screen, false).unwrap();
        assert!(!screen.cell(thumb).unwrap().highlighted);
    }
}
