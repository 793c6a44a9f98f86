// SPDX-License-Identifier: MIT
//
// ColorPicker — three channel sliders under one live color swatch.
//
//     ████████  [R] ──────────│───────────────────── [  80 ]
//     ████████  [G] ─────────────────────────│────── [ 200 ]
//     ████████  [B] ───────────────│──────────────── [ 120 ]
//
// The picker owns its sliders outright and keeps a cached copy of their
// values as an `Rgb`; every write path updates both. Exactly one slider
// is selected, and it is always `sliders[selected]`. Selection moves are
// done here by calling `set_selected` on the two sliders involved, so a
// slider never needs to know about its siblings or its parent.
//
// Layout note: rows end with "\r\n", so only the first row starts at the
// picker's origin column; the others start at column 0. A repaint replays
// the same sequence from the same origin and therefore lands on the same
// cells.

use std::io;

use chroma_term::color::Rgb;
use chroma_term::driver::Driver;
use chroma_term::terminal::Position;
use tracing::{debug, trace};

use crate::cursor::CursorGuard;
use crate::paint::{self, LINE_BREAK};
use crate::slider::Slider;

/// Slider labels, in row order.
pub const LABELS: [&str; 3] = ["R", "G", "B"];

/// Number of terminal rows a rendered picker occupies.
pub const ROWS: u16 = 3;

/// Color shown when no initial color is given.
pub const DEFAULT_COLOR: Rgb = Rgb::new(80, 200, 120);

/// An RGB color picker drawn in place in the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPicker {
    color: Rgb,
    sliders: [Slider; 3],
    selected: usize,
    origin: Option<Position>,
}

impl ColorPicker {
    /// A picker showing `(r, g, b)` with the red slider selected.
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self::from_color(Rgb::new(r, g, b))
    }

    #[must_use]
    pub fn from_color(color: Rgb) -> Self {
        let [r, g, b] = color.channels();
        Self {
            color,
            sliders: [
                Slider::channel(r, LABELS[0]).with_selected(true),
                Slider::channel(g, LABELS[1]),
                Slider::channel(b, LABELS[2]),
            ],
            selected: 0,
            origin: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub const fn red(&self) -> u8 {
        self.color.r
    }

    #[must_use]
    pub const fn green(&self) -> u8 {
        self.color.g
    }

    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.color.b
    }

    #[must_use]
    pub const fn sliders(&self) -> &[Slider; 3] {
        &self.sliders
    }

    /// Index of the selected slider (0 = R, 1 = G, 2 = B).
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub const fn origin(&self) -> Option<Position> {
        self.origin
    }

    #[must_use]
    pub const fn has_rendered(&self) -> bool {
        self.origin.is_some()
    }

    // ── Drawing ─────────────────────────────────────────────────────────

    /// Paint all three rows starting at the current cursor position.
    ///
    /// Leaves the cursor at the start of the line below the picker.
    ///
    /// # Errors
    ///
    /// Propagates driver errors.
    pub fn render<D: Driver + ?Sized>(&mut self, driver: &mut D) -> io::Result<()> {
        let origin = driver.cursor_position()?;
        self.origin = Some(origin);
        debug!(col = origin.col, row = origin.row, color = %self.color, "picker render");

        let swatch = paint::swatch(self.color);
        for slider in &mut self.sliders {
            driver.write(&swatch)?;
            slider.render(driver)?;
            driver.write(LINE_BREAK)?;
        }
        Ok(())
    }

    /// Set the color, clamping each channel into `0..=255`.
    ///
    /// An unchanged color touches nothing. Otherwise the sliders are
    /// synced and, if rendered, all three rows are repainted with the new
    /// swatch color and the caller's cursor is restored.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaint.
    pub fn update<D: Driver + ?Sized>(
        &mut self,
        driver: &mut D,
        r: i32,
        g: i32,
        b: i32,
    ) -> io::Result<()> {
        let color = Rgb::new(
            paint::clamp_channel(r),
            paint::clamp_channel(g),
            paint::clamp_channel(b),
        );
        if color == self.color {
            trace!(%color, "picker color unchanged");
            return Ok(());
        }
        self.color = color;

        let Some(origin) = self.origin else {
            for (slider, channel) in self.sliders.iter_mut().zip(color.channels()) {
                slider.set_value(driver, i32::from(channel))?;
            }
            return Ok(());
        };

        debug!(%color, "picker repaint");

        let mut guard = CursorGuard::save(driver)?;
        guard.set_cursor_position(origin)?;

        let swatch = paint::swatch(color);
        for (slider, channel) in self.sliders.iter_mut().zip(color.channels()) {
            guard.write(&swatch)?;
            slider.set_value(&mut *guard, i32::from(channel))?;
            guard.write(LINE_BREAK)?;
        }

        guard.restore()
    }

    /// Move the selection one slider up. No-op on the first slider.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaints.
    pub fn select_up<D: Driver + ?Sized>(&mut self, driver: &mut D) -> io::Result<()> {
        match self.selected.checked_sub(1) {
            Some(to) => self.move_selection(driver, to),
            None => Ok(()),
        }
    }

    /// Move the selection one slider down. No-op on the last slider.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaints.
    pub fn select_down<D: Driver + ?Sized>(&mut self, driver: &mut D) -> io::Result<()> {
        let to = self.selected + 1;
        if to < self.sliders.len() {
            self.move_selection(driver, to)
        } else {
            Ok(())
        }
    }

    /// Decrease the selected channel by one.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaint.
    pub fn select_left<D: Driver + ?Sized>(&mut self, driver: &mut D) -> io::Result<()> {
        self.nudge(driver, -1)
    }

    /// Increase the selected channel by one.
    ///
    /// # Errors
    ///
    /// Propagates driver errors from the repaint.
    pub fn select_right<D: Driver + ?Sized>(&mut self, driver: &mut D) -> io::Result<()> {
        self.nudge(driver, 1)
    }

    fn move_selection<D: Driver + ?Sized>(&mut self, driver: &mut D, to: usize) -> io::Result<()> {
        debug!(from = self.selected, to, "selection moved");
        self.sliders[self.selected].set_selected(driver, false)?;
        self.selected = to;
        self.sliders[to].set_selected(driver, true)
    }

    fn nudge<D: Driver + ?Sized>(&mut self, driver: &mut D, delta: i32) -> io::Result<()> {
        let mut channels = self.color.channels().map(i32::from);
        channels[self.selected] += delta;
        let [r, g, b] = channels;
        self.update(driver, r, g, b)
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::from_color(DEFAULT_COLOR)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
