// SPDX-License-Identifier: MIT
//
// chroma-widget — in-place terminal widgets for chroma-pick.
//
// Two widgets, written against the `Driver` trait from chroma-term:
//
//   Slider      → one bounded value, drawn as label + track + readout
//   ColorPicker → three channel sliders and a swatch in the live color
//
// Both render once at the cursor, remember where, and from then on repaint
// only their own cells, returning the cursor to wherever the caller had it.
// Values are clamped, never rejected; only a slider's construction can fail.

pub mod cursor;
pub mod error;
pub mod paint;
pub mod picker;
pub mod slider;

pub use error::SliderError;
pub use picker::ColorPicker;
pub use slider::Slider;
