// SPDX-License-Identifier: MIT
//
// chroma-term — Terminal driver for chroma-pick.
//
// The layer between the widgets and a real TTY: ANSI encoding, raw mode,
// input parsing, and the `Driver` trait the widgets are written against.
// Widgets draw inline in the normal screen buffer, so this crate never
// takes over the whole screen; it hides the cursor, reads keys, and
// answers "where is the cursor?" by asking the terminal.
//
// `ScreenDriver` is a full in-memory implementation of `Driver`, used by
// every widget test in the workspace.

pub mod ansi;
pub mod color;
pub mod driver;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod screen;
pub mod terminal;
