// SPDX-License-Identifier: MIT
//
// Key loop — read a key, hand it to the application, repeat.
//
// The picker repaints synchronously inside each key handler, so there is
// no frame buffer, tick, or dirty flag here. The loop blocks on the
// driver, dispatches, and exits when the application says so or input
// closes.

use std::io;

use tracing::trace;

use crate::driver::{Driver, Key};

/// What the application tells the loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep reading keys.
    Continue,
    /// Exit the loop cleanly.
    Quit,
}

/// Application interface for [`run`].
pub trait App {
    /// Handle one key. Repaints go through `driver`.
    ///
    /// # Errors
    ///
    /// Returns an error if repainting fails; the loop stops and
    /// propagates it.
    fn on_key(&mut self, driver: &mut dyn Driver, key: Key) -> io::Result<Action>;
}

/// Run the key loop until `app` returns [`Action::Quit`].
///
/// # Errors
///
/// Returns the first error from reading a key or from the app.
pub fn run(driver: &mut dyn Driver, app: &mut impl App) -> io::Result<()> {
    loop {
        let key = driver.read_key()?;
        trace!(?key, "key");
        if app.on_key(driver, key)? == Action::Quit {
            return Ok(());
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
