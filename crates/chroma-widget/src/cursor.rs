// SPDX-License-Identifier: MIT
//
// Scoped save/restore of the terminal cursor.
//
// Every in-place repaint has the same shape: remember where the caller's
// cursor is, jump to the widget's origin, paint, jump back. `CursorGuard`
// owns that shape. It borrows the driver for its whole lifetime, so no
// other code can write between the save and the restore, and it puts the
// cursor back on drop if the repaint bails out early with `?`.

use std::io;
use std::ops::{Deref, DerefMut};

use chroma_term::driver::Driver;
use chroma_term::terminal::Position;

/// Holds the driver between a cursor save and its restore.
///
/// Derefs to the driver, so painting code writes through the guard.
/// Prefer [`restore`](Self::restore) on the success path: it reports the
/// error from the final cursor move, which `Drop` has to discard.
pub struct CursorGuard<'a, D: Driver + ?Sized> {
    driver: &'a mut D,
    saved: Position,
    restored: bool,
}

impl<'a, D: Driver + ?Sized> CursorGuard<'a, D> {
    /// Record the current cursor position.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the position cannot be read.
    pub fn save(driver: &'a mut D) -> io::Result<Self> {
        let saved = driver.cursor_position()?;
        Ok(Self {
            driver,
            saved,
            restored: false,
        })
    }

    /// Where the cursor will be put back.
    #[must_use]
    pub const fn saved(&self) -> Position {
        self.saved
    }

    /// Move the cursor back to the saved position.
    ///
    /// # Errors
    ///
    /// Returns the driver's error from the cursor move.
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        self.driver.set_cursor_position(self.saved)
    }
}

impl<D: Driver + ?Sized> Deref for CursorGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.driver
    }
}

impl<D: Driver + ?Sized> DerefMut for CursorGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.driver
    }
}

impl<D: Driver + ?Sized> Drop for CursorGuard<'_, D> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.driver.set_cursor_position(self.saved);
        }
    }
}
