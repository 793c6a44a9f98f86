// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin reader with an optional timeout.
//
// The picker is single-threaded: every repaint completes before the next
// key is read, so there is no background thread here. The one place a
// timeout matters is the lone-ESC ambiguity — after an ESC byte we wait
// briefly for the rest of a sequence before calling it an Escape key.
// `poll()` on stdin's descriptor gives us that wait without a thread.

use std::io;
use std::time::Duration;

/// Byte chunk size for a single `read()`.
///
/// A keypress is 1-6 bytes and a cursor report under 16; 1 KB absorbs
/// a burst of auto-repeated arrows in one call.
const READ_BUF_SIZE: usize = 1024;

/// Blocking stdin reader.
pub struct StdinReader {
    buf: [u8; READ_BUF_SIZE],
}

impl StdinReader {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; READ_BUF_SIZE],
        }
    }

    /// Read the next chunk of bytes from stdin.
    ///
    /// With `timeout = None` this blocks until input arrives. With a
    /// timeout, returns `Ok(None)` if nothing arrived in time.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` when stdin is closed, or the OS error from
    /// `poll`/`read`.
    #[cfg(unix)]
    pub fn read(&mut self, timeout: Option<Duration>) -> io::Result<Option<&[u8]>> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();
        let timeout_ms = timeout.map_or(-1, |t| i32::try_from(t.as_millis()).unwrap_or(i32::MAX));

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, timeout_ms)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(None);
        }

        let n = unsafe { libc::read(fd, self.buf.as_mut_ptr().cast(), self.buf.len()) };

        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        if n == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
        Ok(Some(&self.buf[..n as usize]))
    }

    /// Non-unix fallback: a plain blocking read that ignores the timeout.
    #[cfg(not(unix))]
    pub fn read(&mut self, _timeout: Option<Duration>) -> io::Result<Option<&[u8]>> {
        use std::io::Read;

        match io::stdin().lock().read(&mut self.buf)? {
            0 => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
            n => Ok(Some(&self.buf[..n])),
        }
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_buf_size_reasonable() {
        assert!(READ_BUF_SIZE >= 64);
        assert!(READ_BUF_SIZE <= 65536);
    }

    #[test]
    fn reader_starts_zeroed() {
        let reader = StdinReader::new();
        assert!(reader.buf.iter().all(|&b| b == 0));
    }
}
