// SPDX-License-Identifier: MIT
//
// Input-side stream filter.
//
// Wraps any `io::Read` source and removes the configured escape
// sequence categories from everything read through it. Filtering can
// shrink or hold back data, so one source chunk does not map onto one
// `read` result: surviving bytes are staged internally and handed out
// at whatever pace the caller's buffer allows.
//
// The staging enforces the ordering rules:
//
// - Staged bytes go out before the source is touched again, so a
//   short destination buffer never stalls or reorders output.
// - A chunk that filters down to nothing triggers another source read
//   rather than a return of 0, which the caller would take for end of
//   stream.
// - End of stream and source errors surface only once every byte
//   derivable so far has been handed out. A sequence still
//   unterminated when the source ends is dropped without comment, the
//   same policy as the write side.

use std::io::{self, Read};

use crate::seq::{Scanner, Strip};

/// Scratch chunk size for each pull from the source.
const CHUNK_SIZE: usize = 4096;

// ─── Reader ─────────────────────────────────────────────────────────────────

/// An `io::Read` adapter that filters escape sequences on the way from
/// its source.
///
/// `read` never reports 0 while filtered bytes can still be produced,
/// and never blocks on the source while staged bytes wait. A source
/// error is returned as-is, `Interrupted` included; retrying is the
/// caller's decision.
///
/// # Example
///
/// ```
/// use std::io::Read;
///
/// use descape::{Reader, Strip};
///
/// let source: &[u8] = b"\x1b[2J\x1b[1;31mhello\x1b[0m world";
/// let mut plain = String::new();
/// Reader::new(source, Strip::all()).read_to_string(&mut plain)?;
/// assert_eq!(plain, "hello world");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Reader<R: Read> {
    source: R,
    strip: Strip,
    scanner: Scanner,
    /// Filtered bytes awaiting delivery; `ready_pos` marks how far the
    /// caller has consumed.
    ready: Vec<u8>,
    ready_pos: usize,
}

impl<R: Read> Reader<R> {
    /// Wrap `source`, removing the categories `strip` names.
    #[must_use]
    pub fn new(source: R, strip: Strip) -> Self {
        Self {
            source,
            strip,
            scanner: Scanner::new(),
            ready: Vec::new(),
            ready_pos: 0,
        }
    }

    /// The suppression policy this reader was built with.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> Strip {
        self.strip
    }

    /// Borrow the underlying source.
    #[inline]
    #[must_use]
    pub const fn get_ref(&self) -> &R {
        &self.source
    }

    /// Mutably borrow the underlying source.
    ///
    /// Reading from the source directly bypasses the filter.
    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Unwrap, returning the source.
    ///
    /// Staged filtered bytes and any unfinished sequence are discarded.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Copy staged bytes into `dst`, releasing the stage once drained.
    fn deliver(&mut self, dst: &mut [u8]) -> usize {
        let staged = &self.ready[self.ready_pos..];
        let n = staged.len().min(dst.len());
        dst[..n].copy_from_slice(&staged[..n]);
        self.ready_pos += n;
        if self.ready_pos == self.ready.len() {
            self.ready.clear();
            self.ready_pos = 0;
        }
        n
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }

        loop {
            // Staged bytes go out before the source is touched again.
            if self.ready_pos < self.ready.len() {
                return Ok(self.deliver(dst));
            }

            let mut chunk = [0u8; CHUNK_SIZE];
            let n = self.source.read(&mut chunk)?;
            if n == 0 {
                // End of stream. An unterminated sequence is dropped,
                // and scanning restarts clean if the source grows later.
                self.scanner.reset();
                return Ok(0);
            }

            let Self {
                scanner,
                strip,
                ready,
                ..
            } = self;
            scanner.scan(&chunk[..n], *strip, |bytes| {
                ready.extend_from_slice(bytes);
                Ok(())
            })?;
            // The chunk may have filtered down to nothing; loop for
            // more rather than reporting a false end of stream.
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
