// SPDX-License-Identifier: MIT
//
// Output-side stream filter.
//
// Wraps any `io::Write` destination and removes the configured escape
// sequence categories from everything written through it. The filter
// is transparent to the caller: `write` always reports the full input
// length as consumed, whatever fraction of it was forwarded, so this
// type drops into code that writes to a plain sink today.
//
// Chunk boundaries carry no meaning. A styled word like
// `ESC [ 3 1 m o k` may arrive as seven separate writes, and the
// filter treats them exactly like one. The scanner keeps the
// unfinished sequence between calls; nothing is forwarded for it until
// the terminator decides whether the sequence survives.
//
// Literal data goes to the sink in runs straight out of the caller's
// buffer. The only bytes the filter ever copies are the pending
// sequence bytes themselves.

use std::io::{self, Write};

use crate::seq::{Scanner, Strip};

// ─── Writer ─────────────────────────────────────────────────────────────────

/// An `io::Write` adapter that filters escape sequences on the way to
/// its sink.
///
/// `write` consumes the entire input on success. A sink error surfaces
/// unchanged and is fatal for this destination: bytes forwarded before
/// the error stay forwarded, and no retry is attempted here.
///
/// # Example
///
/// ```
/// use std::io::Write;
///
/// use descape::{Strip, Writer};
///
/// let mut out = Writer::new(Vec::new(), Strip::all());
/// out.write_all(b"\x1b[1;31mwarning\x1b[0m: disk full")?;
/// assert_eq!(out.get_ref().as_slice(), b"warning: disk full");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Writer<W: Write> {
    sink: W,
    strip: Strip,
    scanner: Scanner,
}

impl<W: Write> Writer<W> {
    /// Wrap `sink`, removing the categories `strip` names.
    #[must_use]
    pub fn new(sink: W, strip: Strip) -> Self {
        Self {
            sink,
            strip,
            scanner: Scanner::new(),
        }
    }

    /// The suppression policy this writer was built with.
    #[inline]
    #[must_use]
    pub const fn policy(&self) -> Strip {
        self.strip
    }

    /// Borrow the underlying sink.
    #[inline]
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Mutably borrow the underlying sink.
    ///
    /// Writing to the sink directly bypasses the filter.
    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Unwrap, returning the sink.
    ///
    /// Bytes of an unfinished sequence still buffered in the filter
    /// are discarded, matching end-of-stream handling on the read side.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Write for Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Self {
            sink,
            strip,
            scanner,
        } = self;
        scanner.scan(buf, *strip, |bytes| sink.write_all(bytes))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
