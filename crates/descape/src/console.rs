// SPDX-License-Identifier: MIT
//
// Console acquisition: the wrap-or-passthrough decision.
//
// Most destinations either interpret escape sequences themselves (a
// Unix terminal) or store them faithfully (a file, a pipe). Both get
// the raw stream. The exception is an interactive handle on a legacy
// console emulation with no VT support: leaving sequences in would
// print them as garbage, so that one case gets a stripping filter.
//
// The decision is made once, when the handle is built, and never
// revisited. A stream redirected mid-run keeps the behavior it
// started with.

use std::io::{self, Stderr, Stdout, Write};

use tracing::{debug, trace};

use crate::seq::Strip;
use crate::writer::Writer;

// ─── Console ────────────────────────────────────────────────────────────────

/// A write handle carrying the made-once wrap decision.
///
/// Built by [`auto`](Console::auto), or by the [`stdout`](Console::stdout)
/// and [`stderr`](Console::stderr) shorthands which query the real
/// process streams. Used like any other writer.
pub enum Console<W: Write> {
    /// The destination handles escape sequences itself; bytes pass
    /// through untouched.
    Passthrough(W),
    /// The destination would misrender sequences; they are stripped.
    Stripped(Writer<W>),
}

impl<W: Write> Console<W> {
    /// Decide once whether `sink` needs stripping.
    ///
    /// Only an interactive handle on a legacy console emulation gets
    /// the filter; everything else receives the stream as written.
    /// `descape_tty` answers the two questions for real handles.
    #[must_use]
    pub fn auto(sink: W, interactive: bool, legacy: bool) -> Self {
        if interactive && legacy {
            debug!("legacy console, stripping escape sequences");
            Self::Stripped(Writer::new(sink, Strip::all()))
        } else {
            trace!(interactive, legacy, "passing escape sequences through");
            Self::Passthrough(sink)
        }
    }

    /// Whether this handle strips sequences.
    #[inline]
    #[must_use]
    pub const fn is_stripped(&self) -> bool {
        matches!(self, Self::Stripped(_))
    }

    /// Unwrap, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> W {
        match self {
            Self::Passthrough(sink) => sink,
            Self::Stripped(writer) => writer.into_inner(),
        }
    }
}

impl Console<Stdout> {
    /// A console handle for the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::auto(
            io::stdout(),
            descape_tty::stdout_is_terminal(),
            descape_tty::stdout_is_legacy_console(),
        )
    }
}

impl Console<Stderr> {
    /// A console handle for the process's standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::auto(
            io::stderr(),
            descape_tty::stderr_is_terminal(),
            descape_tty::stderr_is_legacy_console(),
        )
    }
}

impl<W: Write> Write for Console<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(sink) => sink.write(buf),
            Self::Stripped(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Passthrough(sink) => sink.flush(),
            Self::Stripped(writer) => writer.flush(),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
