// SPDX-License-Identifier: MIT
//
// descape-tty — terminal handle queries.
//
// Answers two questions about a stream handle: is it connected to an
// interactive terminal, and is that terminal a legacy console emulation
// that cannot interpret VT escape sequences? The descape crate asks
// both exactly once, at stream acquisition, to decide between wrapping
// a sink in a stripping filter and passing it through untouched.
//
// Safety: terminal detection requires `isatty`, a POSIX interface with
// no safe equivalent. Each unsafe block is a single libc call.
#![allow(unsafe_code)]

#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};

// ─── Descriptor Queries ─────────────────────────────────────────────────────

/// Check whether a file descriptor is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_terminal(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

/// Check whether a file descriptor refers to a legacy console emulation
/// that cannot interpret VT escape sequences.
///
/// Unix terminals and pseudo-terminals interpret escape sequences
/// natively, so this always answers `false` here. The legacy case is
/// the pre-VT Windows console, which this build never encounters.
#[cfg(unix)]
#[must_use]
pub fn is_legacy_console(_fd: RawFd) -> bool {
    false
}

/// [`is_terminal`] for anything that exposes a raw file descriptor.
#[cfg(unix)]
#[must_use]
pub fn is_terminal_handle<T: AsRawFd>(handle: &T) -> bool {
    is_terminal(handle.as_raw_fd())
}

/// [`is_legacy_console`] for anything that exposes a raw file descriptor.
#[cfg(unix)]
#[must_use]
pub fn is_legacy_console_handle<T: AsRawFd>(handle: &T) -> bool {
    is_legacy_console(handle.as_raw_fd())
}

// ─── Standard Stream Queries ────────────────────────────────────────────────
//
// On non-Unix targets no probe is available without the platform
// console API, so every query answers `false` (not a terminal).

/// Whether stdin is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn stdin_is_terminal() -> bool {
    is_terminal(libc::STDIN_FILENO)
}

#[cfg(not(unix))]
#[must_use]
pub fn stdin_is_terminal() -> bool {
    false
}

/// Whether stdout is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn stdout_is_terminal() -> bool {
    is_terminal(libc::STDOUT_FILENO)
}

#[cfg(not(unix))]
#[must_use]
pub fn stdout_is_terminal() -> bool {
    false
}

/// Whether stderr is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn stderr_is_terminal() -> bool {
    is_terminal(libc::STDERR_FILENO)
}

#[cfg(not(unix))]
#[must_use]
pub fn stderr_is_terminal() -> bool {
    false
}

/// Whether stdout is a legacy console emulation. See [`is_legacy_console`].
#[cfg(unix)]
#[must_use]
pub fn stdout_is_legacy_console() -> bool {
    is_legacy_console(libc::STDOUT_FILENO)
}

#[cfg(not(unix))]
#[must_use]
pub fn stdout_is_legacy_console() -> bool {
    false
}

/// Whether stderr is a legacy console emulation. See [`is_legacy_console`].
#[cfg(unix)]
#[must_use]
pub fn stderr_is_legacy_console() -> bool {
    is_legacy_console(libc::STDERR_FILENO)
}

#[cfg(not(unix))]
#[must_use]
pub fn stderr_is_legacy_console() -> bool {
    false
}

// ─── Tests ──────────────────────────────────────────────────────────────────
