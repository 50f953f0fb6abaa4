// SPDX-License-Identifier: MIT
//
// descape — escape sequence filtering for byte streams.
//
// Terminal escape sequences travel inside ordinary byte streams, and
// not every destination wants them. Piped output and log files read
// better with the control bytes gone, and a console without VT
// support renders them as garbage. This crate recognizes CSI
// sequences (`ESC [` through the letter that closes them) in
// arbitrarily chunked data and removes them selectively: everything,
// a chosen set of categories, or nothing.
//
// `Writer` filters on the way into an `io::Write` sink, `Reader` on
// the way out of an `io::Read` source. Both recognize sequences split
// across any call boundary and never forward half of one. `Console`
// wraps stdout or stderr with the wrap-or-passthrough decision made
// once, from the terminal queries in `descape-tty`.
//
// The filter never interprets a sequence. Category is terminator
// identity, nothing more; cursor math and color state are someone
// else's job.

pub mod console;
pub mod reader;
pub mod seq;
pub mod writer;

pub use console::Console;
pub use reader::Reader;
pub use seq::{Strip, Tag, TagSet};
pub use writer::Writer;
