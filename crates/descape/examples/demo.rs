// SPDX-License-Identifier: MIT
//
// descape demo — one styled line rendered under three policies.
//
// Writes a colored status line raw, with colors stripped, and with
// every sequence stripped, then shows the decision `Console::stdout()`
// made for this process. Pipe the output through `cat -v` or redirect
// it to a file to see exactly which escape bytes survive each policy.
//
// Usage:
//   cargo run -p descape --example demo

use std::io::{self, Write};

use descape::{Console, Strip, TagSet, Writer};

/// A status line mixing colors (`m`) with a line clear (`K`).
const SAMPLE: &[u8] =
    b"\x1b[1;32mpassed\x1b[0m 48  \x1b[1;31mfailed\x1b[0m 2  skipped 1\x1b[K\n";

fn main() -> io::Result<()> {
    println!("raw:");
    io::stdout().write_all(SAMPLE)?;

    println!("colors stripped:");
    let mut colorless = Writer::new(io::stdout(), Strip::tags(TagSet::SGR));
    colorless.write_all(SAMPLE)?;
    colorless.flush()?;

    println!("everything stripped:");
    let mut plain = Writer::new(io::stdout(), Strip::all());
    plain.write_all(SAMPLE)?;
    plain.flush()?;

    let decision = if Console::stdout().is_stripped() {
        "strip"
    } else {
        "passthrough"
    };
    println!(
        "Console::stdout() decided: {decision} (terminal: {}, legacy console: {})",
        descape_tty::stdout_is_terminal(),
        descape_tty::stdout_is_legacy_console(),
    );

    Ok(())
}
