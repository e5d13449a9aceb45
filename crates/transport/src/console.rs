//! Built-in transport that writes messages to the process console.

use std::io::{self, Write};

use level::{Level, LevelValue, LogLevels};

use crate::{Message, Transport, action::{ActionResult, SyncFn}};

/// Id under which the console transport is registered.
pub const CONSOLE_TRANSPORT_ID: &str = "console";

/// Creates a transport printing `<date> [<LABEL>] <message>` lines.
///
/// Messages carrying the `ERROR` bit go to stderr, everything else to stdout.
pub fn console(levels: impl LevelValue) -> Transport {
    Transport::from_parts(CONSOLE_TRANSPORT_ID, Level::new(levels), SyncFn(write_line))
}

fn write_line(message: &Message) -> ActionResult {
    if message.level() & LogLevels::ERROR != 0 {
        writeln!(io::stderr().lock(), "{message}")?;
    } else {
        writeln!(io::stdout().lock(), "{message}")?;
    }
    Ok(true)
}
