use std::io::{self, BufRead, Write};

use crate::cli::output::format_command_error;
use crate::ops::dispatch::{CommandError, Reply, Session};
use crate::parse::{Command, ParseError};

/// Run the read loop: greet, then execute one line at a time until `bye`
/// or end of input. Each reply is written as a block followed by a blank
/// line. Command errors, including a line that is not UTF-8, are shown
/// and the loop carries on.
pub fn run_interactive<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    write_reply(&mut output, session.execute(Command::Welcome))?;

    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let result = match std::str::from_utf8(&buf) {
            Ok(line) => session.handle_line(line.trim_end_matches(['\n', '\r'])),
            Err(_) => Err(ParseError::InvalidEncoding.into()),
        };
        write_reply(&mut output, result)?;
        if session.is_exited() {
            break;
        }
    }
    Ok(())
}

fn write_reply<W: Write>(out: &mut W, result: Result<Reply, CommandError>) -> io::Result<()> {
    let text = match result {
        Ok(reply) => reply.render(),
        Err(e) => format_command_error(&e),
    };
    writeln!(out, "{}", text)?;
    writeln!(out)?;
    out.flush()
}
