//! Interactive line-oriented session over a [`Board`].
//!
//! Reads one command per line, applies it, then prints whatever notices the
//! board queued. Blank lines are ignored, unknown commands print an error and
//! the session carries on, and end of input ends the session.
//!
//! ```text
//! > add cats/tom.jpg
//! Photo added: cats/tom.jpg
//! > add cats/tom.jpg
//! error: photo is already in the gallery: cats/tom.jpg
//! > clear
//! Clear the whole gallery? This cannot be undone. [y/N]
//! > y
//! Gallery cleared
//! ```
//!
//! Generic over the reader and writer so tests drive it with in-memory
//! buffers.

use crate::board::Board;
use crate::export::replaces_entry_document;
use crate::output;
use crate::probe::ImageProbe;
use crate::render::PageOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(String),
    List,
    /// Export, optionally to a file name other than the configured one.
    Export(Option<String>),
    Clear,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one input line. Returns `None` for blank lines.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word {
        "add" => Command::Add(rest.to_string()),
        "remove" | "rm" => Command::Remove(rest.to_string()),
        "list" | "ls" => Command::List,
        "export" if rest.is_empty() => Command::Export(None),
        "export" => Command::Export(Some(rest.to_string())),
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}

const HELP: &str = "\
Commands:
  add <path>       add a photo (checked before it is kept)
  remove <path>    remove a photo
  list             show the gallery
  export [file]    write the static gallery page
  clear            remove every photo (asks first)
  help             show this help
  quit             leave the session";

/// Where the session writes exports.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub dir: PathBuf,
    pub export_filename: String,
    pub options: PageOptions,
}

/// Run commands from `input` until `quit` or end of input.
pub fn run_session<P, R, W>(
    board: &mut Board<P>,
    context: &SessionContext,
    mut input: R,
    out: &mut W,
) -> io::Result<()>
where
    P: ImageProbe,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Type 'help' for commands.")?;
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let Some(command) = parse_command(&line) else {
            continue;
        };
        log::debug!("session command: {command:?}");
        match command {
            Command::Add(raw) => {
                // Outcome is reported through the queued notice.
                let _ = board.submit(&raw);
            }
            Command::Remove(raw) => {
                board.remove(&raw);
            }
            Command::List => {
                for l in output::format_cards(board.cards()) {
                    writeln!(out, "{l}")?;
                }
            }
            Command::Export(file) => {
                let filename = file.unwrap_or_else(|| context.export_filename.clone());
                let target = context.dir.join(&filename);
                match std::fs::write(&target, board.export(&context.options)) {
                    Ok(()) => {
                        let summary = output::format_export_summary(
                            board.state().len(),
                            &target,
                            replaces_entry_document(&filename),
                        );
                        for l in summary {
                            writeln!(out, "{l}")?;
                        }
                    }
                    Err(e) => writeln!(out, "error: cannot write {}: {e}", target.display())?,
                }
            }
            Command::Clear => {
                write!(out, "Clear the whole gallery? This cannot be undone. [y/N] ")?;
                out.flush()?;
                let mut answer = String::new();
                input.read_line(&mut answer)?;
                if confirmed(&answer) {
                    board.clear();
                } else {
                    writeln!(out, "Clear cancelled")?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => break,
            Command::Unknown(word) => {
                writeln!(out, "error: unknown command '{word}' (try 'help')")?;
            }
        }
        for l in output::format_notices(&board.take_notices()) {
            writeln!(out, "{l}")?;
        }
    }
    Ok(())
}

/// `y` or `yes`, any case.
pub fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
