use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::BufRead;

/// Prompt shown before each read in interactive mode.
pub const PROMPT: &str = "$ ";

/// What a single read from a [`LineSource`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line without its trailing newline.
    Line(String),
    /// The user pressed Ctrl-C while the line was being typed.
    Interrupted,
    Eof,
}

/// Where the read-eval loop gets its input from.
pub trait LineSource {
    fn read_line(&mut self) -> Result<ReadOutcome>;
}

/// Terminal-backed reader that prints [`PROMPT`] before every line.
///
/// Lines are not added to any history.
pub struct TerminalLines {
    editor: DefaultEditor,
}

impl TerminalLines {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("failed to initialise the terminal")?;
        Ok(Self { editor })
    }
}

impl LineSource for TerminalLines {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        match self.editor.readline(PROMPT) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(err).context("failed to read from the terminal"),
        }
    }
}

/// Prompt-less reader over any buffered input: piped stdin, a script file or
/// the text given with `-c`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub struct BufferedLines<R> {
    reader: R,
}

impl<R: BufRead> BufferedLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for BufferedLines<R> {
    fn read_line(&mut self) -> Result<ReadOutcome> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(ReadOutcome::Eof);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(ReadOutcome::Line(String::from_utf8_lossy(&buf).into_owned()))
    }
}
