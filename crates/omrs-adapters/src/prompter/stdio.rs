use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Mutex;

use omrs_core::{
    application::{ApplicationError, ports::Prompter},
    error::SdkResult,
};
use tracing::warn;

/// Asks on a writer and reads one line per answer from a reader.
///
/// A blank line, or end of input, selects the default.
pub struct StdioPrompter<R, W> {
    io: Mutex<(R, W)>,
}

impl StdioPrompter<BufReader<Stdin>, Stdout> {
    /// Prompter on the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(io) => io,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn prompt_failed(e: impl ToString) -> ApplicationError {
    ApplicationError::PromptFailed {
        reason: e.to_string(),
    }
}

impl<R, W> Prompter for StdioPrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask(&self, prompt: &str, default: Option<&str>) -> SdkResult<String> {
        let mut guard = self.io.lock().map_err(prompt_failed)?;
        let (reader, writer) = &mut *guard;

        let written = match default {
            Some(d) if !d.is_empty() => write!(writer, "{prompt} (default: '{d}'): "),
            _ => write!(writer, "{prompt}: "),
        };
        written
            .and_then(|()| writer.flush())
            .map_err(prompt_failed)?;

        let mut line = String::new();
        reader.read_line(&mut line).map_err(prompt_failed)?;
        let answer = line.trim();

        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        match default {
            Some(d) => Ok(d.to_string()),
            None => Err(ApplicationError::MissingAnswer {
                prompt: prompt.to_string(),
            }
            .into()),
        }
    }

    fn show(&self, message: &str) {
        let Ok(mut guard) = self.io.lock() else {
            return;
        };
        if let Err(e) = writeln!(guard.1, "{message}") {
            warn!(error = %e, "Could not write to prompt output");
        }
    }
}
