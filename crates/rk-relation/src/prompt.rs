//! Interactive confirmation for destructive operations.

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Answer to a yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
}

impl Choice {
    /// Parse an answer; blank input is `None`, so is anything unrecognised
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Choice::Yes),
            "n" | "no" => Some(Choice::No),
            _ => None,
        }
    }

    fn options(self) -> &'static str {
        match self {
            Choice::Yes => "[Yes/no]",
            Choice::No => "[yes/No]",
        }
    }
}

/// Asks the user to confirm, and shows them what is at stake
pub trait Prompt: Send + Sync {
    /// Ask a yes/no question; `default` answers a blank reply
    fn ask(&self, message: &str, default: Choice) -> Choice;

    /// Display an informational line
    fn show(&self, message: &str);
}

/// Prompt on a line-oriented reader/writer pair.
///
/// Unrecognised replies repeat the question. End of input or a read error
/// yields the default.
pub struct LinePrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead + Send, W: Write + Send> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    /// Consume the prompt, returning the reader and writer
    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(io) => io,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompt for LinePrompt<R, W> {
    fn ask(&self, message: &str, default: Choice) -> Choice {
        let Ok(mut io) = self.io.lock() else {
            return default;
        };
        let (reader, writer) = &mut *io;
        loop {
            if write!(writer, "{message} {} ", default.options())
                .and_then(|()| writer.flush())
                .is_err()
            {
                return default;
            }
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => return default,
                Ok(_) if line.trim().is_empty() => return default,
                Ok(_) => {
                    if let Some(choice) = Choice::parse(&line) {
                        return choice;
                    }
                }
            }
        }
    }

    fn show(&self, message: &str) {
        if let Ok(mut io) = self.io.lock() {
            // Display failures are not actionable here.
            let _ = writeln!(io.1, "{message}");
        }
    }
}

/// Prompt on the process's stdin and stdout
pub type StdinPrompt = LinePrompt<io::BufReader<io::Stdin>, io::Stdout>;

impl Default for StdinPrompt {
    fn default() -> Self {
        LinePrompt::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

/// Prompt that always gives the same answer and records what it was shown
#[derive(Debug)]
pub struct FixedPrompt {
    answer: Choice,
    transcript: Mutex<Vec<String>>,
}

impl FixedPrompt {
    pub fn new(answer: Choice) -> Self {
        Self {
            answer,
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Always answers yes
    pub fn yes() -> Self {
        Self::new(Choice::Yes)
    }

    /// Always answers no
    pub fn no() -> Self {
        Self::new(Choice::No)
    }

    /// Every question asked and line shown, in order
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn record(&self, message: &str) {
        if let Ok(mut t) = self.transcript.lock() {
            t.push(message.to_string());
        }
    }
}

impl Prompt for FixedPrompt {
    fn ask(&self, message: &str, _default: Choice) -> Choice {
        self.record(message);
        self.answer
    }

    fn show(&self, message: &str) {
        self.record(message);
    }
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
