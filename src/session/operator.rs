//! The person on the other side of a session.

use std::io::{BufRead, Write};

use crate::RetroResult;

/// Source of user input for a session.
pub trait Operator {
    /// Reads one line of input. `None` means the input has ended.
    fn read_line(&mut self, prompt: &str) -> RetroResult<Option<String>>;

    /// Asks a yes/no question.
    fn confirm(&mut self, prompt: &str) -> RetroResult<bool>;
}

/// Operator reading plain lines, for piped input and scripted sessions.
///
/// A confirmation is accepted when the answer line is `yes` or `y`.
pub struct LineOperator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineOperator<R, W> {
    /// Reads from `input`, writing prompts to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, prompt: &str) -> RetroResult<()> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Operator for LineOperator<R, W> {
    fn read_line(&mut self, prompt: &str) -> RetroResult<Option<String>> {
        self.prompt(prompt)?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, prompt: &str) -> RetroResult<bool> {
        let answer = self.read_line(&format!("{} (yes/no)", prompt))?;
        Ok(matches!(
            answer.map(|a| a.to_lowercase()).as_deref(),
            Some("yes") | Some("y")
        ))
    }
}
