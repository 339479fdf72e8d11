//! Interactive confirmation
//!
//! Destructive steps ask before they run. The workflow only sees the
//! [`Confirm`] trait, so tests can answer without a terminal.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{NiftiFixError, Result};

/// Something that can answer a yes/no question.
pub trait Confirm {
    /// Show `message` and report whether the answer was affirmative.
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// An answer is affirmative when it contains a `y`, in any case.
pub fn is_affirmative(answer: &str) -> bool {
    answer.to_lowercase().contains('y')
}

/// Asks on a writer and reads the answer line from a reader.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirm<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout, read from stdin.
    pub fn stdio() -> Self {
        TerminalConfirm::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalConfirm { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        write!(self.output, "{}", message).map_err(NiftiFixError::Prompt)?;
        self.output.flush().map_err(NiftiFixError::Prompt)?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .map_err(NiftiFixError::Prompt)?;

        Ok(is_affirmative(&answer))
    }
}

/// Replays a fixed list of answers and records every question asked.
///
/// Runs out as "no", so a missing answer never triggers a destructive step.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedConfirm {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions asked so far
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        self.asked.push(message.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative("okay"));
        assert!(!is_affirmative("n\n"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn test_terminal_confirm_reads_line() {
        let input = io::Cursor::new(b"Y\nn\n".to_vec());
        let mut output = Vec::new();
        {
            let mut prompt = TerminalConfirm::new(input, &mut output);
            assert!(prompt.confirm("Fix? [y/n]: ").unwrap());
            assert!(!prompt.confirm("Really? ").unwrap());
            assert!(!prompt.confirm("Again? ").unwrap());
        }
        assert_eq!(String::from_utf8(output).unwrap(), "Fix? [y/n]: Really? Again? ");
    }

    #[test]
    fn test_scripted_confirm_defaults_to_no() {
        let mut prompt = ScriptedConfirm::new([true]);
        assert!(prompt.confirm("first").unwrap());
        assert!(!prompt.confirm("second").unwrap());
        assert_eq!(prompt.asked(), &["first".to_string(), "second".to_string()]);
    }
}
