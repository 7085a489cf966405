//! Answer Sources

use crate::QuestionnaireError;
use std::io::{BufRead, Write};

/// Source of answers to multiple-choice questions
pub trait Prompter {
    /// Present `question` with `options` and return the zero-based choice
    fn choose(&mut self, question: &str, options: &[&str]) -> Result<usize, QuestionnaireError>;
}

/// Ask through `prompter`, rejecting out-of-range answers
pub(crate) fn ask<P: Prompter + ?Sized>(
    prompter: &mut P,
    question: &str,
    options: &[&str],
) -> Result<usize, QuestionnaireError> {
    let choice = prompter.choose(question, options)?;
    if choice >= options.len() {
        return Err(QuestionnaireError::InvalidChoice {
            choice,
            options: options.len(),
        });
    }
    Ok(choice)
}

/// Numbered-menu prompter over a line-oriented reader and writer.
///
/// Re-asks until the answer is a number in range.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    /// Create a new line prompter
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the underlying reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn choose(&mut self, question: &str, options: &[&str]) -> Result<usize, QuestionnaireError> {
        writeln!(self.output, "\n❓ {}", question)?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "   {}. {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "\n👉 Your choice (enter number): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(QuestionnaireError::InputClosed);
            }

            match line.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                Ok(_) => writeln!(
                    self.output,
                    "❌ Please enter a number between 1 and {}",
                    options.len()
                )?,
                Err(_) => writeln!(self.output, "❌ Please enter a valid number")?,
            }
        }
    }
}
