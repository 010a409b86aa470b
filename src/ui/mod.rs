//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::cell::RefCell;
use std::io::{BufRead, Write};

use console::style;

use crate::domain::SemanticVersion;
use crate::error::{ReleaseError, Result};
use crate::input::InputReader;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    describe_outcome, display_manual_push_instruction, display_status,
    display_success, format_candidates,
};

/// [InputReader] over explicit input and output handles.
///
/// The binary wires this to locked stdin/stdout; tests pass byte buffers.
pub struct ConsoleInputReader<R: BufRead, W: Write> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> ConsoleInputReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsoleInputReader {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    /// Give back the output handle
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }

    fn ask(&self, prompt: &str) -> Result<String> {
        {
            let mut output = self.output.borrow_mut();
            write!(output, "{}", prompt)?;
            output.flush()?;
        }

        let mut line = String::new();
        let read = self.input.borrow_mut().read_line(&mut line)?;
        if read == 0 {
            return Err(ReleaseError::input("Input closed while waiting for an answer"));
        }
        Ok(line.trim().to_string())
    }

    fn say(&self, message: &str) -> Result<()> {
        writeln!(self.output.borrow_mut(), "{}", message)?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> InputReader for ConsoleInputReader<R, W> {
    /// Prompts until the answer parses as a version.
    fn read_semantic_version(&self, prompt: &str) -> Result<SemanticVersion> {
        loop {
            let answer = self.ask(&format!("\n{}: ", style(prompt).bold()))?;
            match SemanticVersion::parse(&answer) {
                Ok(version) => return Ok(version),
                Err(e) => self.say(&format!("{} {}", style("✗").red(), e))?,
            }
        }
    }

    /// Prompts user to select a version from the legal successors.
    ///
    /// If only one version is available, returns it directly without prompting.
    /// Otherwise displays numbered list and accepts 1-based index selection.
    /// Default selection is the first version (index 1) if user presses Enter.
    fn read_version_choice(
        &self,
        prompt: &str,
        candidates: &[SemanticVersion],
    ) -> Result<SemanticVersion> {
        match candidates {
            [] => Err(ReleaseError::input(format!("No versions to choose for '{}'", prompt))),
            [only] => {
                self.say(&format!("\n{} {}", style(prompt).bold(), only))?;
                Ok(*only)
            }
            _ => {
                self.say(&format!("\n{}", style(prompt).bold()))?;
                self.say(&format_candidates(candidates))?;
                loop {
                    let selection = self.ask(&format!(
                        "\nSelect a version (1-{}) [default: 1]: ",
                        candidates.len()
                    ))?;

                    // If empty input, default to first version (index 1)
                    let index = if selection.is_empty() {
                        1
                    } else {
                        selection.parse::<usize>().unwrap_or(0)
                    };

                    if index > 0 && index <= candidates.len() {
                        return Ok(candidates[index - 1]);
                    }
                    self.say(&format!("{} Invalid selection", style("✗").red()))?;
                }
            }
        }
    }

    /// Accepts "y" or "yes" (case-insensitive); anything else, including Enter, is no.
    fn read_confirmation(&self, prompt: &str) -> Result<bool> {
        let response = self.ask(&format!("\n{} (y/N): ", prompt))?.to_lowercase();
        Ok(response == "y" || response == "yes")
    }
}
