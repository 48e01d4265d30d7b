//! Line-oriented user input.

use dialoguer::Input;

use crate::error::PromptError;

/// Source of free-text answers to prompts.
pub trait Prompter {
    /// Show `prompt` and return the trimmed line the user typed.
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// [`Prompter`] reading from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| match e {
                dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                    PromptError::Closed
                }
                other => PromptError::Input(other.to_string()),
            })?;
        Ok(answer.trim().to_string())
    }
}

/// Whether a free-text answer means "yes".
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("yes"));
        assert!(is_yes(" YES "));
        assert!(is_yes("y"));
        assert!(!is_yes("no"));
        assert!(!is_yes(""));
        assert!(!is_yes("yess"));
    }
}
