//! Editing a commit message in the user's editor.
//!
//! The text is written to a private temp file, the editor is run on that
//! path, and the file is read back. The temp file is removed when the
//! handle drops, whether or not the editor succeeded.

use std::io::Write;
use std::process::Command;

use tracing::debug;

use crate::error::EditorError;

/// Something that lets the user rewrite a piece of text.
pub trait MessageEditor {
    fn edit(&self, initial_text: &str) -> Result<String, EditorError>;
}

/// [`MessageEditor`] that launches an external editor command.
///
/// The command may carry arguments (`code -w`); the file path is appended.
#[derive(Debug, Clone)]
pub struct SystemEditor {
    command: String,
}

impl SystemEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl MessageEditor for SystemEditor {
    fn edit(&self, initial_text: &str) -> Result<String, EditorError> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| EditorError::NotFound(self.command.clone()))?;
        let args: Vec<&str> = parts.collect();

        let executable =
            which::which(program).map_err(|_| EditorError::NotFound(program.to_string()))?;

        let mut file = tempfile::Builder::new()
            .prefix("gpit-commit-")
            .suffix(".txt")
            .tempfile()
            .map_err(EditorError::TempFile)?;
        file.write_all(initial_text.as_bytes())
            .and_then(|_| file.flush())
            .map_err(EditorError::TempFile)?;

        debug!("Launching {} on {}", self.command, file.path().display());

        let status = Command::new(executable)
            .args(&args)
            .arg(file.path())
            .status()
            .map_err(|e| EditorError::SpawnFailed {
                editor: self.command.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(EditorError::NonZeroExit {
                editor: self.command.clone(),
                code: status.code(),
            });
        }

        // Read by path: editors often replace the file rather than rewrite it.
        std::fs::read_to_string(file.path()).map_err(EditorError::TempFile)
    }
}
