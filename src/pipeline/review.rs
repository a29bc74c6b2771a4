//! Hand-editing of translated fields before the letter is composed.

use std::io::Write;
use std::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Editor command is empty")]
    NoEditor,

    #[error("Editor `{editor}` exited with {status}")]
    EditorFailed { editor: String, status: String },

    #[error("I/O error during review: {0}")]
    Io(#[from] std::io::Error),
}

/// Lets the user correct a translated field. Returns the final text.
pub trait Reviewer {
    fn review(&self, label: &str, draft: &str) -> Result<String, ReviewError>;
}

/// Keeps every draft as-is.
pub struct AcceptAll;

impl Reviewer for AcceptAll {
    fn review(&self, _label: &str, draft: &str) -> Result<String, ReviewError> {
        Ok(draft.to_string())
    }
}

/// Opens each draft in an external text editor.
///
/// The draft is written to a temporary file, the editor runs to completion,
/// and the saved file content becomes the reviewed text.
pub struct EditorReviewer {
    command: String,
}

impl EditorReviewer {
    /// `command` may carry arguments, e.g. `code --wait`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Editor from `$VISUAL`, then `$EDITOR`.
    pub fn from_env() -> Option<Self> {
        ["VISUAL", "EDITOR"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|cmd| !cmd.trim().is_empty())
            .map(Self::new)
    }
}

impl Reviewer for EditorReviewer {
    fn review(&self, label: &str, draft: &str) -> Result<String, ReviewError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(ReviewError::NoEditor)?;

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", label.to_lowercase()))
            .suffix(".txt")
            .tempfile()?;
        file.write_all(draft.as_bytes())?;
        file.flush()?;

        tracing::debug!(label, editor = program, "Opening draft in editor");
        let status = Command::new(program).args(parts).arg(file.path()).status()?;
        if !status.success() {
            return Err(ReviewError::EditorFailed {
                editor: program.to_string(),
                status: status.to_string(),
            });
        }

        let edited = std::fs::read_to_string(file.path())?;
        // Editors append a final newline; the field itself has none.
        let edited = edited
            .strip_suffix("\r\n")
            .or_else(|| edited.strip_suffix('\n'))
            .unwrap_or(&edited);
        Ok(edited.to_string())
    }
}
