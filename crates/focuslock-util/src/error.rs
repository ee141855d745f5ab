//! Error types for focuslock

use thiserror::Error;

/// Terminal input errors
#[derive(Debug, Error)]
pub enum FocusError {
    #[error("Unknown command: /{0}")]
    UnknownCommand(String),

    #[error("Missing argument for /{command}: {expected}")]
    MissingArgument {
        command: String,
        expected: &'static str,
    },

    #[error("Unknown context field: {0}")]
    UnknownContextField(String),
}

impl FocusError {
    pub fn missing_argument(command: impl Into<String>, expected: &'static str) -> Self {
        Self::MissingArgument {
            command: command.into(),
            expected,
        }
    }
}

pub type Result<T> = std::result::Result<T, FocusError>;
