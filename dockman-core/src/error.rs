//! Error types for Dockman

use thiserror::Error;

/// Dockman error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external tool could not be started or a listing exited abnormally
    #[error("Failed to run `{command}`: {message}")]
    ToolInvocation {
        /// Command line that was attempted
        command: String,
        /// Error message
        message: String,
    },

    /// Removal refused because the container is still running
    #[error("Container '{id}' is running")]
    RunningConflict {
        /// Identifier passed to remove
        id: String,
    },

    /// Tool output did not match the expected table layout
    #[error("Parse error: {message}")]
    Parse {
        /// Error message
        message: String,
    },

    /// Identifier rejected before it reached the tool
    #[error("Invalid container identifier '{id}': {reason}")]
    InvalidIdentifier {
        /// Offending identifier
        id: String,
        /// Why it was rejected
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Build a [`Error::Parse`] from anything printable
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Whether this is the recoverable "container is running" refusal
    #[must_use]
    pub const fn is_running_conflict(&self) -> bool {
        matches!(self, Self::RunningConflict { .. })
    }
}

/// Result type alias for Dockman operations
pub type Result<T> = std::result::Result<T, Error>;
