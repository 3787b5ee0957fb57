//! Error types for CLI commands

use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Error from the hook engine or configuration
    #[error(transparent)]
    Hooky(#[from] hooky_core::Error),

    /// Interactive prompt failed (no terminal, interrupted)
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommandError {
    /// Whether the user asked for something that cannot be done
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Hooky(e) if e.is_usage())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_usage_classification() {
        let unknown: CommandError = hooky_core::Error::UnknownHook {
            name: "x".to_string(),
            known: Vec::new(),
        }
        .into();
        assert!(unknown.is_usage());

        let io: CommandError = std::io::Error::other("disk full").into();
        assert!(!io.is_usage());
    }
}
