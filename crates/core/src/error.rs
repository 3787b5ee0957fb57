//! Base error types for hooky
//!
//! This module provides the foundation error types that all crates can use.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No enclosing git repository
    #[error("Not inside a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    /// Hook name not in the registry
    #[error("Unknown hook '{name}'. Known hooks: {}", known.join(", "))]
    UnknownHook { name: String, known: Vec<String> },

    /// Hook name matches more than one registered hook
    #[error("Hook name '{query}' is ambiguous, it matches: {}", candidates.join(", "))]
    AmbiguousHook {
        query: String,
        candidates: Vec<String>,
    },

    /// Hook slot file does not exist
    #[error("Hook '{name}' is not installed at {}", path.display())]
    HookSlotMissing { name: String, path: PathBuf },

    /// Git error
    #[error("Git error: {0}")]
    Git(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// External command could not be started
    #[error("Failed to run '{program}': {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External command exceeded its timeout
    #[error("Command '{program}' timed out after {secs} seconds")]
    CommandTimeout { program: String, secs: u64 },

    /// Standard input has no pollable handle
    #[error("Standard input is unavailable: {0}")]
    StdinUnavailable(String),

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Whether this error is a configuration/usage error (exit status 1)
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NotARepository { .. }
                | Self::UnknownHook { .. }
                | Self::AmbiguousHook { .. }
                | Self::HookSlotMissing { .. }
                | Self::Config(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
