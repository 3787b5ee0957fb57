//! # Hooky Engine
//!
//! Hook installation and check execution for hooky.
//!
//! - **Repository**: locating the repository and its hooks directory
//! - **Hooks**: the hook registry, slot installer, plugin discovery and run driver
//! - **Checks**: running checks with a failure budget and adaptive output
//! - **Files**: staged, changed and tracked file listings fed to checks
//! - **System**: executable bits, links and external commands

pub mod checks;
pub mod files;
pub mod git;
pub mod hooks;
pub mod shell;
pub mod stdin;
pub mod system;

// Re-export error types from core
pub use hooky_core::{Error, Result};

// Re-export commonly used types
pub use checks::{Check, CheckOutcome, CheckValue, Checks, ExecutionResult, Executor};
pub use files::{FileDiscovery, FileQuery};
pub use git::Repo;
pub use hooks::{Driver, InstalledHook, PluginRegistry, RunMode};
