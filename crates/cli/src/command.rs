//! Command trait for hooky CLI

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for commands that operate on a repository
///
/// `execute` receives the [`RuntimeContext`] holding the repository,
/// configuration and plugin registry. Commands that run checks return the
/// process exit code; the rest return `()`.
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
