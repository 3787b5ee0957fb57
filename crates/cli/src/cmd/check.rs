//! Check command implementation
//!
//! Runs the plugin checks by hand, either across every hook with plugins
//! (all files) or as a specific hook would (staged or changed files).

use clap::Args;
use hooky_engine::checks::{Executor, ReturncodePolicy};
use hooky_engine::hooks::{Driver, RunMode, registry};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Run plugin checks
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckCommand {
    /// Run as this hook instead of standalone
    #[arg(long)]
    pub hook: Option<String>,

    /// Failures tolerated after the first (overrides the configuration)
    #[arg(short, long)]
    pub continues: Option<usize>,

    /// List failing checks with their output after the run
    #[arg(long)]
    pub verbose_summary: bool,

    /// Count checks that write to stderr as failed
    #[arg(long)]
    pub stderr_fails: bool,

    /// Count checks that write to stdout as failed
    #[arg(long)]
    pub stdout_fails: bool,

    /// Treat a stdin that cannot be polled as empty
    #[arg(long)]
    pub ignore_missing_stdin: bool,

    /// Arguments passed to every check before the file list
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Command for CheckCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let mode = match &self.hook {
            Some(name) => RunMode::Hook(registry::resolve(name)?),
            None => RunMode::Standalone,
        };

        let result = Driver::new(&context.repo, &context.config, &context.registry)
            .continues(self.continues)
            .verbose(self.verbose_summary.then_some(true))
            .policy(ReturncodePolicy {
                stderr_fails: self.stderr_fails,
                stdout_fails: self.stdout_fails,
            })
            .ignore_missing_stdin(self.ignore_missing_stdin)
            .run(mode, &self.args, Executor::builder())?;

        Ok(result.returncode)
    }
}
