//! Hooky CLI library
//!
//! This library contains all the CLI logic for hooky, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod ui;

use clap::{Parser, Subcommand};
use hooky_engine::checks::Executor;
use hooky_engine::hooks::{Driver, HookSignature, RunMode};
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;
use error::Result;

/// Hooky - a git hook manager
#[derive(Parser)]
#[command(name = "hooky")]
#[command(about = "Install and run git hooks")]
#[command(version)]
#[command(long_about = "Install and run git hooks

hooky installs one shared runner into each git hook slot. The runner executes
every script in <hook>.d/ and fails when any of them fails. Checks declared as
plugins in .hooky.toml are run by hooky itself with the files the hook is
about (staged files for pre-commit, changed files for pre-push).")]
pub struct Cli {
    /// Path to the config file
    #[arg(long, env = "HOOKY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "HOOKY_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for hooky CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Show the state of the hook slots
    Status(cmd::status::StatusCommand),

    /// Pick a hook and change it interactively
    Configure(cmd::configure::ConfigureCommand),

    /// Install the runner into hook slots
    Install(cmd::install::InstallCommand),

    /// Add a script to a hook's scripts directory
    Add(cmd::add::AddCommand),

    /// Make a hook slot executable
    Enable(cmd::toggle::ToggleCommand),

    /// Make a hook slot non-executable so git skips it
    Disable(cmd::toggle::ToggleCommand),

    /// Run an installed hook by hand
    #[command(long_about = "Run an installed hook by hand

The hook name may be any unique part of an installed hook's name. An unknown
or ambiguous name lists the installed hooks and exits with status 1.
Otherwise the exit status is the hook's.

Examples:
  • hooky run pre-commit
  • hooky run msg .git/COMMIT_EDITMSG")]
    Run(cmd::run::RunCommand),

    /// Run the configured plugin checks
    Check(cmd::check::CheckCommand),

    /// Remove hook slots and their scripts directories
    Uninstall(cmd::uninstall::UninstallCommand),

    /// Run synthetic checks through the execution engine
    Probe(cmd::probe::ProbeCommand),
}

/// Execute the command based on the command type, returning the exit code
fn execute_command(command: Commands, context: &RuntimeContext) -> Result<i32> {
    match command {
        Commands::Status(status_cmd) => status_cmd.execute(context)?,
        Commands::Configure(configure_cmd) => configure_cmd.execute(context)?,
        Commands::Install(install_cmd) => install_cmd.execute(context)?,
        Commands::Add(add_cmd) => add_cmd.execute(context)?,
        Commands::Enable(mut toggle_cmd) => {
            toggle_cmd.enable = true;
            toggle_cmd.execute(context)?;
        }
        Commands::Disable(mut toggle_cmd) => {
            toggle_cmd.enable = false;
            toggle_cmd.execute(context)?;
        }
        Commands::Run(run_cmd) => return run_cmd.execute(context),
        Commands::Check(check_cmd) => return check_cmd.execute(context),
        Commands::Uninstall(uninstall_cmd) => uninstall_cmd.execute(context)?,
        Commands::Probe(probe_cmd) => return probe_cmd.execute(),
    }

    Ok(0)
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - The current directory is not inside a git repository
/// - Configuration loading fails
/// - Command execution fails
pub fn run(cli: Cli) -> Result<i32> {
    hooky_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    // The probe needs neither a repository nor configuration
    if let Commands::Probe(probe_cmd) = &cli.command {
        return probe_cmd.execute();
    }

    let cwd = std::env::current_dir()?;
    let context = RuntimeContext::load(&cwd, cli.config.as_deref())?;
    execute_command(cli.command, &context)
}

/// Entry point when git runs hooky from `<hook>.d/`
///
/// Runs the plugin checks of `hook` with the arguments git supplied and
/// returns the aggregate code. `HOOKY_VERBOSE` enables debug logging.
pub fn run_as_hook(hook: &'static HookSignature, args: Vec<String>) -> Result<i32> {
    let verbose = std::env::var_os("HOOKY_VERBOSE").is_some();
    let log_file = std::env::var_os("HOOKY_LOG_FILE").map(PathBuf::from);
    hooky_config::logging::init(verbose, log_file.as_deref())?;

    let config_path = std::env::var_os("HOOKY_CONFIG").map(PathBuf::from);
    let cwd = std::env::current_dir()?;
    let context = RuntimeContext::load(&cwd, config_path.as_deref())?;

    tracing::debug!(hook = hook.name, ?args, "Running as hook");
    let result = Driver::new(&context.repo, &context.config, &context.registry)
        .run(RunMode::Hook(hook), &args, Executor::builder())?;
    Ok(result.returncode)
}
