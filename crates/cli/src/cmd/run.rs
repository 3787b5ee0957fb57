//! Run command implementation
//!
//! Runs an installed hook slot by hand, the way git would.

use clap::Args;
use hooky_core::Error;
use hooky_engine::hooks::{InstalledHook, installer, registry};
use hooky_engine::shell;
use owo_colors::OwoColorize;
use std::path::Path;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Run an installed hook
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Hook name, or a unique part of it
    pub hook: String,

    /// Arguments passed to the hook
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Command for RunCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let installed = installer::scan(&context.repo)?;
        let hook = match find(&installed, &self.hook, context.repo.hooks_dir()) {
            Ok(hook) => hook,
            Err(e) => {
                list(&installed);
                return Err(e.into());
            }
        };

        tracing::info!(hook = hook.name(), "Running hook");
        let code = shell::run_interactive(
            &hook.file_path.to_string_lossy(),
            &self.args,
            context.repo.root(),
        )?;
        Ok(code)
    }
}

/// Resolve `query` among the installed slots
fn find<'a>(
    installed: &'a [InstalledHook],
    query: &str,
    hooks_dir: &Path,
) -> hooky_core::Result<&'a InstalledHook> {
    let names: Vec<&str> = installed.iter().map(InstalledHook::name).collect();
    match registry::match_name(query, &names) {
        Ok(name) => installed
            .iter()
            .find(|hook| hook.name() == name)
            .ok_or_else(|| Error::Message(format!("Hook '{name}' disappeared"))),
        // A known hook that is simply not installed reads better as such
        Err(Error::UnknownHook { .. }) if registry::is_known(query) => {
            Err(Error::HookSlotMissing {
                name: query.to_string(),
                path: hooks_dir.join(query),
            })
        }
        Err(e) => Err(e),
    }
}

fn list(installed: &[InstalledHook]) {
    if installed.is_empty() {
        eprintln!("{}", "No hooks are installed.".yellow());
        return;
    }
    eprintln!("Installed hooks:");
    for hook in installed {
        eprintln!("  {hook}");
    }
}
