//! Uninstall command implementation

use clap::Args;
use hooky_engine::hooks::installer::{self, Confirm};
use hooky_engine::hooks::{InstalledHook, SetupAction};
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::{Confirmation, RuntimeContext};
use crate::error::Result;
use crate::ui::StatusIcon;

/// Remove hook slots and their scripts directories
#[derive(Debug, Args)]
pub struct UninstallCommand {
    /// Hooks to remove (default: every installed hook)
    pub hooks: Vec<String>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl Command for UninstallCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let hooks = context.select(&self.hooks, || Ok(installer::scan(&context.repo)?))?;
        let confirm = Confirmation::new(self.yes);
        let icons = context.use_icons();

        if hooks.is_empty() {
            println!("{}", "No hooks installed.".yellow());
            return Ok(());
        }

        for hook in &hooks {
            uninstall_hook(context, hook, &confirm, icons)?;
        }

        Ok(())
    }
}

/// Remove one slot, then tear down its plugins if the slot went away
fn uninstall_hook(
    context: &RuntimeContext,
    hook: &InstalledHook,
    confirm: &impl Confirm,
    icons: bool,
) -> Result<()> {
    let outcome = installer::remove(hook, confirm)?;

    if outcome.slot_removed {
        println!(
            "{}{} {}",
            StatusIcon::Success.prefix(icons),
            "Removed".green(),
            hook.name()
        );
        teardown_plugins(context, hook);
    }
    if outcome.scripts_removed {
        println!(
            "{}{} {}",
            StatusIcon::Success.prefix(icons),
            "Removed".green(),
            hook.scripts_dir_path().display()
        );
    }
    if !outcome.slot_removed && !outcome.scripts_removed {
        println!("{}{} unchanged", StatusIcon::Info.prefix(icons), hook.name());
    }

    Ok(())
}

fn teardown_plugins(context: &RuntimeContext, hook: &InstalledHook) {
    for plugin in context.registry.discover(hook.name()).values() {
        match plugin.setup(SetupAction::Uninstall, context.repo.root()) {
            Ok(Some(output)) if !output.success() => tracing::warn!(
                plugin = %plugin.name,
                status = output.status,
                "Plugin uninstall setup failed"
            ),
            Ok(_) => {}
            Err(e) => tracing::warn!(
                plugin = %plugin.name,
                error = %e,
                "Plugin uninstall setup could not run"
            ),
        }
    }
}
