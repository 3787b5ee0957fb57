//! Enable and disable commands
//!
//! A hook is enabled when its slot file is executable. Git skips slots
//! without the executable bit.

use clap::Args;
use hooky_core::Error;
use hooky_engine::hooks::installer;
use hooky_engine::hooks::registry;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;

/// Set or clear the executable bit of a hook slot
#[derive(Debug, Args)]
pub struct ToggleCommand {
    /// Hook to enable or disable
    pub hook: String,

    /// Whether to enable (set by the subcommand, not a flag)
    #[arg(skip)]
    pub enable: bool,
}

impl Command for ToggleCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let hook = context.inspect(registry::resolve(&self.hook)?)?;
        if !hook.exists {
            return Err(Error::HookSlotMissing {
                name: hook.name().to_string(),
                path: hook.file_path.clone(),
            }
            .into());
        }

        let icons = context.use_icons();
        if self.enable {
            installer::activate(&hook)?;
            println!("{}{} {}", StatusIcon::Success.prefix(icons), "Enabled".green(), hook.name());
        } else {
            installer::deactivate(&hook)?;
            println!("{}{} {}", StatusIcon::Info.prefix(icons), "Disabled".yellow(), hook.name());
        }
        Ok(())
    }
}
