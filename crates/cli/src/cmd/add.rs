//! Add command implementation

use clap::Args;
use hooky_config::LinkMode;
use hooky_engine::hooks::installer::{self, SlotState};
use hooky_engine::hooks::registry;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;

/// Add a script to a hook's scripts directory
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Hook to add the script to
    pub hook: String,

    /// Script to add
    pub script: PathBuf,

    /// Copy the script instead of symlinking it
    #[arg(long)]
    pub copy: bool,
}

impl Command for AddCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let hook = context.inspect(registry::resolve(&self.hook)?)?;
        let mode = if self.copy {
            LinkMode::Copy
        } else {
            context.config.general.link
        };

        let dest = installer::add_script(&hook, &self.script, mode)?;
        let icons = context.use_icons();
        println!(
            "{}{} {}",
            StatusIcon::Success.prefix(icons),
            "Added".green(),
            dest.display()
        );

        if hook.state() != SlotState::Managed {
            println!(
                "{}The runner is not installed for {}; run {} to activate the script.",
                StatusIcon::Warning.prefix(icons),
                hook.name(),
                format!("hooky install {}", hook.name()).cyan()
            );
        }
        Ok(())
    }
}
