//! Configure command implementation
//!
//! Interactive menu: pick a hook by number, then an action for it.

use clap::Args;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use hooky_engine::hooks::installer::{self, InstallOutcome};
use hooky_engine::hooks::HOOKS;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::{Confirmation, RuntimeContext};
use crate::error::Result;
use crate::ui::StatusIcon;

/// Interactively manage one hook
#[derive(Debug, Args)]
pub struct ConfigureCommand {
    /// Only offer hooks that are already present
    #[arg(long)]
    pub installed: bool,
}

/// Actions offered for the chosen hook
const ACTIONS: [&str; 7] = [
    "Install runner",
    "Activate",
    "Deactivate",
    "Remove",
    "Add script",
    "Remove script",
    "Cancel",
];

impl Command for ConfigureCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let hooks = if self.installed {
            installer::scan(&context.repo)?
        } else {
            HOOKS
                .iter()
                .map(|sig| context.inspect(sig))
                .collect::<Result<Vec<_>>>()?
        };

        let index = {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout().lock();
            installer::choose_hook(&hooks, &mut input, &mut output)?
        };
        let hook = &hooks[index];

        let theme = ColorfulTheme::default();
        let action = Select::with_theme(&theme)
            .with_prompt(format!("{hook}: choose action"))
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        let confirm = Confirmation::new(false);
        let icons = context.use_icons();
        match action {
            0 => {
                let outcome = installer::install(hook, &context.repo, &confirm)?;
                if outcome != InstallOutcome::Declined {
                    println!("{}{outcome:?}", StatusIcon::Success.prefix(icons));
                }
            }
            1 => installer::activate(hook)?,
            2 => installer::deactivate(hook)?,
            3 => {
                installer::remove(hook, &confirm)?;
            }
            4 => {
                let path: String = Input::with_theme(&theme)
                    .with_prompt("Script path")
                    .interact_text()?;
                let dest = installer::add_script(
                    hook,
                    &PathBuf::from(path),
                    context.config.general.link,
                )?;
                println!("{}Added {}", StatusIcon::Success.prefix(icons), dest.display());
            }
            5 => {
                let names: Vec<String> = hook
                    .scripts()?
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect();
                if names.is_empty() {
                    println!("{}", "No scripts to remove.".yellow());
                    return Ok(());
                }
                let choice = Select::with_theme(&theme)
                    .with_prompt("Script to remove")
                    .items(&names)
                    .interact()?;
                if installer::remove_script(hook, &names[choice])? {
                    println!("{}Removed {}", StatusIcon::Success.prefix(icons), names[choice]);
                }
            }
            _ => {
                println!("{}", "Cancelled.".dimmed());
                return Ok(());
            }
        }

        let updated = context.inspect(hook.signature)?;
        println!("{}{updated}", StatusIcon::Hook.prefix(icons));
        Ok(())
    }
}
