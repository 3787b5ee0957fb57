//! Install command implementation
//!
//! Installs the runner into hook slots. Hooks with configured plugins also
//! get hooky itself placed in `<hook>.d/`, so git runs the plugin checks
//! through the driver, and each plugin's setup command is run.

use anyhow::Context;
use clap::Args;
use hooky_config::LinkMode;
use hooky_engine::hooks::installer::{self, InstallOutcome};
use hooky_engine::hooks::{InstalledHook, SetupAction, registry};
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::{Confirmation, RuntimeContext};
use crate::error::Result;
use crate::ui::StatusIcon;

/// Hook installed when nothing was named and no plugin is configured
const DEFAULT_HOOK: &str = "pre-commit";

/// Install the hooky runner
#[derive(Debug, Args)]
pub struct InstallCommand {
    /// Hooks to install (default: hooks with plugins, else pre-commit)
    pub hooks: Vec<String>,

    /// Replace foreign hooks without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Copy hooky into the scripts directory instead of symlinking
    #[arg(long)]
    pub copy: bool,

    /// Only install the runner; skip plugin setup
    #[arg(long)]
    pub no_plugins: bool,
}

impl Command for InstallCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let hooks = context.select(&self.hooks, || {
            let mut signatures = context.registry.hooks();
            if signatures.is_empty() {
                signatures.extend(registry::signature(DEFAULT_HOOK));
            }
            signatures.into_iter().map(|sig| context.inspect(sig)).collect()
        })?;

        let confirm = Confirmation::new(self.yes);
        let icons = context.use_icons();

        for hook in &hooks {
            let outcome = installer::install(hook, &context.repo, &confirm)?;
            report(hook, &outcome, icons);

            if outcome == InstallOutcome::Declined || self.no_plugins {
                continue;
            }
            self.install_plugins(context, hook)?;
        }

        Ok(())
    }
}

impl InstallCommand {
    fn link_mode(&self, context: &RuntimeContext) -> LinkMode {
        if self.copy {
            LinkMode::Copy
        } else {
            context.config.general.link
        }
    }

    fn install_plugins(&self, context: &RuntimeContext, hook: &InstalledHook) -> Result<()> {
        let plugins = context.registry.discover(hook.name());
        if plugins.is_empty() {
            return Ok(());
        }

        let exe = std::env::current_exe().context("Failed to locate the hooky executable")?;
        let dest = installer::add_script(hook, &exe, self.link_mode(context))?;
        tracing::debug!(dest = %dest.display(), "Placed driver");

        for plugin in plugins.values() {
            match plugin.setup(SetupAction::Install, context.repo.root())? {
                Some(output) if !output.success() => println!(
                    "  {} setup exited with {}: {}",
                    plugin.name.yellow(),
                    output.status,
                    output.stderr.trim()
                ),
                _ => println!("  {} {}", "plugin".dimmed(), plugin.name.green()),
            }
        }
        Ok(())
    }
}

fn report(hook: &InstalledHook, outcome: &InstallOutcome, icons: bool) {
    let name = hook.name();
    match outcome {
        InstallOutcome::Installed => println!(
            "{}{} {}",
            StatusIcon::Success.prefix(icons),
            "Installed".green(),
            name
        ),
        InstallOutcome::AlreadyInstalled => println!(
            "{}{} already installed",
            StatusIcon::Info.prefix(icons),
            name
        ),
        InstallOutcome::Replaced { backup } => println!(
            "{}{} {} (previous hook saved to {})",
            StatusIcon::Success.prefix(icons),
            "Replaced".green(),
            name,
            backup.display()
        ),
        InstallOutcome::Declined => println!(
            "{}{} left unchanged",
            StatusIcon::Warning.prefix(icons),
            name
        ),
    }
}
