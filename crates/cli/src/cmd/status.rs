//! Status command implementation
//!
//! Lists the hook slots of the repository as a table or as JSON.

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use hooky_engine::hooks::installer::{self, SlotState};
use hooky_engine::hooks::{HOOKS, InstalledHook};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;

/// Output format for the status command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Simple,
    /// Machine-readable JSON
    Json,
}

/// Show the state of every hook slot
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Include hooks that are not installed
    #[arg(short, long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Simple)]
    pub format: OutputFormat,
}

/// JSON view of a slot
#[derive(Debug, Serialize)]
struct SlotReport {
    name: &'static str,
    path: String,
    state: &'static str,
    active: bool,
    scripts: Vec<String>,
    plugins: Vec<String>,
}

impl Command for StatusCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let hooks = if self.all {
            HOOKS
                .iter()
                .map(|sig| context.inspect(sig))
                .collect::<Result<Vec<_>>>()?
        } else {
            installer::scan(&context.repo)?
        };

        match self.format {
            OutputFormat::Json => print_json(context, &hooks),
            OutputFormat::Simple => {
                print_table(context, &hooks)?;
                Ok(())
            }
        }
    }
}

fn plugin_names(context: &RuntimeContext, hook: &InstalledHook) -> Vec<String> {
    context
        .registry
        .plugins(hook.name())
        .map(|p| p.name.clone())
        .collect()
}

fn script_names(hook: &InstalledHook) -> Result<Vec<String>> {
    Ok(hook
        .scripts()?
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect())
}

fn print_json(context: &RuntimeContext, hooks: &[InstalledHook]) -> Result<()> {
    let reports = hooks
        .iter()
        .map(|hook| -> Result<SlotReport> {
            Ok(SlotReport {
                name: hook.name(),
                path: hook.file_path.display().to_string(),
                state: hook.state().as_str(),
                active: hook.active,
                scripts: script_names(hook)?,
                plugins: plugin_names(context, hook),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let json = serde_json::json!({
        "hooks_dir": context.repo.hooks_dir(),
        "hooks": reports,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn print_table(context: &RuntimeContext, hooks: &[InstalledHook]) -> Result<()> {
    let icons = context.use_icons();
    println!(
        "{}Hooks directory: {}",
        StatusIcon::Hook.prefix(icons),
        context.repo.hooks_dir().display().cyan()
    );

    if hooks.is_empty() {
        println!("{}", "No hooks installed.".yellow());
        println!("Run {} to install the runner.", "hooky install".cyan());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_header(vec!["Hook", "State", "Active", "Scripts", "Plugins"]);

    for hook in hooks {
        let icon = match (hook.state(), hook.active) {
            (SlotState::Managed, true) => StatusIcon::Success,
            (SlotState::Managed, false) => StatusIcon::Info,
            (SlotState::Stale, _) => StatusIcon::Warning,
            (SlotState::Absent, _) => StatusIcon::Error,
        };
        let active = match hook.state() {
            SlotState::Absent => "-",
            _ if hook.active => "yes",
            _ => "no",
        };

        table.add_row(vec![
            hook.name().to_string(),
            format!("{}{}", icon.prefix(icons), hook.state().as_str()),
            active.to_string(),
            script_names(hook)?.join(", "),
            plugin_names(context, hook).join(", "),
        ]);
    }

    println!("{table}");
    Ok(())
}
