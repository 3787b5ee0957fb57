//! Common utilities and types shared across CLI commands

use crate::error::Result;
use dialoguer::{Confirm as Prompt, theme::ColorfulTheme};
use hooky_config::Config;
use hooky_engine::hooks::installer::{self, AssumeYes, Confirm};
use hooky_engine::hooks::{HookSignature, InstalledHook, PluginRegistry, registry};
use hooky_engine::Repo;
use std::io::IsTerminal;
use std::path::Path;

/// Shared state for commands: the repository, its configuration and plugins
#[derive(Debug)]
pub struct RuntimeContext {
    /// The enclosing repository
    pub repo: Repo,
    /// Configuration applying to the repository
    pub config: Config,
    /// Plugins declared in the configuration
    pub registry: PluginRegistry,
}

impl RuntimeContext {
    /// Discover the repository around `start` and load its configuration
    pub fn load(start: &Path, config_path: Option<&Path>) -> Result<Self> {
        let repo = Repo::discover(start)?;
        let config = Config::load_for_repo(repo.root(), config_path)?;
        let registry = PluginRegistry::from_config(&config)?;

        if let Some(source) = config.source() {
            tracing::debug!(config = %source.display(), "Loaded configuration");
        }

        Ok(Self {
            repo,
            config,
            registry,
        })
    }

    /// Whether status icons should be printed
    pub fn use_icons(&self) -> bool {
        self.config
            .ui
            .icons
            .should_show_icons(std::io::stdout().is_terminal())
    }

    /// Current state of one slot
    pub fn inspect(&self, signature: &'static HookSignature) -> Result<InstalledHook> {
        Ok(installer::inspect(&self.repo, signature)?)
    }

    /// Slots for the named hooks, or `default` when no names were given
    pub fn select(
        &self,
        names: &[String],
        default: impl FnOnce() -> Result<Vec<InstalledHook>>,
    ) -> Result<Vec<InstalledHook>> {
        if names.is_empty() {
            return default();
        }
        names
            .iter()
            .map(|name| self.inspect(registry::resolve(name)?))
            .collect()
    }
}

/// Ask on the terminal, defaulting to yes
pub(crate) fn ask(prompt: &str) -> hooky_core::Result<bool> {
    Prompt::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(|e| hooky_core::Error::Message(format!("Failed to read answer: {e}")))
}

/// Confirmation source honouring `--yes`
pub(crate) enum Confirmation {
    /// Answer yes without asking
    Yes(AssumeYes),
    /// Ask on the terminal
    Ask,
}

impl Confirmation {
    pub(crate) fn new(yes: bool) -> Self {
        if yes { Self::Yes(AssumeYes) } else { Self::Ask }
    }
}

impl Confirm for Confirmation {
    fn confirm(&self, prompt: &str) -> hooky_core::Result<bool> {
        match self {
            Self::Yes(yes) => yes.confirm(prompt),
            Self::Ask => ask(prompt),
        }
    }
}
