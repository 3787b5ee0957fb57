//! Configuration management
//!
//! This module handles loading hooky configuration from `.hooky.toml` in the
//! repository root, falling back to the user config file and then defaults.

use crate::Result;
use hooky_core::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-repository configuration file
pub const CONFIG_FILE_NAME: &str = ".hooky.toml";

/// Icon display mode (similar to eza's --icons option)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconMode {
    /// Automatically show icons when output is a terminal
    #[default]
    #[serde(alias = "automatic")]
    Auto,
    /// Always show icons
    Always,
    /// Never show icons
    Never,
}

impl IconMode {
    /// Determine if icons should be shown based on mode and terminal detection
    #[must_use]
    pub fn should_show_icons(&self, is_tty: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_tty,
        }
    }
}

/// How scripts are placed into a hook's scripts directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Symlink to the source script
    #[default]
    Symlink,
    /// Copy the source script
    Copy,
}

/// General configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Failing checks tolerated after the first before a run is aborted
    #[serde(default)]
    pub continues: usize,

    /// Re-list failing checks in the run summary
    #[serde(default)]
    pub verbose: bool,

    /// Per-check timeout in seconds (0 = no timeout)
    #[serde(default)]
    pub timeout: u64,

    /// Revision compared against when collecting changed files
    #[serde(default = "default_reference")]
    pub reference: String,

    /// How plugin scripts are placed into `<hook>.d/`
    #[serde(default)]
    pub link: LinkMode,

    /// Directory names skipped when walking the working tree
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            continues: 0,
            verbose: false,
            timeout: 0,
            reference: default_reference(),
            link: LinkMode::default(),
            ignore: default_ignore(),
        }
    }
}

fn default_reference() -> String {
    "@{upstream}".to_string()
}

fn default_ignore() -> Vec<String> {
    [".git", "target", "node_modules"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// UI configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Icon display mode: "auto", "always", or "never"
    #[serde(default)]
    pub icons: IconMode,
}

/// A registered check script for one hook
///
/// ```toml
/// [[plugins]]
/// name = "rustfmt"
/// hook = "pre-commit"
/// script = "hooky-rustfmt"
/// patterns = ["*.rs"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Display name of the check
    pub name: String,

    /// Hook this check belongs to
    pub hook: String,

    /// Executable name, looked up next to hooky and then on PATH
    pub script: String,

    /// File name globs or suffixes the check wants (empty = every file)
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Optional setup command, called with `install` or `uninstall`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
}

/// Hooky configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General configuration section
    #[serde(default)]
    pub general: GeneralConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,

    /// Registered check scripts
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,

    /// File the configuration was loaded from (not serialized)
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let mut config = Self::from_toml_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })?;
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration from TOML string
    ///
    /// # Errors
    ///
    /// Returns error if TOML parsing fails
    pub fn from_toml_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the configuration that applies to a repository
    ///
    /// Lookup order: the explicit file, `<root>/.hooky.toml`, the user config
    /// file, then defaults.
    pub fn load_for_repo(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let repo_config = root.join(CONFIG_FILE_NAME);
        if repo_config.is_file() {
            return Self::load(repo_config);
        }

        if let Some(user_config) = crate::dirs::user_config_file()
            && user_config.is_file()
        {
            return Self::load(user_config);
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// File the configuration was loaded from, if any
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
