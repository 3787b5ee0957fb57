//! Hook script discovery
//!
//! Plugins are declared in the `[[plugins]]` configuration table. A plugin is
//! available for a hook when its executable is found next to the running
//! `hooky` binary or on `PATH`.

use super::registry::{self, HookSignature};
use crate::shell::{self, CommandOutput, RunOptions};
use hooky_config::{Config, PluginConfig};
use hooky_core::{Error, Result};
use indexmap::IndexMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Argument passed to a plugin's setup command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    /// The plugin was installed into a repository
    Install,
    /// The plugin is being removed from a repository
    Uninstall,
}

impl SetupAction {
    /// Argument appended to the setup command
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
        }
    }
}

impl fmt::Display for SetupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A check script registered for one hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Display name
    pub name: String,
    /// Hook the plugin runs for
    pub hook: &'static HookSignature,
    /// Executable name looked up on the search path
    pub script: String,
    /// File name globs or suffixes (empty = every file)
    pub patterns: Vec<String>,
    /// Setup command line, if any
    pub setup: Option<String>,
}

impl Plugin {
    fn from_config(config: &PluginConfig) -> Result<Self> {
        let hook = registry::signature(&config.hook).ok_or_else(|| {
            Error::Config(format!(
                "Plugin '{}' is registered for unknown hook '{}'",
                config.name, config.hook
            ))
        })?;

        Ok(Self {
            name: config.name.clone(),
            hook,
            script: config.script.clone(),
            patterns: config.patterns.clone(),
            setup: config.setup.clone(),
        })
    }

    /// Run the setup command with `action` appended
    ///
    /// Returns `None` when the plugin has no setup command. A nonzero exit is
    /// returned as a value.
    #[tracing::instrument(skip(self), fields(plugin = %self.name))]
    pub fn setup(&self, action: SetupAction, cwd: &Path) -> Result<Option<CommandOutput>> {
        let Some(command) = &self.setup else {
            return Ok(None);
        };

        let mut parts = shell_words::split(command).map_err(|e| {
            Error::Config(format!(
                "Failed to parse setup command for plugin '{}': {e}",
                self.name
            ))
        })?;
        if parts.is_empty() {
            return Err(Error::Config(format!(
                "Empty setup command for plugin '{}'",
                self.name
            )));
        }

        let program = parts.remove(0);
        parts.push(action.as_str().to_string());

        let options = RunOptions {
            cwd: Some(cwd.to_path_buf()),
            ..RunOptions::default()
        };
        shell::run_command(&program, parts, &options).map(Some)
    }
}

/// Every configured plugin, indexed by hook
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
    search_path: Vec<PathBuf>,
}

impl PluginRegistry {
    /// Build the registry from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when a plugin names an unknown hook.
    pub fn from_config(config: &Config) -> Result<Self> {
        let plugins = config
            .plugins
            .iter()
            .map(Plugin::from_config)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            plugins,
            search_path: default_search_path(),
        })
    }

    /// Replace the directories scripts are looked up in
    #[must_use]
    pub fn with_search_path(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_path = dirs;
        self
    }

    /// Plugins declared for `hook`, in declaration order
    pub fn plugins<'a>(&'a self, hook: &'a str) -> impl Iterator<Item = &'a Plugin> {
        self.plugins.iter().filter(move |p| p.hook.name == hook)
    }

    /// Hooks with at least one declared plugin, in registry order
    #[must_use]
    pub fn hooks(&self) -> Vec<&'static HookSignature> {
        registry::HOOKS
            .iter()
            .filter(|sig| self.plugins.iter().any(|p| p.hook.name == sig.name))
            .collect()
    }

    /// Plugins for `hook` whose executable is present, keyed by its path
    ///
    /// When two plugins resolve to the same executable the later declaration
    /// wins.
    pub fn discover(&self, hook: &str) -> IndexMap<PathBuf, Plugin> {
        let Ok(paths) = env::join_paths(&self.search_path) else {
            tracing::warn!("Search path contains an invalid directory");
            return IndexMap::new();
        };
        let cwd = env::current_dir().unwrap_or_default();

        let mut found = IndexMap::new();
        for plugin in self.plugins(hook) {
            match which::which_in(&plugin.script, Some(&paths), &cwd) {
                Ok(path) => {
                    tracing::debug!(plugin = %plugin.name, path = %path.display(), "Found plugin script");
                    if let Some(previous) = found.insert(path.clone(), plugin.clone()) {
                        tracing::warn!(
                            plugin = %plugin.name,
                            replaced = %previous.name,
                            path = %path.display(),
                            "Plugins share a script; keeping the later one"
                        );
                    }
                }
                Err(_) => {
                    tracing::debug!(plugin = %plugin.name, script = %plugin.script, "Plugin script not installed");
                }
            }
        }
        found
    }
}

/// Directory of the running executable, then `PATH`
fn default_search_path() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(exe) = env::current_exe()
        && let Some(dir) = exe.parent()
    {
        dirs.push(dir.to_path_buf());
    }
    if let Some(path) = env::var_os("PATH") {
        dirs.extend(env::split_paths(&path));
    }
    dirs
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::system;
    use tempfile::TempDir;

    fn config() -> Config {
        Config::from_toml_str(
            r#"
[[plugins]]
name = "fmt"
hook = "pre-commit"
script = "hooky-test-fmt"
patterns = ["*.rs"]

[[plugins]]
name = "missing"
hook = "pre-commit"
script = "hooky-test-missing"

[[plugins]]
name = "msg"
hook = "commit-msg"
script = "hooky-test-msg"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_hook_is_config_error() {
        let config = Config::from_toml_str(
            "[[plugins]]\nname = \"x\"\nhook = \"pre-comit\"\nscript = \"x\"\n",
        )
        .unwrap();
        let result = PluginRegistry::from_config(&config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_hooks_and_plugins() {
        let registry = PluginRegistry::from_config(&config()).unwrap();
        let hooks: Vec<_> = registry.hooks().iter().map(|h| h.name).collect();
        assert_eq!(hooks, vec!["pre-commit", "commit-msg"]);
        assert_eq!(registry.plugins("pre-commit").count(), 2);
        assert_eq!(registry.plugins("pre-push").count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_only_present_scripts() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("hooky-test-fmt");
        system::write_executable(&script, b"#!/bin/sh\nexit 0\n").unwrap();

        let registry = PluginRegistry::from_config(&config())
            .unwrap()
            .with_search_path(vec![temp.path().to_path_buf()]);

        let found = registry.discover("pre-commit");
        assert_eq!(found.len(), 1);
        let (path, plugin) = found.first().unwrap();
        assert_eq!(path, &script);
        assert_eq!(plugin.name, "fmt");
        assert!(registry.discover("commit-msg").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_shared_script_keeps_last() {
        let temp = TempDir::new().unwrap();
        system::write_executable(&temp.path().join("hooky-test-lint"), b"#!/bin/sh\nexit 0\n")
            .unwrap();
        let config = Config::from_toml_str(
            r#"
[[plugins]]
name = "lint-rust"
hook = "pre-commit"
script = "hooky-test-lint"
patterns = ["*.rs"]

[[plugins]]
name = "lint-toml"
hook = "pre-commit"
script = "hooky-test-lint"
patterns = ["*.toml"]
"#,
        )
        .unwrap();

        let registry = PluginRegistry::from_config(&config)
            .unwrap()
            .with_search_path(vec![temp.path().to_path_buf()]);

        let found = registry.discover("pre-commit");
        assert_eq!(found.len(), 1);
        let plugin = found.values().next().unwrap();
        assert_eq!(plugin.name, "lint-toml");
        assert_eq!(plugin.patterns, vec!["*.toml".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_setup_appends_action() {
        let temp = TempDir::new().unwrap();
        let plugin = Plugin {
            name: "echo".to_string(),
            hook: registry::signature("pre-commit").unwrap(),
            script: "echo".to_string(),
            patterns: Vec::new(),
            setup: Some("echo 'set up'".to_string()),
        };

        let output = plugin.setup(SetupAction::Install, temp.path()).unwrap().unwrap();
        assert_eq!(output.stdout.trim(), "set up install");

        let none = Plugin { setup: None, ..plugin };
        assert!(none.setup(SetupAction::Uninstall, temp.path()).unwrap().is_none());
    }
}
