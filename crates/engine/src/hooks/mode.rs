//! Run-mode resolution
//!
//! A hook script installed as `<hooks>/<hook>.d/<script>` runs on behalf of
//! `<hook>`; anything else runs standalone. The mode decides which files are
//! fed to the checks.

use super::installer::SCRIPTS_DIR_SUFFIX;
use super::registry::{self, HookSignature};
use crate::files::FileQuery;
use hooky_config::Config;
use std::path::Path;

/// How the current process was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Invoked directly by a user
    Standalone,
    /// Invoked by git through the runner for this hook
    Hook(&'static HookSignature),
}

impl RunMode {
    /// Infer the mode from the path the process was invoked through
    #[must_use]
    pub fn resolve(invocation: &Path) -> Self {
        let hook = invocation
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(SCRIPTS_DIR_SUFFIX))
            .and_then(registry::signature);

        match hook {
            Some(signature) => {
                tracing::debug!(hook = signature.name, "Running as hook script");
                Self::Hook(signature)
            }
            None => Self::Standalone,
        }
    }

    /// Which files the checks should look at
    ///
    /// Standalone runs see every file in the working tree, `pre-push` sees files changed
    /// against the configured reference, and other hooks see staged files.
    #[must_use]
    pub fn file_query(&self, config: &Config) -> FileQuery {
        match self {
            Self::Standalone => FileQuery::All,
            Self::Hook(signature) if signature.name == "pre-push" => FileQuery::Changed {
                reference: config.general.reference.clone(),
            },
            Self::Hook(_) => FileQuery::Added,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_resolve_hook_dir() {
        let mode = RunMode::resolve(Path::new("/repo/.git/hooks/pre-commit.d/lint"));
        assert_eq!(mode, RunMode::Hook(registry::signature("pre-commit").unwrap()));
    }

    #[test]
    fn test_resolve_standalone() {
        assert_eq!(RunMode::resolve(Path::new("/usr/bin/hooky")), RunMode::Standalone);
        assert_eq!(RunMode::resolve(Path::new("hooky")), RunMode::Standalone);
        // Suffix on an unknown hook name
        assert_eq!(
            RunMode::resolve(Path::new("/x/not-a-hook.d/lint")),
            RunMode::Standalone
        );
        // Hook name without the suffix
        assert_eq!(
            RunMode::resolve(Path::new("/x/pre-commit/lint")),
            RunMode::Standalone
        );
    }

    #[test]
    fn test_file_query() {
        let mut config = Config::default();
        config.general.reference = "origin/main".to_string();

        assert_eq!(RunMode::Standalone.file_query(&config), FileQuery::All);
        assert_eq!(
            RunMode::Hook(registry::signature("pre-push").unwrap()).file_query(&config),
            FileQuery::Changed {
                reference: "origin/main".to_string()
            }
        );
        assert_eq!(
            RunMode::Hook(registry::signature("pre-commit").unwrap()).file_query(&config),
            FileQuery::Added
        );
    }
}
