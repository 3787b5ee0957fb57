//! Hook run driver
//!
//! Turns the discovered plugin scripts for a hook into checks and runs them.
//! This is what executes when git invokes a script in `<hook>.d/`, and what
//! `hooky check` runs by hand.

use super::discovery::PluginRegistry;
use super::mode::RunMode;
use super::registry::HookSignature;
use crate::checks::{Check, Checks, ExecutionResult, ExecutorBuilder, ReturncodePolicy};
use crate::files::{FileDiscovery, FileQuery};
use crate::git::Repo;
use crate::stdin::probe_stdin;
use hooky_config::Config;
use hooky_core::{Error, Result};
use std::io::Write;

/// Runs the plugin checks of a hook against a repository
#[derive(Debug)]
pub struct Driver<'a> {
    repo: &'a Repo,
    config: &'a Config,
    registry: &'a PluginRegistry,
    continues: Option<usize>,
    verbose: Option<bool>,
    policy: ReturncodePolicy,
    ignore_missing_stdin: bool,
}

impl<'a> Driver<'a> {
    /// Create a driver using the configured budget and verbosity
    #[must_use]
    pub fn new(repo: &'a Repo, config: &'a Config, registry: &'a PluginRegistry) -> Self {
        Self {
            repo,
            config,
            registry,
            continues: None,
            verbose: None,
            policy: ReturncodePolicy::default(),
            ignore_missing_stdin: false,
        }
    }

    /// Override `general.continues`
    #[must_use]
    pub fn continues(mut self, continues: Option<usize>) -> Self {
        self.continues = continues;
        self
    }

    /// Override `general.verbose`
    #[must_use]
    pub fn verbose(mut self, verbose: Option<bool>) -> Self {
        self.verbose = verbose;
        self
    }

    /// How check results are classified
    #[must_use]
    pub fn policy(mut self, policy: ReturncodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Treat a stdin that cannot be polled as empty
    #[must_use]
    pub fn ignore_missing_stdin(mut self, ignore: bool) -> Self {
        self.ignore_missing_stdin = ignore;
        self
    }

    /// Hooks whose plugins run in `mode`
    fn hooks(&self, mode: RunMode) -> Vec<&'static HookSignature> {
        match mode {
            RunMode::Hook(signature) => vec![signature],
            RunMode::Standalone => self.registry.hooks(),
        }
    }

    /// Build one check per discovered plugin script
    ///
    /// Arguments are `hook_args` followed by the plugin's matching files. A
    /// plugin with patterns and no matching file is skipped.
    pub fn checks(&self, mode: RunMode, hook_args: &[String]) -> Result<Vec<Check>> {
        let mut discovery = FileDiscovery::new(self.repo, &self.config.general.ignore);
        let query = mode.file_query(self.config);
        let root = self.repo.root().display().to_string();
        let timeout = self.config.general.timeout;

        let mut checks = Vec::new();
        for hook in self.hooks(mode) {
            for (path, plugin) in self.registry.discover(hook.name) {
                let files = files_for(&mut discovery, &query, &plugin.patterns)?;
                if !plugin.patterns.is_empty() && files.is_empty() {
                    tracing::debug!(plugin = %plugin.name, "No matching files, skipping");
                    continue;
                }

                let mut check = Check::script(plugin.name.clone(), path)
                    .with_args(hook_args.iter().cloned())
                    .with_args(files.iter().map(|f| f.display().to_string()))
                    .with_kwarg("cwd", root.clone());
                if timeout > 0 {
                    check = check.with_kwarg("timeout", timeout.to_string());
                }
                checks.push(check);
            }
        }

        tracing::debug!(count = checks.len(), "Built checks");
        Ok(checks)
    }

    /// Run the checks for `mode` with an executor configured from `builder`
    #[tracing::instrument(skip(self, hook_args, builder), fields(mode = ?mode))]
    pub fn run<W: Write>(
        &self,
        mode: RunMode,
        hook_args: &[String],
        builder: ExecutorBuilder<W>,
    ) -> Result<ExecutionResult> {
        let general = &self.config.general;
        let mut builder = builder
            .continues(self.continues.unwrap_or(general.continues))
            .verbose(self.verbose.unwrap_or(general.verbose))
            .policy(self.policy);

        if let RunMode::Hook(signature) = mode
            && signature.stdin
            && let Some(data) = probe_stdin(self.ignore_missing_stdin)?
        {
            builder = builder.kwarg("stdin", String::from_utf8_lossy(&data));
        }

        let checks = self.checks(mode, hook_args)?;
        builder.build().run(Checks::Sized(checks))
    }
}

/// Files for one plugin; an unresolvable reference yields no files
fn files_for(
    discovery: &mut FileDiscovery<'_>,
    query: &FileQuery,
    patterns: &[String],
) -> Result<Vec<std::path::PathBuf>> {
    match discovery.files(query, patterns) {
        Err(Error::Git(message)) if matches!(query, FileQuery::Changed { .. }) => {
            tracing::warn!(%message, "Cannot compare against reference, checking no files");
            Ok(Vec::new())
        }
        other => other,
    }
}
