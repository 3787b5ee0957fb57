//! File discovery
//!
//! Collects the working tree files a hook run should check. Paths are
//! relative to the repository root. Results are memoized per query until
//! [`FileDiscovery::invalidate`] is called.

use crate::git::{Repo, git_err};
use git2::{Delta, Diff};
use hooky_core::{Memo, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which files to collect
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileQuery {
    /// Files staged in the index relative to `HEAD`
    Added,
    /// Files differing between `reference` and the working tree
    Changed {
        /// Any revision git can parse (`@{upstream}`, `origin/main`, a sha)
        reference: String,
    },
    /// Every file in the working tree
    All,
}

/// File lister bound to one repository
#[derive(Debug)]
pub struct FileDiscovery<'r> {
    repo: &'r Repo,
    ignore: Vec<String>,
    cache: Memo<FileQuery, Vec<PathBuf>>,
}

impl<'r> FileDiscovery<'r> {
    /// Create a lister; `ignore` names directories skipped by [`FileQuery::All`]
    #[must_use]
    pub fn new(repo: &'r Repo, ignore: &[String]) -> Self {
        let mut ignore = ignore.to_vec();
        if !ignore.iter().any(|name| name == ".git") {
            ignore.push(".git".to_string());
        }

        Self {
            repo,
            ignore,
            cache: Memo::new(),
        }
    }

    /// Files for `query` whose name matches any of `patterns`
    ///
    /// An empty pattern list matches every file.
    pub fn files(&mut self, query: &FileQuery, patterns: &[String]) -> Result<Vec<PathBuf>> {
        let repo = self.repo;
        let ignore = &self.ignore;
        let all = self
            .cache
            .get_or_try_insert_with(query.clone(), || collect(repo, ignore, query))?;

        Ok(all
            .iter()
            .filter(|path| matches_any(path, patterns))
            .cloned()
            .collect())
    }

    /// Forget every memoized listing
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}

#[tracing::instrument(skip(repo, ignore))]
fn collect(repo: &Repo, ignore: &[String], query: &FileQuery) -> Result<Vec<PathBuf>> {
    let files = match query {
        FileQuery::Added => added(repo)?,
        FileQuery::Changed { reference } => changed(repo, reference)?,
        FileQuery::All => all(repo, ignore),
    };
    tracing::debug!(count = files.len(), "Collected files");
    Ok(files)
}

fn added(repo: &Repo) -> Result<Vec<PathBuf>> {
    let git = repo.git2();
    // Unborn HEAD: every staged file is new
    let head = git.head().ok().and_then(|head| head.peel_to_tree().ok());
    let diff = git
        .diff_tree_to_index(head.as_ref(), None, None)
        .map_err(git_err)?;

    Ok(paths_from_diff(&diff, |status| {
        matches!(
            status,
            Delta::Added | Delta::Copied | Delta::Modified | Delta::Renamed
        )
    }))
}

fn changed(repo: &Repo, reference: &str) -> Result<Vec<PathBuf>> {
    let git = repo.git2();
    let tree = git
        .revparse_single(reference)
        .and_then(|object| object.peel_to_tree())
        .map_err(git_err)?;
    let diff = git
        .diff_tree_to_workdir_with_index(Some(&tree), None)
        .map_err(git_err)?;

    Ok(paths_from_diff(&diff, |status| status != Delta::Deleted))
}

fn paths_from_diff(diff: &Diff<'_>, keep: impl Fn(Delta) -> bool) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = diff
        .deltas()
        .filter(|delta| keep(delta.status()))
        .filter_map(|delta| delta.new_file().path().map(Path::to_path_buf))
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

fn all(repo: &Repo, ignore: &[String]) -> Vec<PathBuf> {
    let root = repo.root();
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !ignore.iter().any(|name| entry.file_name() == name.as_str())
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    paths.sort();
    paths
}

/// Whether the file name matches one of `patterns`
///
/// Patterns containing glob metacharacters are globs; anything else is a
/// plain suffix such as `.rs`.
pub fn matches_any(path: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return true;
    }

    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    patterns.iter().any(|pattern| {
        if pattern.contains(['*', '?', '[']) {
            glob::Pattern::new(pattern).is_ok_and(|p| p.matches(name))
        } else {
            name.ends_with(pattern.as_str())
        }
    })
}
