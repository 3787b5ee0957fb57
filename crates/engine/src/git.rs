//! Repository accessor
//!
//! Locates the enclosing git repository with git2 and exposes the hook
//! directory. The [`Repo`] value is passed explicitly to every component that
//! needs it.

use hooky_core::{Error, Result};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Helper function to convert git2 errors to `hooky_core` errors
#[inline]
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn git_err(e: git2::Error) -> Error {
    Error::Git(e.message().to_string())
}

/// An opened git repository
pub struct Repo {
    repo: git2::Repository,
    root: PathBuf,
    hooks_dir: PathBuf,
}

impl fmt::Debug for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repo")
            .field("root", &self.root)
            .field("git_dir", &self.repo.path())
            .field("hooks_dir", &self.hooks_dir)
            .finish()
    }
}

impl Repo {
    /// Find the repository containing `start`, searching parent directories
    ///
    /// # Errors
    ///
    /// Returns `Error::NotARepository` when no repository encloses `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        Self::discover_bounded(start, std::iter::empty::<&OsStr>())
    }

    /// Search upwards from `start` without entering any of `ceilings`
    fn discover_bounded<I, O>(start: &Path, ceilings: I) -> Result<Self>
    where
        I: IntoIterator<Item = O>,
        O: AsRef<OsStr>,
    {
        let flags = git2::RepositoryOpenFlags::CROSS_FS;
        let repo = git2::Repository::open_ext(start, flags, ceilings).map_err(|e| {
            tracing::debug!(error = %e, "Repository discovery failed");
            Error::NotARepository {
                path: start.to_path_buf(),
            }
        })?;

        Self::from_git2(repo)
    }

    /// Wrap an already opened git2 repository
    pub fn from_git2(repo: git2::Repository) -> Result<Self> {
        let root = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        let hooks_dir = resolve_hooks_dir(&repo, &root)?;

        tracing::debug!(
            root = %root.display(),
            hooks_dir = %hooks_dir.display(),
            "Opened repository"
        );

        Ok(Self {
            repo,
            root,
            hooks_dir,
        })
    }

    /// Working tree root (the git directory for bare repositories)
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory git runs hooks from
    #[must_use]
    pub fn hooks_dir(&self) -> &Path {
        &self.hooks_dir
    }

    /// Underlying git2 handle
    #[must_use]
    pub fn git2(&self) -> &git2::Repository {
        &self.repo
    }
}

/// Hooks live in `core.hooksPath` when set, otherwise `<common dir>/hooks`
fn resolve_hooks_dir(repo: &git2::Repository, root: &Path) -> Result<PathBuf> {
    let config = repo.config().map_err(git_err)?;

    match config.get_path("core.hooksPath") {
        Ok(path) if path.is_absolute() => Ok(path),
        Ok(path) => Ok(root.join(path)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(repo.commondir().join("hooks")),
        Err(e) => Err(git_err(e)),
    }
}
