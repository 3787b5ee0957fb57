//! Hook installer and slot state manager
//!
//! Each known hook name maps to a slot file in the repository's hooks
//! directory. A slot is absent, managed (byte-identical to [`RUNNER`]) or
//! stale (anything else). Activation is the slot's executable bit and is
//! independent of staleness.
//!
//! State is never cached: every operation reads the filesystem, and callers
//! re-scan after mutating. There is no locking; two concurrent invocations
//! against one repository race and the last write wins.

use super::registry::{self, HookSignature};
use crate::git::Repo;
use crate::system;
use hooky_config::LinkMode;
use hooky_core::{Error, Result};
use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// The canonical runner installed into every managed slot
pub static RUNNER: &[u8] = include_bytes!("runner.sh");

/// Suffix of the per-hook scripts directory (`<hook>.d`)
pub const SCRIPTS_DIR_SUFFIX: &str = ".d";

/// Suffix of the backup taken when a foreign slot file is replaced
pub const BACKUP_SUFFIX: &str = ".old";

/// Source of yes/no answers for destructive operations
pub trait Confirm {
    /// Ask `prompt` and return the answer
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> Result<bool>,
{
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self(prompt)
    }
}

/// Answers yes to every question (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        tracing::debug!(prompt, "Assuming yes");
        Ok(true)
    }
}

/// Classification of one hook slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No file in the slot
    Absent,
    /// A file that is not the current runner
    Stale,
    /// The current runner
    Managed,
}

impl SlotState {
    /// Lowercase label for display
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Stale => "stale",
            Self::Managed => "managed",
        }
    }
}

/// On-disk state of one hook slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledHook {
    /// Registry entry for the hook
    pub signature: &'static HookSignature,
    /// Slot file path (may not exist)
    pub file_path: PathBuf,
    /// Whether the slot file exists
    pub exists: bool,
    /// Executable bit of the slot file (false when absent)
    pub active: bool,
    /// Whether the slot file is byte-identical to [`RUNNER`]
    pub is_managed_runner: bool,
    /// Sibling scripts directory, when present as a directory
    pub scripts_dir: Option<PathBuf>,
}

impl InstalledHook {
    /// Hook name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.signature.name
    }

    /// Slot classification
    #[must_use]
    pub fn state(&self) -> SlotState {
        match (self.exists, self.is_managed_runner) {
            (false, _) => SlotState::Absent,
            (true, false) => SlotState::Stale,
            (true, true) => SlotState::Managed,
        }
    }

    /// Where the scripts directory lives, whether or not it exists
    #[must_use]
    pub fn scripts_dir_path(&self) -> PathBuf {
        scripts_dir_for(&self.file_path)
    }

    /// Where a replaced slot file is backed up
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.file_path, BACKUP_SUFFIX)
    }

    /// Entries of the scripts directory, sorted by name
    pub fn scripts(&self) -> Result<Vec<PathBuf>> {
        let Some(dir) = &self.scripts_dir else {
            return Ok(Vec::new());
        };

        let mut scripts: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .collect();
        scripts.sort();
        Ok(scripts)
    }
}

impl fmt::Display for InstalledHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name(), self.state().as_str())?;
        if self.exists {
            f.write_str(if self.active { ", active" } else { ", inactive" })?;
        }
        f.write_str(")")
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn scripts_dir_for(slot: &Path) -> PathBuf {
    with_suffix(slot, SCRIPTS_DIR_SUFFIX)
}

/// Whether something (including a dangling symlink) occupies `path`
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Read the state of one slot
pub fn inspect(repo: &Repo, signature: &'static HookSignature) -> Result<InstalledHook> {
    let file_path = repo.hooks_dir().join(signature.name);
    let exists = occupied(&file_path);
    let scripts_dir = Some(scripts_dir_for(&file_path)).filter(|d| d.is_dir());

    let (active, is_managed_runner) = if exists {
        (
            system::is_executable(&file_path),
            system::same_content(&file_path, RUNNER)?,
        )
    } else {
        (false, false)
    };

    Ok(InstalledHook {
        signature,
        file_path,
        exists,
        active,
        is_managed_runner,
        scripts_dir,
    })
}

/// Read the state of every slot file present in the hooks directory
///
/// Files that are not named after a known hook are ignored. The result is
/// sorted by hook name.
#[tracing::instrument(skip(repo), fields(hooks_dir = %repo.hooks_dir().display()))]
pub fn scan(repo: &Repo) -> Result<Vec<InstalledHook>> {
    let entries = match fs::read_dir(repo.hooks_dir()) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("Hooks directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut hooks = Vec::new();
    for entry in entries.filter_map(std::result::Result::ok) {
        let file_name = entry.file_name();
        let Some(signature) = file_name.to_str().and_then(registry::signature) else {
            continue;
        };
        hooks.push(inspect(repo, signature)?);
    }

    hooks.sort_by_key(InstalledHook::name);
    Ok(hooks)
}

/// Result of [`install`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The runner was written into an empty slot
    Installed,
    /// The slot already held the runner; nothing changed
    AlreadyInstalled,
    /// A foreign file was backed up and replaced
    Replaced {
        /// Where the previous file was preserved
        backup: PathBuf,
    },
    /// Replacement was declined; nothing changed
    Declined,
}

/// Install the runner into a slot
///
/// A foreign file is only replaced after confirmation, and is first
/// hard-linked to `<slot>.old` (overwriting an older backup). Filesystem
/// errors abort the operation and leave whatever was already done in place.
#[tracing::instrument(skip(hook, repo, confirm), fields(hook = hook.name()))]
pub fn install(hook: &InstalledHook, repo: &Repo, confirm: &impl Confirm) -> Result<InstallOutcome> {
    let slot = &hook.file_path;

    if !occupied(slot) {
        write_runner(hook, repo)?;
        tracing::info!("Installed runner");
        return Ok(InstallOutcome::Installed);
    }

    if system::same_content(slot, RUNNER)? {
        tracing::debug!("Runner already installed");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let prompt = format!(
        "{} exists and is not the hooky runner. Replace it (a backup is kept)?",
        slot.display()
    );
    if !confirm.confirm(&prompt)? {
        tracing::info!("Replacement declined");
        return Ok(InstallOutcome::Declined);
    }

    let backup = hook.backup_path();
    system::remove_file_if_exists(&backup)?;
    fs::hard_link(slot, &backup).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to back up {} to {}: {e}", slot.display(), backup.display()),
        ))
    })?;
    system::remove_file_if_exists(slot)?;
    write_runner(hook, repo)?;

    tracing::info!(backup = %backup.display(), "Replaced existing hook");
    Ok(InstallOutcome::Replaced { backup })
}

fn write_runner(hook: &InstalledHook, repo: &Repo) -> Result<()> {
    fs::create_dir_all(repo.hooks_dir())?;
    system::write_executable(&hook.file_path, RUNNER)?;
    fs::create_dir_all(hook.scripts_dir_path())?;
    Ok(())
}

/// Set the slot's executable bit; absent slots are left alone
#[tracing::instrument(skip(hook), fields(hook = hook.name()))]
pub fn activate(hook: &InstalledHook) -> Result<()> {
    toggle(hook, true)
}

/// Clear the slot's executable bit; absent slots are left alone
#[tracing::instrument(skip(hook), fields(hook = hook.name()))]
pub fn deactivate(hook: &InstalledHook) -> Result<()> {
    toggle(hook, false)
}

fn toggle(hook: &InstalledHook, executable: bool) -> Result<()> {
    if !hook.file_path.is_file() {
        tracing::debug!("Slot is empty, nothing to toggle");
        return Ok(());
    }
    system::set_executable(&hook.file_path, executable)
}

/// Result of [`remove`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOutcome {
    /// The slot file was deleted
    pub slot_removed: bool,
    /// The scripts directory was deleted
    pub scripts_removed: bool,
}

/// Remove a slot file and, separately confirmed, its scripts directory
///
/// Removing an absent hook does nothing and asks nothing.
#[tracing::instrument(skip(hook, confirm), fields(hook = hook.name()))]
pub fn remove(hook: &InstalledHook, confirm: &impl Confirm) -> Result<RemoveOutcome> {
    let mut outcome = RemoveOutcome::default();

    if occupied(&hook.file_path)
        && confirm.confirm(&format!("Remove {}?", hook.file_path.display()))?
    {
        outcome.slot_removed = system::remove_file_if_exists(&hook.file_path)?;
        tracing::info!("Removed hook");
    }

    let scripts_dir = hook.scripts_dir_path();
    if scripts_dir.is_dir()
        && confirm.confirm(&format!(
            "Remove scripts directory {} and everything in it?",
            scripts_dir.display()
        ))?
    {
        fs::remove_dir_all(&scripts_dir)?;
        outcome.scripts_removed = true;
        tracing::info!(dir = %scripts_dir.display(), "Removed scripts directory");
    }

    Ok(outcome)
}

/// Place `source` into the hook's scripts directory
///
/// The directory is created when missing and an existing entry with the same
/// name is replaced. Returns the installed path.
#[tracing::instrument(skip(hook), fields(hook = hook.name()))]
pub fn add_script(hook: &InstalledHook, source: &Path, mode: LinkMode) -> Result<PathBuf> {
    let source = source.canonicalize().map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Script {} is not accessible: {e}", source.display()),
        ))
    })?;
    let file_name = source
        .file_name()
        .ok_or_else(|| Error::Message(format!("Invalid script path: {}", source.display())))?;

    let dir = hook.scripts_dir_path();
    fs::create_dir_all(&dir)?;

    let dest = dir.join(file_name);
    system::remove_file_if_exists(&dest)?;
    system::link_or_copy(&source, &dest, mode)?;

    tracing::info!(script = %dest.display(), ?mode, "Added script");
    Ok(dest)
}

/// Remove a script from the hook's scripts directory by file name
pub fn remove_script(hook: &InstalledHook, file_name: &str) -> Result<bool> {
    system::remove_file_if_exists(&hook.scripts_dir_path().join(file_name))
}

/// Let the user pick one hook by its 1-based number
///
/// Keeps asking until a number in `1..=hooks.len()` is entered. Returns the
/// 0-based index. End of input is an error.
pub fn choose_hook<R, W>(hooks: &[InstalledHook], input: &mut R, output: &mut W) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    if hooks.is_empty() {
        return Err(Error::Message("No hooks to choose from".to_string()));
    }

    for (i, hook) in hooks.iter().enumerate() {
        writeln!(output, "{:>3}) {hook}", i + 1)?;
    }

    loop {
        write!(output, "Choose a hook [1-{}]: ", hooks.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::Message("No hook selected (end of input)".to_string()));
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=hooks.len()).contains(&n) => return Ok(n - 1),
            _ => writeln!(
                output,
                "Invalid choice '{}', enter a number between 1 and {}",
                line.trim(),
                hooks.len()
            )?,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Repo) {
        let temp = TempDir::new().unwrap();
        let repo = Repo::from_git2(git2::Repository::init(temp.path()).unwrap()).unwrap();
        (temp, repo)
    }

    fn pre_commit(repo: &Repo) -> InstalledHook {
        inspect(repo, registry::signature("pre-commit").unwrap()).unwrap()
    }

    #[test]
    fn test_runner_is_shell_script() {
        assert!(RUNNER.starts_with(b"#!/bin/sh\n"));
    }

    #[test]
    fn test_inspect_absent() {
        let (_temp, repo) = setup();
        let hook = pre_commit(&repo);

        assert!(!hook.exists);
        assert!(!hook.active);
        assert!(!hook.is_managed_runner);
        assert!(hook.scripts_dir.is_none());
        assert_eq!(hook.state(), SlotState::Absent);
        assert_eq!(hook.to_string(), "pre-commit (absent)");
    }

    #[test]
    fn test_scan_ignores_samples() {
        let (_temp, repo) = setup();
        fs::create_dir_all(repo.hooks_dir()).unwrap();
        // git init writes *.sample files; add an unrelated file as well
        fs::write(repo.hooks_dir().join("pre-commit.sample"), "x").unwrap();
        fs::write(repo.hooks_dir().join("not-a-hook"), "x").unwrap();
        fs::write(repo.hooks_dir().join("pre-push"), "x").unwrap();
        fs::write(repo.hooks_dir().join("commit-msg"), "x").unwrap();

        let hooks = scan(&repo).unwrap();
        let names: Vec<_> = hooks.iter().map(InstalledHook::name).collect();
        assert_eq!(names, vec!["commit-msg", "pre-push"]);
        assert!(hooks.iter().all(|h| h.state() == SlotState::Stale));
    }

    #[test]
    fn test_scan_missing_hooks_dir() {
        let (_temp, repo) = setup();
        let _ = fs::remove_dir_all(repo.hooks_dir());
        assert!(scan(&repo).unwrap().is_empty());
    }

    #[test]
    fn test_install_fresh() {
        let (_temp, repo) = setup();
        let outcome = install(&pre_commit(&repo), &repo, &AssumeYes).unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);

        let hook = pre_commit(&repo);
        assert_eq!(hook.state(), SlotState::Managed);
        assert!(hook.active);
        assert_eq!(hook.scripts_dir, Some(hook.scripts_dir_path()));
    }

    #[test]
    fn test_install_declined_keeps_foreign_file() {
        let (_temp, repo) = setup();
        fs::create_dir_all(repo.hooks_dir()).unwrap();
        let slot = repo.hooks_dir().join("pre-commit");
        fs::write(&slot, "#!/bin/sh\necho mine\n").unwrap();

        let refuse = |_: &str| -> Result<bool> { Ok(false) };
        let outcome = install(&pre_commit(&repo), &repo, &refuse).unwrap();

        assert_eq!(outcome, InstallOutcome::Declined);
        assert_eq!(fs::read_to_string(&slot).unwrap(), "#!/bin/sh\necho mine\n");
        assert!(!pre_commit(&repo).backup_path().exists());
    }

    #[test]
    fn test_install_replace_takes_backup() {
        let (_temp, repo) = setup();
        fs::create_dir_all(repo.hooks_dir()).unwrap();
        let slot = repo.hooks_dir().join("pre-commit");
        fs::write(&slot, "old hook").unwrap();
        let hook = pre_commit(&repo);
        fs::write(hook.backup_path(), "older backup").unwrap();

        let outcome = install(&hook, &repo, &AssumeYes).unwrap();

        let backup = hook.backup_path();
        assert_eq!(outcome, InstallOutcome::Replaced { backup: backup.clone() });
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old hook");
        assert_eq!(fs::read(&slot).unwrap(), RUNNER);
        assert_eq!(pre_commit(&repo).state(), SlotState::Managed);
    }

    #[test]
    fn test_activate_on_absent_is_noop() {
        let (_temp, repo) = setup();
        let hook = pre_commit(&repo);
        activate(&hook).unwrap();
        deactivate(&hook).unwrap();
        assert!(!hook.file_path.exists());
    }

    #[test]
    fn test_remove_asks_separately() {
        let (_temp, repo) = setup();
        install(&pre_commit(&repo), &repo, &AssumeYes).unwrap();
        let hook = pre_commit(&repo);

        // Yes to the slot, no to the scripts directory
        let answers = std::cell::RefCell::new(vec![false, true]);
        let scripted = |_: &str| -> Result<bool> { Ok(answers.borrow_mut().pop().unwrap()) };
        let outcome = remove(&hook, &scripted).unwrap();

        assert!(outcome.slot_removed);
        assert!(!outcome.scripts_removed);
        assert!(!hook.file_path.exists());
        assert!(hook.scripts_dir_path().is_dir());
    }

    #[test]
    fn test_remove_absent_asks_nothing() {
        let (_temp, repo) = setup();
        let never = |_: &str| -> Result<bool> { panic!("should not ask") };
        let outcome = remove(&pre_commit(&repo), &never).unwrap();
        assert_eq!(outcome, RemoveOutcome::default());
    }

    #[test]
    fn test_add_and_remove_script() {
        let (temp, repo) = setup();
        let source = temp.path().join("lint.sh");
        system::write_executable(&source, b"#!/bin/sh\nexit 0\n").unwrap();

        let hook = pre_commit(&repo);
        let dest = add_script(&hook, &source, LinkMode::Copy).unwrap();
        assert_eq!(dest, hook.scripts_dir_path().join("lint.sh"));
        assert_eq!(fs::read(&dest).unwrap(), b"#!/bin/sh\nexit 0\n");

        let hook = pre_commit(&repo);
        assert_eq!(hook.scripts().unwrap(), vec![dest.clone()]);

        assert!(remove_script(&hook, "lint.sh").unwrap());
        assert!(!dest.exists());
    }

    #[test]
    fn test_choose_hook_reprompts() {
        let (_temp, repo) = setup();
        let hooks = vec![
            inspect(&repo, registry::signature("commit-msg").unwrap()).unwrap(),
            pre_commit(&repo),
        ];

        let mut input = Cursor::new("0\nabc\n3\n2\n");
        let mut output = Vec::new();
        let index = choose_hook(&hooks, &mut input, &mut output).unwrap();

        assert_eq!(index, 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("  1) commit-msg (absent)"));
        assert!(text.contains("  2) pre-commit (absent)"));
        assert_eq!(text.matches("Invalid choice").count(), 3);
    }

    #[test]
    fn test_choose_hook_end_of_input() {
        let (_temp, repo) = setup();
        let hooks = vec![pre_commit(&repo)];
        let mut input = Cursor::new("9\n");
        let result = choose_hook(&hooks, &mut input, &mut Vec::new());
        assert!(result.is_err());
    }
}
