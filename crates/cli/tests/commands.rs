//! Integration tests for CLI commands
//!
//! Commands are executed through the library against scratch repositories
//! with a repository config file, so no user configuration leaks in.

#![allow(clippy::unwrap_used, clippy::panic)]

use hooky::cmd::check::CheckCommand;
use hooky::cmd::install::InstallCommand;
use hooky::cmd::toggle::ToggleCommand;
use hooky::cmd::uninstall::UninstallCommand;
use hooky::command::Command;
use hooky::common::RuntimeContext;
use hooky_engine::hooks::installer::{self, SlotState};
use hooky_engine::hooks::registry;
use std::fs;
use tempfile::TempDir;

fn context(config: &str) -> (TempDir, RuntimeContext) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    git2::Repository::init(temp.path()).expect("Failed to init repository");
    fs::write(temp.path().join(".hooky.toml"), config).unwrap();
    let context = RuntimeContext::load(temp.path(), None).unwrap();
    (temp, context)
}

fn install(hooks: &[&str]) -> InstallCommand {
    InstallCommand {
        hooks: hooks.iter().map(ToString::to_string).collect(),
        yes: true,
        copy: false,
        no_plugins: true,
    }
}

#[test]
fn test_install_defaults_to_pre_commit() {
    let (_temp, context) = context("");
    install(&[]).execute(&context).unwrap();

    let hooks = installer::scan(&context.repo).unwrap();
    assert_eq!(hooks.len(), 1);
    assert_eq!(hooks[0].name(), "pre-commit");
    assert_eq!(hooks[0].state(), SlotState::Managed);
}

#[test]
fn test_install_defaults_to_plugin_hooks() {
    let (_temp, context) = context(
        "[[plugins]]\nname = \"msg\"\nhook = \"commit-msg\"\nscript = \"hooky-test-msg\"\n",
    );
    install(&[]).execute(&context).unwrap();

    let names: Vec<_> = installer::scan(&context.repo)
        .unwrap()
        .iter()
        .map(|h| h.name())
        .collect();
    assert_eq!(names, vec!["commit-msg"]);
}

#[test]
fn test_install_resolves_partial_names() {
    let (_temp, context) = context("");
    install(&["pre-pu", "commit-msg"]).execute(&context).unwrap();

    let names: Vec<_> = installer::scan(&context.repo)
        .unwrap()
        .iter()
        .map(|h| h.name())
        .collect();
    assert_eq!(names, vec!["commit-msg", "pre-push"]);
}

#[test]
fn test_install_unknown_hook_is_usage_error() {
    let (_temp, context) = context("");
    let err = install(&["pre-comit-typo"]).execute(&context).unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_disable_then_enable() {
    let (_temp, context) = context("");
    install(&["pre-commit"]).execute(&context).unwrap();
    let signature = registry::signature("pre-commit").unwrap();

    ToggleCommand {
        hook: "pre-commit".to_string(),
        enable: false,
    }
    .execute(&context)
    .unwrap();
    assert!(!installer::inspect(&context.repo, signature).unwrap().active);

    ToggleCommand {
        hook: "pre-commit".to_string(),
        enable: true,
    }
    .execute(&context)
    .unwrap();
    assert!(installer::inspect(&context.repo, signature).unwrap().active);
}

#[test]
fn test_enable_missing_slot_fails() {
    let (_temp, context) = context("");
    let err = ToggleCommand {
        hook: "post-merge".to_string(),
        enable: true,
    }
    .execute(&context)
    .unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_uninstall_everything() {
    let (_temp, context) = context("");
    install(&["pre-commit", "pre-push"]).execute(&context).unwrap();

    UninstallCommand {
        hooks: Vec::new(),
        yes: true,
    }
    .execute(&context)
    .unwrap();

    assert!(installer::scan(&context.repo).unwrap().is_empty());
    assert!(!context.repo.hooks_dir().join("pre-commit.d").exists());
}

#[cfg(unix)]
#[test]
fn test_uninstall_tears_down_plugins_after_removal() {
    let (_temp, context) = context(
        "[[plugins]]\nname = \"teardown\"\nhook = \"pre-commit\"\nscript = \"sh\"\nsetup = \"touch\"\n",
    );
    install(&["pre-commit"]).execute(&context).unwrap();
    assert!(!context.repo.root().join("uninstall").exists());

    UninstallCommand {
        hooks: vec!["pre-commit".to_string()],
        yes: true,
    }
    .execute(&context)
    .unwrap();

    assert!(installer::scan(&context.repo).unwrap().is_empty());
    assert!(context.repo.root().join("uninstall").exists());
}

#[cfg(unix)]
#[test]
fn test_uninstall_survives_missing_setup_program() {
    let (_temp, context) = context(
        "[[plugins]]\nname = \"broken\"\nhook = \"pre-commit\"\nscript = \"sh\"\nsetup = \"hooky-no-such-setup-program\"\n",
    );
    install(&["pre-commit"]).execute(&context).unwrap();

    UninstallCommand {
        hooks: vec!["pre-commit".to_string()],
        yes: true,
    }
    .execute(&context)
    .unwrap();

    assert!(installer::scan(&context.repo).unwrap().is_empty());
}

#[test]
fn test_check_without_plugins_passes() {
    let (_temp, context) = context("");
    let code = CheckCommand {
        hook: None,
        continues: None,
        verbose_summary: false,
        stderr_fails: false,
        stdout_fails: false,
        ignore_missing_stdin: true,
        args: Vec::new(),
    }
    .execute(&context)
    .unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_not_a_repository() {
    let temp = TempDir::new().unwrap();
    if git2::Repository::discover(temp.path()).is_ok() {
        // Temp directory lives inside a repository; nothing to check
        return;
    }
    let err = RuntimeContext::load(temp.path(), None).unwrap_err();
    assert!(err.is_usage());
}
