//! Hook registry
//!
//! Static table of the lifecycle points git invokes hooks for, with the
//! positional arguments git passes and whether it pipes data on stdin.

use hooky_core::{Error, Result};

/// Invocation signature of one git hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSignature {
    /// Hook name as it appears in the hooks directory
    pub name: &'static str,
    /// Roles of the positional arguments git supplies, in order
    pub args: &'static [&'static str],
    /// Whether git writes data to the hook's standard input
    pub stdin: bool,
}

impl HookSignature {
    const fn new(name: &'static str, args: &'static [&'static str], stdin: bool) -> Self {
        Self { name, args, stdin }
    }
}

/// Every hook git knows about, in lifecycle order
pub static HOOKS: &[HookSignature] = &[
    HookSignature::new("applypatch-msg", &["message file"], false),
    HookSignature::new("pre-applypatch", &[], false),
    HookSignature::new("post-applypatch", &[], false),
    HookSignature::new("pre-commit", &[], false),
    HookSignature::new("pre-merge-commit", &[], false),
    HookSignature::new(
        "prepare-commit-msg",
        &["message file", "message source", "commit sha"],
        false,
    ),
    HookSignature::new("commit-msg", &["message file"], false),
    HookSignature::new("post-commit", &[], false),
    HookSignature::new("pre-rebase", &["upstream", "rebased branch"], false),
    HookSignature::new(
        "post-checkout",
        &["previous head", "new head", "branch checkout flag"],
        false,
    ),
    HookSignature::new("post-merge", &["squash flag"], false),
    HookSignature::new("pre-push", &["remote name", "remote url"], true),
    HookSignature::new("pre-receive", &[], true),
    HookSignature::new("update", &["ref name", "old object", "new object"], false),
    HookSignature::new("proc-receive", &[], true),
    HookSignature::new("post-receive", &[], true),
    HookSignature::new("post-update", &["ref names"], false),
    HookSignature::new("reference-transaction", &["state"], true),
    HookSignature::new("push-to-checkout", &["new commit"], false),
    HookSignature::new("pre-auto-gc", &[], false),
    HookSignature::new("post-rewrite", &["command"], true),
    HookSignature::new("sendemail-validate", &["email file", "smtp headers file"], false),
    HookSignature::new("fsmonitor-watchman", &["version", "token"], false),
    HookSignature::new("p4-changelist", &["message file"], false),
    HookSignature::new("p4-prepare-changelist", &["message file"], false),
    HookSignature::new("p4-post-changelist", &[], false),
    HookSignature::new("p4-pre-submit", &[], false),
    HookSignature::new(
        "post-index-change",
        &["working tree updated", "skip-worktree updated"],
        false,
    ),
];

/// Look up a hook by exact name
#[must_use]
pub fn signature(name: &str) -> Option<&'static HookSignature> {
    HOOKS.iter().find(|h| h.name == name)
}

/// Whether `name` is a known hook
#[must_use]
pub fn is_known(name: &str) -> bool {
    signature(name).is_some()
}

/// All hook names, sorted
#[must_use]
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = HOOKS.iter().map(|h| h.name).collect();
    names.sort_unstable();
    names
}

/// Resolve a user-supplied hook name against the full registry
///
/// An exact name wins; otherwise a unique substring match is accepted.
pub fn resolve(query: &str) -> Result<&'static HookSignature> {
    let name = match_name(query, &names())?;
    signature(name).ok_or_else(|| Error::UnknownHook {
        name: query.to_string(),
        known: names().into_iter().map(String::from).collect(),
    })
}

/// Match `query` against `candidates` by exact name, then unique substring
///
/// # Errors
///
/// `UnknownHook` when nothing matches, `AmbiguousHook` when several do.
pub fn match_name<'a>(query: &str, candidates: &[&'a str]) -> Result<&'a str> {
    if let Some(exact) = candidates.iter().find(|c| **c == query) {
        return Ok(*exact);
    }

    let matches: Vec<&'a str> = candidates
        .iter()
        .copied()
        .filter(|c| c.contains(query))
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        [] => Err(Error::UnknownHook {
            name: query.to_string(),
            known: candidates.iter().map(|c| (*c).to_string()).collect(),
        }),
        _ => Err(Error::AmbiguousHook {
            query: query.to_string(),
            candidates: matches.iter().map(|c| (*c).to_string()).collect(),
        }),
    }
}
