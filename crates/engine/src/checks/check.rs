//! Checks and their outcomes

use crate::shell::{self, CommandOutput, RunOptions};
use hooky_core::{Error, Result};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Keyword arguments passed to a check
pub type Kwargs = IndexMap<String, String>;

/// Return code contributed by a check that raised instead of returning
pub const ERRORED: i32 = -2;

type CheckFn = dyn Fn(&[String], &Kwargs) -> Result<CheckValue> + Send + Sync;

/// What a check returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckValue {
    /// Result of an external command
    Command(CommandOutput),
    /// A plain return code (0 = pass)
    Code(i32),
    /// Anything else; reported as unrecognized and never a failure
    Other(String),
}

/// Detail of a check that failed to produce a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Error or panic message
    pub message: String,
    /// Contribution to the aggregate code, always [`ERRORED`]
    pub code: i32,
}

/// One unit of work: a callable with its arguments
#[derive(Clone)]
pub struct Check {
    name: String,
    func: Arc<CheckFn>,
    args: Vec<String>,
    kwargs: Kwargs,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .finish_non_exhaustive()
    }
}

impl Check {
    /// Create a check from a callable
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[String], &Kwargs) -> Result<CheckValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
            args: Vec::new(),
            kwargs: Kwargs::new(),
        }
    }

    /// A check that runs an executable
    ///
    /// Recognized keyword arguments: `cwd` (working directory), `timeout`
    /// (seconds, `0` = none) and `stdin` (text fed to standard input).
    pub fn script(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        Self::new(name, move |args, kwargs| {
            let options = run_options(kwargs)?;
            let output = shell::run_command(&program.to_string_lossy(), args, &options)?;
            Ok(CheckValue::Command(output))
        })
    }

    /// Append positional arguments
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a keyword argument
    #[must_use]
    pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional arguments
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the check with `overrides` layered over its own keyword arguments
    ///
    /// Errors and panics inside the callable become [`CheckOutcome::Errored`].
    /// The process panic hook is left alone, so a panicking check still prints
    /// its panic message to stderr.
    pub fn call(&self, overrides: &Kwargs) -> CheckOutcome {
        let mut kwargs = self.kwargs.clone();
        kwargs.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        let result = panic::catch_unwind(AssertUnwindSafe(|| (self.func)(&self.args, &kwargs)));
        let error = match result {
            Ok(Ok(value)) => {
                return CheckOutcome::Completed {
                    check: self.clone(),
                    value,
                };
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        tracing::debug!(check = %self.name, error = %error, "Check errored");
        CheckOutcome::Errored {
            check: self.clone(),
            error: ErrorInfo {
                message: error,
                code: ERRORED,
            },
        }
    }
}

fn run_options(kwargs: &Kwargs) -> Result<RunOptions> {
    let timeout = match kwargs.get("timeout") {
        Some(secs) => {
            let secs: u64 = secs
                .parse()
                .map_err(|_| Error::Message(format!("Invalid timeout '{secs}'")))?;
            (secs > 0).then(|| Duration::from_secs(secs))
        }
        None => None,
    };

    Ok(RunOptions {
        cwd: kwargs.get("cwd").map(PathBuf::from),
        timeout,
        stdin: kwargs.get("stdin").map(|s| s.as_bytes().to_vec()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// Result of running one check
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The check returned a value
    Completed {
        /// The check that ran
        check: Check,
        /// What it returned
        value: CheckValue,
    },
    /// The check returned an error or panicked
    Errored {
        /// The check that ran
        check: Check,
        /// What went wrong
        error: ErrorInfo,
    },
}

impl CheckOutcome {
    /// The check this outcome belongs to
    #[must_use]
    pub fn check(&self) -> &Check {
        match self {
            Self::Completed { check, .. } | Self::Errored { check, .. } => check,
        }
    }
}

/// Decides what return code an outcome contributes
///
/// By default only a nonzero exit status counts. Either flag also counts a
/// successful command that wrote to that stream as a failure with code 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturncodePolicy {
    /// Output on stderr fails the check
    pub stderr_fails: bool,
    /// Output on stdout fails the check
    pub stdout_fails: bool,
}

impl ReturncodePolicy {
    /// Return code contributed by `outcome` (0 = pass)
    #[must_use]
    pub fn is_returncode(&self, outcome: &CheckOutcome) -> i32 {
        match outcome {
            CheckOutcome::Errored { error, .. } => error.code,
            CheckOutcome::Completed { value, .. } => match value {
                CheckValue::Command(output) if output.status != 0 => output.status,
                CheckValue::Command(output) => {
                    let noisy = (self.stderr_fails && !output.stderr.trim().is_empty())
                        || (self.stdout_fails && !output.stdout.trim().is_empty());
                    i32::from(noisy)
                }
                CheckValue::Code(code) => *code,
                CheckValue::Other(_) => 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn completed(value: CheckValue) -> CheckOutcome {
        Check::new("c", move |_, _| Ok(value.clone())).call(&Kwargs::new())
    }

    fn command(status: i32, stdout: &str, stderr: &str) -> CheckValue {
        CheckValue::Command(CommandOutput {
            status,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        })
    }

    #[test]
    fn test_call_passes_args_and_merged_kwargs() {
        let check = Check::new("echo", |args, kwargs| {
            Ok(CheckValue::Other(format!(
                "{} {}",
                args.join(","),
                kwargs.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join(",")
            )))
        })
        .with_args(["a", "b"])
        .with_kwarg("x", "1")
        .with_kwarg("y", "2");

        let mut overrides = Kwargs::new();
        overrides.insert("y".to_string(), "3".to_string());

        match check.call(&overrides) {
            CheckOutcome::Completed { value, .. } => {
                assert_eq!(value, CheckValue::Other("a,b x=1,y=3".to_string()));
            }
            CheckOutcome::Errored { .. } => panic!("expected completed"),
        }
    }

    #[test]
    fn test_error_becomes_errored() {
        let check = Check::new("bad", |_, _| Err(Error::Message("boom".to_string())));
        match check.call(&Kwargs::new()) {
            CheckOutcome::Errored { check, error } => {
                assert_eq!(check.name(), "bad");
                assert_eq!(error.code, ERRORED);
                assert!(error.message.contains("boom"));
            }
            CheckOutcome::Completed { .. } => panic!("expected errored"),
        }
    }

    #[test]
    fn test_panic_becomes_errored() {
        let check = Check::new("panics", |_, _| panic!("kaboom"));
        match check.call(&Kwargs::new()) {
            CheckOutcome::Errored { error, .. } => assert!(error.message.contains("kaboom")),
            CheckOutcome::Completed { .. } => panic!("expected errored"),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = ReturncodePolicy::default();
        assert_eq!(policy.is_returncode(&completed(command(0, "out", "err"))), 0);
        assert_eq!(policy.is_returncode(&completed(command(3, "", ""))), 3);
        assert_eq!(policy.is_returncode(&completed(CheckValue::Code(4))), 4);
        assert_eq!(policy.is_returncode(&completed(CheckValue::Other("?".into()))), 0);

        let errored = Check::new("e", |_, _| Err(Error::Message("x".into()))).call(&Kwargs::new());
        assert_eq!(policy.is_returncode(&errored), ERRORED);
    }

    #[test]
    fn test_stream_policies() {
        let stderr = ReturncodePolicy {
            stderr_fails: true,
            stdout_fails: false,
        };
        assert_eq!(stderr.is_returncode(&completed(command(0, "", "warning"))), 1);
        assert_eq!(stderr.is_returncode(&completed(command(0, "info", ""))), 0);

        let stdout = ReturncodePolicy {
            stderr_fails: false,
            stdout_fails: true,
        };
        assert_eq!(stdout.is_returncode(&completed(command(0, "info", ""))), 1);
        assert_eq!(stdout.is_returncode(&completed(command(0, "  \n", ""))), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_script_check_uses_kwargs() {
        let temp = tempfile::TempDir::new().unwrap();
        let check = Check::script("cat", "cat").with_kwarg("cwd", temp.path().display().to_string());

        let mut overrides = Kwargs::new();
        overrides.insert("stdin".to_string(), "piped".to_string());

        match check.call(&overrides) {
            CheckOutcome::Completed {
                value: CheckValue::Command(output),
                ..
            } => {
                assert_eq!(output.status, 0);
                assert_eq!(output.stdout, "piped");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_script_check_missing_program() {
        let check = Check::script("missing", "/nonexistent/hooky-test-program");
        let outcome = check.call(&Kwargs::new());
        assert!(matches!(outcome, CheckOutcome::Errored { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_script_check_timeout_is_errored() {
        let check = Check::script("sleep", "sleep")
            .with_args(["5"])
            .with_kwarg("timeout", "1");

        match check.call(&Kwargs::new()) {
            CheckOutcome::Errored { error, .. } => assert_eq!(error.code, ERRORED),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
