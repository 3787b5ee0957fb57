//! Shell executor
//!
//! Runs an external program synchronously and captures its output. A nonzero
//! exit status is a normal result, not an error; only failing to start the
//! program (or running past a timeout) is an error.

use hooky_core::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status (128 + signal number when killed by a signal)
    pub status: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Options for [`run_command`]
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working directory (inherits the current one when unset)
    pub cwd: Option<PathBuf>,
    /// Kill the command after this long (no limit when unset)
    pub timeout: Option<Duration>,
    /// Bytes fed to standard input (null input when unset)
    pub stdin: Option<Vec<u8>>,
}

/// Run `program` with `args` and capture stdout, stderr and exit status
///
/// Without a timeout a hung command blocks the caller indefinitely.
#[tracing::instrument(skip(args, options), fields(cwd = ?options.cwd))]
pub fn run_command<I, A>(program: &str, args: I, options: &RunOptions) -> Result<CommandOutput>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    tracing::debug!("Executing command: {} {:?}", program, args);

    let mut expression = duct::cmd(program, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked();

    if let Some(cwd) = &options.cwd {
        expression = expression.dir(cwd);
    }

    expression = match &options.stdin {
        Some(bytes) => expression.stdin_bytes(bytes.clone()),
        None => expression.stdin_null(),
    };

    let spawn_err = |source: std::io::Error| Error::CommandSpawn {
        program: program.to_string(),
        source,
    };

    let output = match options.timeout {
        Some(timeout) => {
            let handle = expression.start().map_err(spawn_err)?;
            match handle.wait_timeout(timeout).map_err(spawn_err)? {
                Some(output) => output.clone(),
                None => {
                    if let Err(e) = handle.kill() {
                        tracing::warn!(error = %e, "Failed to kill timed out command");
                    }
                    return Err(Error::CommandTimeout {
                        program: program.to_string(),
                        secs: timeout.as_secs(),
                    });
                }
            }
        }
        None => expression.run().map_err(spawn_err)?,
    };

    let result = CommandOutput {
        status: exit_code(output.status),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    tracing::debug!(status = result.status, "Command finished");
    Ok(result)
}

/// Run `program` with the terminal attached and return its exit code
///
/// Used when the user runs a hook by hand and should see its output live.
#[tracing::instrument(skip(args))]
pub fn run_interactive<I, A>(program: &str, args: I, cwd: &Path) -> Result<i32>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let output = duct::cmd(program, args)
        .dir(cwd)
        .unchecked()
        .run()
        .map_err(|source| Error::CommandSpawn {
            program: program.to_string(),
            source,
        })?;
    Ok(exit_code(output.status))
}

/// Convert an exit status to a shell-style integer code
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
