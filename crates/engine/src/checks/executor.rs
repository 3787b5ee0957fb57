//! Check execution engine
//!
//! Runs checks in order, classifies each outcome and enforces the failure
//! budget. The display strategy depends on what is known about the checks:
//! a few sized checks get a line each, many get a progress bar, and a lazy
//! stream gets one character per check.

use super::check::{Check, CheckOutcome, CheckValue, Kwargs, ReturncodePolicy};
use hooky_core::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::fmt;
use std::io::{self, Write};

/// Sized collections at least this long are shown with a progress bar
pub const PROGRESS_THRESHOLD: usize = 4;

/// Checks to run: a known-length list or a single-pass stream
pub enum Checks {
    /// A list whose length is known up front
    Sized(Vec<Check>),
    /// A finite stream of unknown length, consumed once
    Lazy(Box<dyn Iterator<Item = Check>>),
}

impl Checks {
    /// Wrap an iterator as a lazy stream
    pub fn lazy<I>(checks: I) -> Self
    where
        I: Iterator<Item = Check> + 'static,
    {
        Self::Lazy(Box::new(checks))
    }

    /// Display strategy for this collection
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Self::Sized(checks) if checks.len() < PROGRESS_THRESHOLD => ExecutionMode::Simple,
            Self::Sized(_) => ExecutionMode::Progress,
            Self::Lazy(_) => ExecutionMode::Streaming,
        }
    }
}

impl From<Vec<Check>> for Checks {
    fn from(checks: Vec<Check>) -> Self {
        Self::Sized(checks)
    }
}

impl fmt::Debug for Checks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sized(checks) => f.debug_tuple("Sized").field(checks).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Display strategy of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// A start and end line per check
    Simple,
    /// A single progress bar; failures printed above it
    Progress,
    /// One character per check, then a summary
    Streaming,
}

/// Accumulated result of a run
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Outcomes in execution order
    pub outcomes: Vec<CheckOutcome>,
    /// Number of outcomes with a nonzero return code
    pub failures: usize,
    /// Bitwise OR of every return code
    pub returncode: i32,
    /// Strategy the run used
    pub mode: ExecutionMode,
    /// Whether the run stopped early on the failure budget
    pub game_over: bool,
}

/// Runs checks and reports progress to a writer
pub struct Executor<W = io::Stdout> {
    continues: usize,
    verbose: bool,
    policy: ReturncodePolicy,
    kwargs: Kwargs,
    output: W,
    draw_target: Option<ProgressDrawTarget>,
}

impl Executor<io::Stdout> {
    /// Create a builder writing to stdout
    #[must_use]
    pub fn builder() -> ExecutorBuilder<io::Stdout> {
        ExecutorBuilder {
            continues: 0,
            verbose: false,
            policy: ReturncodePolicy::default(),
            kwargs: Kwargs::new(),
            output: io::stdout(),
            draw_target: None,
        }
    }
}

/// Builder for [`Executor`]
pub struct ExecutorBuilder<W> {
    continues: usize,
    verbose: bool,
    policy: ReturncodePolicy,
    kwargs: Kwargs,
    output: W,
    draw_target: Option<ProgressDrawTarget>,
}

impl<W: Write> ExecutorBuilder<W> {
    /// Failures tolerated after the first before the run is aborted
    #[must_use]
    pub fn continues(mut self, continues: usize) -> Self {
        self.continues = continues;
        self
    }

    /// Re-list failing checks with their output in the summary
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// How outcomes are turned into return codes
    #[must_use]
    pub fn policy(mut self, policy: ReturncodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Keyword argument applied to every check of the run
    #[must_use]
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }

    /// Where the progress bar is drawn (stderr by default)
    #[must_use]
    pub fn draw_target(mut self, target: ProgressDrawTarget) -> Self {
        self.draw_target = Some(target);
        self
    }

    /// Where status lines and the summary are written
    pub fn output<W2: Write>(self, output: W2) -> ExecutorBuilder<W2> {
        ExecutorBuilder {
            continues: self.continues,
            verbose: self.verbose,
            policy: self.policy,
            kwargs: self.kwargs,
            output,
            draw_target: self.draw_target,
        }
    }

    /// Build the executor
    pub fn build(self) -> Executor<W> {
        Executor {
            continues: self.continues,
            verbose: self.verbose,
            policy: self.policy,
            kwargs: self.kwargs,
            output: self.output,
            draw_target: self.draw_target,
        }
    }
}

/// Running totals of one execution
struct Tally {
    outcomes: Vec<CheckOutcome>,
    failures: usize,
    returncode: i32,
}

impl Tally {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            failures: 0,
            returncode: 0,
        }
    }

    /// Record an outcome and return its code
    fn record(&mut self, outcome: CheckOutcome, code: i32) -> i32 {
        if code != 0 {
            self.failures += 1;
            self.returncode |= code;
        }
        self.outcomes.push(outcome);
        code
    }

    fn finish(self, mode: ExecutionMode, game_over: bool) -> ExecutionResult {
        ExecutionResult {
            outcomes: self.outcomes,
            failures: self.failures,
            returncode: self.returncode,
            mode,
            game_over,
        }
    }
}

impl<W: Write> Executor<W> {
    /// Run every check, or until the failure budget is exhausted
    ///
    /// Check failures are part of the result; errors are only returned when
    /// the output cannot be written.
    #[tracing::instrument(skip_all, fields(continues = self.continues))]
    pub fn run(&mut self, checks: Checks) -> Result<ExecutionResult> {
        let mode = checks.mode();
        tracing::debug!(?mode, "Running checks");

        match checks {
            Checks::Sized(checks) if mode == ExecutionMode::Simple => self.run_simple(checks),
            Checks::Sized(checks) => self.run_progress(checks),
            Checks::Lazy(checks) => self.run_streaming(checks),
        }
    }

    /// Run and classify a single check
    fn execute(&self, check: &Check) -> (CheckOutcome, i32) {
        let span = tracing::info_span!("check", name = %check.name());
        let _enter = span.enter();

        let outcome = check.call(&self.kwargs);
        let code = self.policy.is_returncode(&outcome);
        tracing::debug!(code, "Check finished");
        (outcome, code)
    }

    fn over_budget(&self, tally: &Tally) -> bool {
        tally.failures > self.continues
    }

    fn run_simple(&mut self, checks: Vec<Check>) -> Result<ExecutionResult> {
        let total = checks.len();
        let mut tally = Tally::new();

        for (i, check) in checks.iter().enumerate() {
            writeln!(self.output, "[{}/{total}] {} ...", i + 1, check.name())?;
            let (outcome, code) = self.execute(check);
            let status = status_word(&outcome, code);
            tally.record(outcome, code);
            writeln!(self.output, "[{}/{total}] {} {status}", i + 1, check.name())?;

            if self.over_budget(&tally) {
                return self.game_over(tally, ExecutionMode::Simple);
            }
        }

        self.summary(tally, ExecutionMode::Simple)
    }

    fn run_progress(&mut self, checks: Vec<Check>) -> Result<ExecutionResult> {
        let target = self
            .draw_target
            .take()
            .unwrap_or_else(ProgressDrawTarget::stderr);
        let len = u64::try_from(checks.len()).unwrap_or(u64::MAX);
        let pb = ProgressBar::with_draw_target(Some(len), target);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut tally = Tally::new();
        for check in &checks {
            pb.set_message(check.name().to_string());
            let (outcome, code) = self.execute(check);
            if code != 0 {
                let line = format!("{} {}", check.name(), status_word(&outcome, code));
                let output = &mut self.output;
                pb.suspend(|| writeln!(output, "{line}"))?;
            }
            tally.record(outcome, code);
            pb.inc(1);

            if self.over_budget(&tally) {
                pb.finish_and_clear();
                return self.game_over(tally, ExecutionMode::Progress);
            }
        }
        pb.finish_and_clear();

        self.summary(tally, ExecutionMode::Progress)
    }

    fn run_streaming(
        &mut self,
        checks: Box<dyn Iterator<Item = Check>>,
    ) -> Result<ExecutionResult> {
        let mut tally = Tally::new();

        for check in checks {
            let (outcome, code) = self.execute(&check);
            let marker = match (&outcome, code) {
                (_, code) if code != 0 => "X",
                (
                    CheckOutcome::Completed {
                        value: CheckValue::Other(_),
                        ..
                    },
                    _,
                ) => "?!",
                _ => ".",
            };
            write!(self.output, "{marker}")?;
            self.output.flush()?;
            tally.record(outcome, code);

            if self.over_budget(&tally) {
                writeln!(self.output)?;
                return self.game_over(tally, ExecutionMode::Streaming);
            }
        }
        writeln!(self.output)?;

        self.summary(tally, ExecutionMode::Streaming)
    }

    fn game_over(&mut self, tally: Tally, mode: ExecutionMode) -> Result<ExecutionResult> {
        tracing::info!(failures = tally.failures, "Failure budget exhausted");
        writeln!(
            self.output,
            "game over: {} failure(s), {} tolerated, return code {}",
            tally.failures, self.continues, tally.returncode
        )?;
        self.list_failures(&tally)?;
        Ok(tally.finish(mode, true))
    }

    fn summary(&mut self, tally: Tally, mode: ExecutionMode) -> Result<ExecutionResult> {
        writeln!(
            self.output,
            "{} check(s), {} failed, return code {}",
            tally.outcomes.len(),
            tally.failures,
            tally.returncode
        )?;
        self.list_failures(&tally)?;
        Ok(tally.finish(mode, false))
    }

    fn list_failures(&mut self, tally: &Tally) -> Result<()> {
        if !self.verbose {
            return Ok(());
        }

        for outcome in &tally.outcomes {
            let code = self.policy.is_returncode(outcome);
            if code == 0 {
                continue;
            }

            writeln!(self.output, "--- {} ({code})", outcome.check().name())?;
            match outcome {
                CheckOutcome::Completed {
                    value: CheckValue::Command(output),
                    ..
                } => {
                    for text in [&output.stdout, &output.stderr] {
                        let text = text.trim_end();
                        if !text.is_empty() {
                            writeln!(self.output, "{text}")?;
                        }
                    }
                }
                CheckOutcome::Completed { .. } => {}
                CheckOutcome::Errored { error, .. } => writeln!(self.output, "{}", error.message)?,
            }
        }
        Ok(())
    }
}

fn status_word(outcome: &CheckOutcome, code: i32) -> String {
    match outcome {
        _ if code == 0 => "ok".to_string(),
        CheckOutcome::Errored { error, .. } => format!("ERROR ({})", error.message),
        CheckOutcome::Completed { .. } => format!("FAILED ({code})"),
    }
}
