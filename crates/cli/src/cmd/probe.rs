//! Probe command implementation
//!
//! Runs synthetic checks through the execution engine. Useful for seeing
//! the three output modes and the failure budget without any plugins.

use clap::Args;
use hooky_core::Error;
use hooky_engine::checks::{Check, CheckValue, Checks, Executor};

use crate::error::Result;

/// Run synthetic checks
#[derive(Debug, Args)]
pub struct ProbeCommand {
    /// Number of checks
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,

    /// Feed the checks as a stream of unknown length
    #[arg(long)]
    pub lazy: bool,

    /// 1-based positions of checks that exit with code 1
    #[arg(long, value_delimiter = ',')]
    pub fail: Vec<usize>,

    /// 1-based positions of checks that raise an error
    #[arg(long, value_delimiter = ',')]
    pub raise: Vec<usize>,

    /// Failures tolerated after the first
    #[arg(short, long, default_value_t = 0)]
    pub continues: usize,

    /// List failing checks after the run
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProbeCommand {
    /// Synthetic check number `i` (1-based)
    fn check(&self, i: usize) -> Check {
        let name = format!("probe-{i}");
        if self.raise.contains(&i) {
            Check::new(name, move |_, _| {
                Err(Error::Message(format!("probe {i} raised")))
            })
        } else if self.fail.contains(&i) {
            Check::new(name, |_, _| Ok(CheckValue::Code(1)))
        } else {
            Check::new(name, |_, _| Ok(CheckValue::Code(0)))
        }
    }

    /// Run the probe and return the aggregate code
    pub fn execute(&self) -> Result<i32> {
        let checks: Vec<Check> = (1..=self.count).map(|i| self.check(i)).collect();
        let checks = if self.lazy {
            Checks::lazy(checks.into_iter())
        } else {
            Checks::Sized(checks)
        };

        let result = Executor::builder()
            .continues(self.continues)
            .verbose(self.verbose)
            .build()
            .run(checks)?;
        Ok(result.returncode)
    }
}
