//! Check execution
//!
//! A [`Check`] wraps a callable; the [`Executor`] runs a collection of them,
//! turns each result into a return code and stops once too many have failed.

pub mod check;
pub mod executor;

pub use check::{Check, CheckOutcome, CheckValue, ERRORED, ErrorInfo, Kwargs, ReturncodePolicy};
pub use executor::{
    Checks, ExecutionMode, ExecutionResult, Executor, ExecutorBuilder, PROGRESS_THRESHOLD,
};
