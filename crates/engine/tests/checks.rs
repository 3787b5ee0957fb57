//! Integration tests for the check execution engine
//!
//! Modes are told apart by what they print, with the progress bar hidden.

#![allow(clippy::unwrap_used, clippy::panic)]

use hooky_engine::checks::{
    Check, CheckOutcome, CheckValue, Checks, ExecutionMode, ExecutionResult, Executor,
};
use hooky_engine::{Error, Result};
use indicatif::ProgressDrawTarget;

fn passing(i: usize) -> Check {
    Check::new(format!("check-{i}"), |_, _| Ok(CheckValue::Code(0)))
}

fn raising(i: usize) -> Check {
    Check::new(format!("check-{i}"), |_, _| -> Result<CheckValue> {
        Err(Error::Message("raised".to_string()))
    })
}

fn execute(checks: Checks, continues: usize) -> (ExecutionResult, String) {
    let mut out = Vec::new();
    let result = Executor::builder()
        .continues(continues)
        .draw_target(ProgressDrawTarget::hidden())
        .output(&mut out)
        .build()
        .run(checks)
        .unwrap();
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_all_passing_checks() {
    let checks: Vec<_> = (1..=6).map(passing).collect();
    let (result, _) = execute(checks.into(), 0);

    assert_eq!(result.returncode, 0);
    assert_eq!(result.failures, 0);
    assert_eq!(result.outcomes.len(), 6);
    for outcome in &result.outcomes {
        assert!(matches!(
            outcome,
            CheckOutcome::Completed {
                value: CheckValue::Code(0),
                ..
            }
        ));
    }
}

#[test]
fn test_budget_stops_after_second_failure() {
    let checks: Vec<_> = (1..=6)
        .map(|i| if i == 2 || i == 4 { raising(i) } else { passing(i) })
        .collect();
    let (result, out) = execute(checks.into(), 1);

    assert!(result.game_over);
    assert_ne!(result.returncode, 0);
    assert_eq!(result.outcomes.len(), 4);
    assert!(matches!(result.outcomes[1], CheckOutcome::Errored { .. }));
    assert!(matches!(result.outcomes[3], CheckOutcome::Errored { .. }));
    assert!(matches!(result.outcomes[0], CheckOutcome::Completed { .. }));
    assert!(matches!(result.outcomes[2], CheckOutcome::Completed { .. }));
    assert!(out.contains("game over: 2 failure(s)"));
}

#[test]
fn test_lazy_checks_stream_markers() {
    let (result, out) = execute(Checks::lazy((1..=9).map(passing)), 0);

    assert_eq!(result.returncode, 0);
    assert_eq!(result.mode, ExecutionMode::Streaming);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], ".........");
    assert_eq!(lines[1], "9 check(s), 0 failed, return code 0");
}

#[test]
fn test_output_shape_per_mode() {
    let (_, simple) = execute((1..=3).map(passing).collect::<Vec<_>>().into(), 0);
    let (_, progress) = execute((1..=5).map(passing).collect::<Vec<_>>().into(), 0);
    let (_, streaming) = execute(Checks::lazy((1..=5).map(passing)), 0);

    // One start and one end line per check, then the summary
    assert_eq!(simple.lines().count(), 3 * 2 + 1);
    assert!(simple.starts_with("[1/3] check-1 ...\n"));

    // Successes are silent under the bar
    assert_eq!(progress, "5 check(s), 0 failed, return code 0\n");

    assert!(streaming.starts_with(".....\n"));
}

#[test]
fn test_lazy_checks_are_consumed_once() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let checks = (1..=4).map(move |i| {
        counter.fetch_add(1, Ordering::SeqCst);
        if i == 2 { raising(i) } else { passing(i) }
    });

    let (result, out) = execute(Checks::lazy(checks), 0);

    // The stream stops being pulled at the first failure
    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert_eq!(result.outcomes.len(), 2);
    assert!(out.starts_with(".X\n"));
}
