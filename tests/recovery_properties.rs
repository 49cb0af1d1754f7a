//! Property tests for the recovery policy
//!
//! Actions are driven by generated values; the corrective step counts its
//! invocations through a shared cell.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use safeinteract::interactor::{Interactor, RecoveryInteractor};
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq)]
enum UiError {
    NotActionable(u32),
    Other(u32),
}

fn not_actionable(err: &UiError) -> bool {
    matches!(err, UiError::NotActionable(_))
}

/// Context that counts corrective runs and optionally fails them
struct Context {
    corrections: Cell<u32>,
    correction_fails: bool,
}

impl Context {
    fn new(correction_fails: bool) -> Self {
        Self {
            corrections: Cell::new(0),
            correction_fails,
        }
    }
}

fn correct(context: &Context) -> Result<(), UiError> {
    context.corrections.set(context.corrections.get() + 1);
    if context.correction_fails {
        Err(UiError::Other(u32::MAX))
    } else {
        Ok(())
    }
}

type Policy = RecoveryInteractor<fn(&UiError) -> bool, fn(&Context) -> Result<(), UiError>>;

fn policy() -> Policy {
    RecoveryInteractor::new(
        not_actionable as fn(&UiError) -> bool,
        correct as fn(&Context) -> Result<(), UiError>,
    )
}

#[quickcheck]
fn success_skips_corrective(value: i64) -> bool {
    let context = Context::new(false);
    let runs = Cell::new(0);
    let result = policy().interact(&context, || {
        runs.set(runs.get() + 1);
        Ok::<_, UiError>(value)
    });

    result == Ok(value) && runs.get() == 1 && context.corrections.get() == 0
}

#[quickcheck]
fn unrecoverable_propagates_immediately(code: u32) -> bool {
    let context = Context::new(false);
    let runs = Cell::new(0);
    let result: Result<(), UiError> = policy().interact(&context, || {
        runs.set(runs.get() + 1);
        Err(UiError::Other(code))
    });

    result == Err(UiError::Other(code)) && runs.get() == 1 && context.corrections.get() == 0
}

#[quickcheck]
fn recoverable_then_success_returns_second_result(code: u32, value: String) -> bool {
    let context = Context::new(false);
    let runs = Cell::new(0);
    let result = policy().interact(&context, || {
        runs.set(runs.get() + 1);
        if runs.get() == 1 {
            Err(UiError::NotActionable(code))
        } else {
            Ok(value.clone())
        }
    });

    result == Ok(value) && runs.get() == 2 && context.corrections.get() == 1
}

#[quickcheck]
fn failed_recovery_surfaces_original(
    code: u32,
    second: u32,
    recoverable_again: bool,
    correction_fails: bool,
) -> TestResult {
    if code == second {
        return TestResult::discard();
    }

    let context = Context::new(correction_fails);
    let runs = Cell::new(0);
    let result: Result<(), UiError> = policy().interact(&context, || {
        runs.set(runs.get() + 1);
        if runs.get() == 1 {
            Err(UiError::NotActionable(code))
        } else if recoverable_again {
            Err(UiError::NotActionable(second))
        } else {
            Err(UiError::Other(second))
        }
    });

    let expected_runs = if correction_fails { 1 } else { 2 };
    TestResult::from_bool(
        result == Err(UiError::NotActionable(code))
            && runs.get() == expected_runs
            && context.corrections.get() == 1,
    )
}

#[quickcheck]
fn policy_is_reusable_across_calls(values: Vec<u8>) -> bool {
    let interactor = policy();
    let context = Context::new(false);

    values.iter().all(|value| {
        let runs = Cell::new(0);
        let result = interactor.interact(&context, || {
            runs.set(runs.get() + 1);
            if runs.get() == 1 && value % 2 == 0 {
                Err(UiError::NotActionable(*value as u32))
            } else {
                Ok(*value)
            }
        });
        result == Ok(*value)
    }) && context.corrections.get() as usize == values.iter().filter(|v| *v % 2 == 0).count()
}
