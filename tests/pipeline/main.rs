//! End-to-end tests over the full tokenize → parse → evaluate path,
//! plus program execution. Organized into modules by functional area.

use tibasic::{eval_entry, CalcError, ErrorKind, State, Value};

mod arithmetic;
mod errors;
mod functions;
mod lists;
mod programs;
mod solvers;
mod statistics;
mod stores;

/// Evaluate one entry against a fresh state.
pub fn eval_fresh(src: &str) -> Result<Value, CalcError> {
    eval_entry(&mut State::new(), src)
}

/// Evaluate against a fresh state, panicking on error.
pub fn eval_to_value(src: &str) -> Value {
    eval_fresh(src).unwrap_or_else(|e| panic!("eval failed for '{src}': {e:?}"))
}

/// Evaluate and extract a real, panicking when the result is not one.
pub fn eval_to_real(src: &str) -> f64 {
    eval_to_value(src)
        .as_real()
        .unwrap_or_else(|| panic!("non-real result for '{src}'"))
}

/// Check a real-valued result with an explicit epsilon.
pub fn assert_eval_approx(src: &str, expected: f64, epsilon: f64) {
    let actual = eval_to_real(src);
    assert!(
        (actual - expected).abs() < epsilon,
        "'{src}': expected {expected}, got {actual}"
    );
}

/// Check that evaluation fails with the given kind.
pub fn assert_error_kind(src: &str, kind: ErrorKind) {
    match eval_fresh(src) {
        Ok(value) => panic!("expected {kind:?} for '{src}', got {value:?}"),
        Err(err) => assert_eq!(err.kind, kind, "wrong error kind for '{src}'"),
    }
}

/// Extract list contents, panicking on any other variant.
pub fn to_list(value: &Value) -> Vec<f64> {
    match value {
        Value::List(v) => v.clone(),
        other => panic!("expected list, got {other:?}"),
    }
}
