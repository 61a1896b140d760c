//! Built-in functions: trig with angle modes, logs, roots, rounding,
//! and function slots.

use tibasic::{eval_entry, eval_slot, AngleMode, ErrorKind, State, Value};

use crate::{assert_eval_approx, assert_error_kind, eval_to_real};

#[test]
fn trig_in_radian_mode() {
    assert_eval_approx("sin(0)", 0.0, 1e-15);
    assert_eval_approx("cos(0)", 1.0, 1e-15);
    assert_eval_approx("sin(π/2)", 1.0, 1e-12);
    assert_eval_approx("tan(π/4)", 1.0, 1e-12);
}

#[test]
fn trig_in_degree_mode() {
    let mut state = State::new();
    state.modes_mut().angle = AngleMode::Degree;
    assert_eq!(eval_entry(&mut state, "sin(0)").unwrap(), Value::Real(0.0));
    let v = eval_entry(&mut state, "cos(60)").unwrap().as_real().unwrap();
    assert!((v - 0.5).abs() < 1e-12);
    let inv = eval_entry(&mut state, "sin⁻¹(1)").unwrap().as_real().unwrap();
    assert!((inv - 90.0).abs() < 1e-12);
    // tan at a pole.
    assert_eq!(
        eval_entry(&mut state, "tan(90)").unwrap_err().kind,
        ErrorKind::Domain
    );
}

#[test]
fn inverse_trig_domain() {
    assert_error_kind("sin⁻¹(1.5)", ErrorKind::Domain);
    assert_error_kind("cos⁻¹(⁻2)", ErrorKind::Domain);
}

#[test]
fn logs() {
    assert_eval_approx("log(1000)", 3.0, 1e-12);
    assert_eval_approx("ln(ℯ²)", 2.0, 1e-12);
    assert_eval_approx("log(32,2)", 5.0, 1e-12);
    assert_error_kind("log(0)", ErrorKind::Domain);
    assert_error_kind("ln(⁻1)", ErrorKind::Domain);
    assert_error_kind("log(5,1)", ErrorKind::Domain);
    assert_error_kind("log(5,⁻2)", ErrorKind::Domain);
}

#[test]
fn roots() {
    assert_eq!(eval_to_real("√(49)"), 7.0);
    assert_eval_approx("³√(⁻27)", -3.0, 1e-12);
    assert_error_kind("√(⁻1)", ErrorKind::NonReal);
}

#[test]
fn hyperbolics() {
    assert_eval_approx("sinh(0)", 0.0, 1e-15);
    assert_eval_approx("cosh(0)", 1.0, 1e-15);
    assert_eval_approx("tanh⁻¹(0.5)", 0.5f64.atanh(), 1e-12);
    assert_error_kind("cosh⁻¹(0.5)", ErrorKind::Domain);
    assert_error_kind("tanh⁻¹(1)", ErrorKind::Domain);
}

#[test]
fn integer_and_fraction_parts() {
    assert_eq!(eval_to_real("int(2.7)"), 2.0);
    assert_eq!(eval_to_real("int(⁻2.7)"), -3.0);
    assert_eq!(eval_to_real("iPart(⁻2.7)"), -2.0);
    assert_eval_approx("fPart(⁻2.7)", -0.7, 1e-12);
    assert_eq!(eval_to_real("round(2.6789,2)"), 2.68);
    assert_eq!(eval_to_real("abs(⁻4.5)"), 4.5);
}

#[test]
fn min_max_two_argument_forms() {
    assert_eq!(eval_to_real("min(3,7)"), 3.0);
    assert_eq!(eval_to_real("max(⁻1,⁻5)"), -1.0);
}

#[test]
fn wrong_argument_count() {
    assert_error_kind("sin(1,2)", ErrorKind::Argument);
    assert_error_kind("min()", ErrorKind::Argument);
}

#[test]
fn slot_evaluation() {
    let mut state = State::new();
    state.set_slot(1, "X²+2X+1");
    assert_eq!(eval_slot(&mut state, 1, 3.0).unwrap(), 16.0);
    assert_eq!(
        eval_entry(&mut state, "Y1(4)").unwrap(),
        Value::Real(25.0)
    );
    // Slot 2 is empty.
    assert_eq!(
        eval_slot(&mut state, 2, 0.0).unwrap_err().kind,
        ErrorKind::Undefined
    );
}

#[test]
fn slot_evaluation_restores_x_binding() {
    let mut state = State::new();
    eval_entry(&mut state, "7→X").unwrap();
    state.set_slot(1, "X+1");
    eval_slot(&mut state, 1, 100.0).unwrap();
    assert_eq!(state.var('X'), Value::Real(7.0));
}

#[test]
fn slots_can_reference_other_slots() {
    let mut state = State::new();
    state.set_slot(1, "X+1");
    state.set_slot(2, "2Y1(X)");
    assert_eq!(eval_slot(&mut state, 2, 3.0).unwrap(), 8.0);
}

#[test]
fn nderiv_and_fnint() {
    assert_eval_approx("nDeriv(X³,X,2)", 12.0, 1e-4);
    assert_eval_approx("fnInt(X²,X,0,3)", 9.0, 1e-6);
    assert_eval_approx("fnInt(sin(X),X,0,π)", 2.0, 1e-6);
}

#[test]
fn ans_feeds_the_next_entry() {
    let mut state = State::new();
    eval_entry(&mut state, "6*7").unwrap();
    assert_eq!(eval_entry(&mut state, "Ans/2").unwrap(), Value::Real(21.0));
    assert_eq!(
        eval_entry(&mut state, "Ans+0.5").unwrap(),
        Value::Real(21.5)
    );
}

#[test]
fn history_records_entries() {
    let mut state = State::new();
    eval_entry(&mut state, "1+1").unwrap();
    eval_entry(&mut state, "2+2").unwrap();
    assert_eq!(state.history().len(), 2);
    assert_eq!(state.history()[1].input, "2+2");
    assert_eq!(state.history()[1].result, Value::Real(4.0));
}
