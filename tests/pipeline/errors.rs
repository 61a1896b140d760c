//! The error taxonomy: each kind reachable from the surface language.

use tibasic::{eval_entry, run_program, ErrorKind, State};

use crate::assert_error_kind;

#[test]
fn syntax() {
    assert_error_kind("2+", ErrorKind::Syntax);
    assert_error_kind("#", ErrorKind::Syntax);
    assert_error_kind("(1))", ErrorKind::Syntax);
    assert_error_kind("1→2", ErrorKind::Syntax);
}

#[test]
fn divide_by_zero() {
    assert_error_kind("1/0", ErrorKind::DivideByZero);
    assert_error_kind("{1,2}/0", ErrorKind::DivideByZero);
    assert_error_kind("0⁻¹", ErrorKind::DivideByZero);
}

#[test]
fn overflow() {
    assert_error_kind("10^400", ErrorKind::Overflow);
    assert_error_kind("70!", ErrorKind::Overflow);
}

#[test]
fn domain() {
    assert_error_kind("sin⁻¹(2)", ErrorKind::Domain);
    assert_error_kind("ln(0)", ErrorKind::Domain);
    assert_error_kind("3 nCr 5", ErrorKind::Domain);
    assert_error_kind("(⁻8)^0.5", ErrorKind::Domain);
    assert_error_kind("2.5!", ErrorKind::Domain);
}

#[test]
fn data_type() {
    assert_error_kind("[[1]]+\"A\"", ErrorKind::DataType);
    assert_error_kind("not({1,2})", ErrorKind::DataType);
    assert_error_kind("-\"A\"", ErrorKind::DataType);
}

#[test]
fn argument() {
    assert_error_kind("cos(1,2)", ErrorKind::Argument);
    assert_error_kind("gcd(4)", ErrorKind::Argument);
}

#[test]
fn dim_mismatch() {
    assert_error_kind("{1,2,3}+{1,2}", ErrorKind::DimMismatch);
    assert_error_kind("[[1,2]]+[[1][2]]", ErrorKind::DimMismatch);
}

#[test]
fn singular() {
    assert_error_kind("[[1,2][2,4]]⁻¹", ErrorKind::Singular);
}

#[test]
fn undefined() {
    assert_error_kind("L4", ErrorKind::Undefined);
    assert_error_kind("[J]", ErrorKind::Undefined);
    assert_error_kind("Str5", ErrorKind::Undefined);
    assert_error_kind("Y1(0)", ErrorKind::Undefined);
}

#[test]
fn invalid_dim() {
    let mut state = State::new();
    eval_entry(&mut state, "{1,2}→L1").unwrap();
    assert_eq!(
        eval_entry(&mut state, "L1(3)").unwrap_err().kind,
        ErrorKind::InvalidDim
    );
    assert_error_kind("sub(\"AB\",1,5)", ErrorKind::InvalidDim);
}

#[test]
fn stat() {
    assert_error_kind("mean({})", ErrorKind::Stat);
    assert_error_kind("median({})", ErrorKind::Stat);
}

#[test]
fn non_real() {
    assert_error_kind("√(⁻9)", ErrorKind::NonReal);
}

#[test]
fn label_not_found_carries_name() {
    let mut state = State::new();
    let err = run_program(&mut state, "Goto AB").unwrap_err();
    assert_eq!(err.kind, ErrorKind::LabelNotFound("AB".into()));
    assert_eq!(err.to_string(), "ERR:LABEL AB");
}

#[test]
fn errors_do_not_roll_back_prior_writes() {
    let mut state = State::new();
    let err = run_program(&mut state, "1→A:2→B:1/0").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DivideByZero);
    assert_eq!(state.var('A').as_real(), Some(1.0));
    assert_eq!(state.var('B').as_real(), Some(2.0));
}

#[test]
fn display_strings() {
    assert_eq!(ErrorKind::Syntax.to_string(), "ERR:SYNTAX");
    assert_eq!(ErrorKind::DimMismatch.to_string(), "ERR:DIM MISMATCH");
    assert_eq!(ErrorKind::Break.to_string(), "ERR:BREAK");
}
