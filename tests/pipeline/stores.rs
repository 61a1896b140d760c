//! The store protocol: property 5 (store then read back) across every
//! target form.

use tibasic::{eval_entry, ErrorKind, State, Value};

#[test]
fn store_returns_the_stored_value() {
    let mut state = State::new();
    assert_eq!(
        eval_entry(&mut state, "42→A").unwrap(),
        Value::Real(42.0)
    );
    assert_eq!(eval_entry(&mut state, "A+8").unwrap(), Value::Real(50.0));
    assert_eq!(state.var('A'), Value::Real(42.0));
}

#[test]
fn read_back_equals_stored_for_each_target() {
    let mut state = State::new();

    eval_entry(&mut state, "3.5→B").unwrap();
    assert_eq!(eval_entry(&mut state, "B").unwrap(), Value::Real(3.5));

    eval_entry(&mut state, "{1,2,3}→L2").unwrap();
    assert_eq!(
        eval_entry(&mut state, "L2").unwrap(),
        Value::List(vec![1.0, 2.0, 3.0])
    );

    eval_entry(&mut state, "[[1,2][3,4]]→[C]").unwrap();
    assert_eq!(
        eval_entry(&mut state, "[C]").unwrap(),
        Value::Matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
    );

    eval_entry(&mut state, "\"TEXT\"→Str0").unwrap();
    assert_eq!(
        eval_entry(&mut state, "Str0").unwrap(),
        Value::Str("TEXT".into())
    );

    eval_entry(&mut state, "9→θ").unwrap();
    assert_eq!(eval_entry(&mut state, "θ").unwrap(), Value::Real(9.0));
}

#[test]
fn scalar_store_to_list_makes_singleton() {
    let mut state = State::new();
    eval_entry(&mut state, "7→L1").unwrap();
    assert_eq!(
        eval_entry(&mut state, "L1").unwrap(),
        Value::List(vec![7.0])
    );
}

#[test]
fn computed_store_uses_current_value() {
    let mut state = State::new();
    eval_entry(&mut state, "10→A").unwrap();
    eval_entry(&mut state, "A+5→A").unwrap();
    assert_eq!(state.var('A'), Value::Real(15.0));
}

#[test]
fn element_store_zero_pads_lists() {
    let mut state = State::new();
    eval_entry(&mut state, "{1}→L1").unwrap();
    eval_entry(&mut state, "8→L1(3)").unwrap();
    assert_eq!(
        eval_entry(&mut state, "L1").unwrap(),
        Value::List(vec![1.0, 0.0, 8.0])
    );
}

#[test]
fn matrix_element_store_requires_range() {
    let mut state = State::new();
    eval_entry(&mut state, "[[0,0][0,0]]→[A]").unwrap();
    eval_entry(&mut state, "5→[A](2,2)").unwrap();
    assert_eq!(state.matrix('A').unwrap()[1][1], 5.0);
    assert_eq!(
        eval_entry(&mut state, "5→[A](5,1)").unwrap_err().kind,
        ErrorKind::InvalidDim
    );
}

#[test]
fn type_mismatch_on_store() {
    let mut state = State::new();
    assert_eq!(
        eval_entry(&mut state, "\"S\"→A2").unwrap_err().kind,
        // `A2` is the variable A implicitly multiplied by 2, so the
        // store target is not a valid form.
        ErrorKind::Syntax
    );
    assert_eq!(
        eval_entry(&mut state, "\"S\"→A").unwrap_err().kind,
        ErrorKind::DataType
    );
    assert_eq!(
        eval_entry(&mut state, "5→[A]").unwrap_err().kind,
        ErrorKind::DataType
    );
    assert_eq!(
        eval_entry(&mut state, "{1,2}→Str1").unwrap_err().kind,
        ErrorKind::DataType
    );
}

#[test]
fn store_chain_is_right_associative() {
    let mut state = State::new();
    // 1→A stores, then Ans→B style chains are the usual idiom; a
    // nested store target is rejected.
    assert_eq!(
        eval_entry(&mut state, "1→A→B").unwrap_err().kind,
        ErrorKind::Syntax
    );
}

#[test]
fn failed_store_leaves_ans_alone() {
    let mut state = State::new();
    eval_entry(&mut state, "5").unwrap();
    let _ = eval_entry(&mut state, "\"X\"→A");
    assert_eq!(state.ans(), &Value::Real(5.0));
}
