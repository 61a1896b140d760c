//! Statistics kernels and the probability builtins.

use tibasic::num::stats;
use tibasic::{eval_entry, ErrorKind, State, Value};

use crate::{assert_eval_approx, assert_error_kind};

#[test]
fn one_var_summary() {
    let s = stats::one_var(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    assert_eq!(s.n, 5);
    assert_eq!(s.sum, 15.0);
    assert_eq!(s.mean, 3.0);
    assert_eq!(s.min, 1.0);
    assert_eq!(s.max, 5.0);
    assert_eq!(s.median, 3.0);
    assert!((s.sample_std - 2.5f64.sqrt()).abs() < 1e-12);
    assert!((s.pop_std - 2.0f64.sqrt()).abs() < 1e-12);
}

#[test]
fn two_var_cross_moment() {
    let s = stats::two_var(&[1.0, 2.0], &[3.0, 5.0]).unwrap();
    assert_eq!(s.sum_xy, 13.0);
    assert_eq!(s.x.mean, 1.5);
    assert_eq!(s.y.mean, 4.0);
}

#[test]
fn linear_regression_recovers_line() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 1.0).collect();
    let fit = stats::linear_regression(&x, &y).unwrap();
    assert!((fit.a - 2.5).abs() < 1e-10);
    assert!((fit.b + 1.0).abs() < 1e-10);
    assert!((fit.r_sq - 1.0).abs() < 1e-10);
}

#[test]
fn quadratic_regression_reports_r_squared_only() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0];
    let y: Vec<f64> = x.iter().map(|v| v * v - 2.0 * v + 3.0).collect();
    let fit = stats::quadratic_regression(&x, &y).unwrap();
    assert!((fit.a - 1.0).abs() < 1e-7);
    assert!((fit.b + 2.0).abs() < 1e-7);
    assert!((fit.c - 3.0).abs() < 1e-7);
    assert!((fit.r_sq - 1.0).abs() < 1e-7);
}

#[test]
fn transformed_regressions() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let exp_y: Vec<f64> = x.iter().map(|v| 4.0 * 1.5f64.powf(*v)).collect();
    let fit = stats::exponential_regression(&x, &exp_y).unwrap();
    assert!((fit.a - 4.0).abs() < 1e-9);
    assert!((fit.b - 1.5).abs() < 1e-9);

    let pow_y: Vec<f64> = x.iter().map(|v| 2.0 * v.powf(0.5)).collect();
    let fit = stats::power_regression(&x, &pow_y).unwrap();
    assert!((fit.a - 2.0).abs() < 1e-9);
    assert!((fit.b - 0.5).abs() < 1e-9);

    let log_y: Vec<f64> = x.iter().map(|v| 1.0 + 3.0 * v.ln()).collect();
    let fit = stats::logarithmic_regression(&x, &log_y).unwrap();
    assert!((fit.a - 1.0).abs() < 1e-9);
    assert!((fit.b - 3.0).abs() < 1e-9);
}

#[test]
fn regression_domain_errors() {
    assert_eq!(
        stats::exponential_regression(&[1.0, 2.0], &[1.0, -1.0])
            .unwrap_err()
            .kind,
        ErrorKind::Domain
    );
    assert_eq!(
        stats::power_regression(&[0.0, 2.0], &[1.0, 2.0])
            .unwrap_err()
            .kind,
        ErrorKind::Domain
    );
}

#[test]
fn rand_is_reproducible_after_reseed() {
    let mut state = State::new();
    eval_entry(&mut state, "3→rand").unwrap();
    let first = eval_entry(&mut state, "rand").unwrap();
    eval_entry(&mut state, "3→rand").unwrap();
    let second = eval_entry(&mut state, "rand").unwrap();
    assert_eq!(first, second);
    let v = first.as_real().unwrap();
    assert!((0.0..1.0).contains(&v));
}

#[test]
fn rand_int_stays_in_range() {
    let mut state = State::new();
    for _ in 0..50 {
        let v = eval_entry(&mut state, "randInt(2,5)")
            .unwrap()
            .as_real()
            .unwrap();
        assert!((2.0..=5.0).contains(&v));
        assert_eq!(v.fract(), 0.0);
    }
    let list = eval_entry(&mut state, "randInt(1,6,10)").unwrap();
    match list {
        Value::List(v) => assert_eq!(v.len(), 10),
        other => panic!("expected list, got {other:?}"),
    }
    assert_eq!(
        eval_entry(&mut state, "randInt(5,2)").unwrap_err().kind,
        ErrorKind::Domain
    );
}

#[test]
fn inv_norm_quantiles() {
    assert_eval_approx("invNorm(0.5)", 0.0, 1e-8);
    assert_eval_approx("invNorm(0.975)", 1.959_964, 1e-4);
    assert_eval_approx("invNorm(0.5,100,15)", 100.0, 1e-8);
    assert_error_kind("invNorm(0)", ErrorKind::Domain);
}

#[test]
fn rand_norm_produces_lists() {
    let mut state = State::new();
    eval_entry(&mut state, "1→rand").unwrap();
    let draws = eval_entry(&mut state, "randNorm(10,0,4)").unwrap();
    // Zero sigma pins every draw at the mean.
    assert_eq!(draws, Value::List(vec![10.0; 4]));
}
