//! Scalar arithmetic, precedence, and the operator lattice.

use crate::{assert_eval_approx, eval_to_real};

#[test]
fn precedence_chain() {
    assert_eq!(eval_to_real("2+3*4"), 14.0);
    assert_eq!(eval_to_real("(2+3)*4"), 20.0);
    assert_eq!(eval_to_real("10-4-3"), 3.0);
    assert_eq!(eval_to_real("100/10/2"), 5.0);
}

#[test]
fn negation_binds_below_exponent() {
    assert_eq!(eval_to_real("-3^2"), -9.0);
    assert_eq!(eval_to_real("(-3)^2"), 9.0);
    assert_eq!(eval_to_real("⁻3^2"), -9.0);
}

#[test]
fn exponent_right_associates() {
    assert_eval_approx("2^3^4", 2f64.powf(81.0), 1e10);
    assert_eq!(eval_to_real("2^3^2"), 512.0);
}

#[test]
fn implicit_multiplication() {
    assert_eq!(eval_to_real("6/2(1+2)"), 9.0);
    assert_eq!(eval_to_real("2(3)"), 6.0);
    assert_eq!(eval_to_real("3(2)(5)"), 30.0);
    assert_eval_approx("2π", 2.0 * std::f64::consts::PI, 1e-12);
}

#[test]
fn zero_identities_never_error() {
    // op with zero on either side stays defined for + - *.
    for x in ["0", "1", "-2.5", "123456.789", "9E99"] {
        for op in ['+', '-', '*'] {
            eval_to_real(&format!("{x}{op}0"));
            eval_to_real(&format!("0{op}{x}"));
        }
    }
}

#[test]
fn factorial() {
    assert_eq!(eval_to_real("5!"), 120.0);
    assert_eq!(eval_to_real("0!"), 1.0);
    assert_eq!(eval_to_real("3!+1"), 7.0);
}

#[test]
fn power_conventions() {
    assert_eq!(eval_to_real("0^0"), 1.0);
    assert_eq!(eval_to_real("2^⁻1"), 0.5);
}

#[test]
fn comparison_results_are_boolean_reals() {
    assert_eq!(eval_to_real("2<3"), 1.0);
    assert_eq!(eval_to_real("3<2"), 0.0);
    assert_eq!(eval_to_real("2=2"), 1.0);
    assert_eq!(eval_to_real("2≠2"), 0.0);
    assert_eq!(eval_to_real("3≤3"), 1.0);
    assert_eq!(eval_to_real("3≥4"), 0.0);
}

#[test]
fn logicals_treat_nonzero_as_true() {
    assert_eq!(eval_to_real("2 and 3"), 1.0);
    assert_eq!(eval_to_real("2 and 0"), 0.0);
    assert_eq!(eval_to_real("0 or 5"), 1.0);
    assert_eq!(eval_to_real("1 xor 0"), 1.0);
    assert_eq!(eval_to_real("not(7)"), 0.0);
}

#[test]
fn combinatorial_operators() {
    assert_eq!(eval_to_real("5 nCr 2"), 10.0);
    assert_eq!(eval_to_real("5 nPr 2"), 20.0);
    assert_eq!(eval_to_real("52 nCr 5"), 2_598_960.0);
}

#[test]
fn postfix_glyphs() {
    assert_eq!(eval_to_real("7²"), 49.0);
    assert_eq!(eval_to_real("2³"), 8.0);
    assert_eq!(eval_to_real("8⁻¹"), 0.125);
    assert_eval_approx("90°", std::f64::consts::FRAC_PI_2, 1e-12);
}

#[test]
fn scientific_notation() {
    assert_eq!(eval_to_real("1.5E2"), 150.0);
    assert_eq!(eval_to_real("2ᴇ3"), 2000.0);
    assert_eq!(eval_to_real("1ᴇ⁻2"), 0.01);
}
