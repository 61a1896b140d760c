//! Root finding, extremum search, integration, and plot sampling
//! driven through function slots.

use tibasic::num::{plot, solve};
use tibasic::{eval_slot, ErrorKind, State};

#[test]
fn root_of_slot_function() {
    let mut state = State::new();
    state.set_slot(1, "X²-2");
    let root = solve::bisect(
        |x| eval_slot(&mut state, 1, x).ok(),
        0.0,
        2.0,
        solve::ROOT_TOLERANCE,
    )
    .unwrap();
    assert!((root - 2f64.sqrt()).abs() < 1e-10);
}

#[test]
fn no_sign_change_is_reported() {
    let mut state = State::new();
    state.set_slot(1, "X²+1");
    let err = solve::bisect(
        |x| eval_slot(&mut state, 1, x).ok(),
        -1.0,
        1.0,
        solve::ROOT_TOLERANCE,
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoSignChange);
}

#[test]
fn extremum_of_slot_function() {
    let mut state = State::new();
    state.set_slot(2, "(X-3)²+1");
    let x = solve::minimum(
        |x| eval_slot(&mut state, 2, x).ok(),
        0.0,
        10.0,
        solve::EXTREMUM_TOLERANCE,
    )
    .unwrap();
    assert!((x - 3.0).abs() < 1e-6);

    state.set_slot(3, "4-(X-1)²");
    let x = solve::maximum(
        |x| eval_slot(&mut state, 3, x).ok(),
        -5.0,
        5.0,
        solve::EXTREMUM_TOLERANCE,
    )
    .unwrap();
    assert!((x - 1.0).abs() < 1e-6);
}

#[test]
fn integral_of_slot_function() {
    let mut state = State::new();
    state.set_slot(1, "2X");
    let area = solve::integrate(
        |x| eval_slot(&mut state, 1, x).ok(),
        0.0,
        4.0,
        solve::SIMPSON_INTERVALS,
    )
    .unwrap();
    assert!((area - 16.0).abs() < 1e-9);
}

#[test]
fn plot_sampler_splits_at_poles() {
    let mut state = State::new();
    state.set_slot(1, "1/X");
    let window = *state.window();
    let segments = plot::sample_segments(
        |x| eval_slot(&mut state, 1, x).ok(),
        window.x_min,
        window.x_max,
        window.y_min,
        window.y_max,
        94,
        window.x_res,
    );
    // The pole at zero (or the jump across it) separates the branches.
    assert!(segments.len() >= 2, "got {} segments", segments.len());
    let points: usize = segments.iter().map(|s| s.len()).sum();
    assert!(points > 80);
}

#[test]
fn plot_sampler_continuous_function() {
    let mut state = State::new();
    state.set_slot(1, "X²");
    let segments = plot::sample_segments(
        |x| eval_slot(&mut state, 1, x).ok(),
        -5.0,
        5.0,
        0.0,
        25.0,
        96,
        1,
    );
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].len(), 97);
}
