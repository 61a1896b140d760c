//! Root, extremum, derivative, and integral kernels.
//!
//! All of these take the target function as a closure returning
//! `Option<f64>`; a `None` anywhere aborts with Domain. The root and
//! extremum finders return their best estimate when the iteration
//! budget runs out rather than signalling a separate error.

use tibasic_core::{ErrorKind, Result};

/// Default interval tolerance for the bisection root finder.
pub const ROOT_TOLERANCE: f64 = 1e-12;
/// Default interval tolerance for the golden-section search.
pub const EXTREMUM_TOLERANCE: f64 = 1e-10;
/// Iteration cap shared by both finders.
const MAX_ITERATIONS: u32 = 100;
/// Default subdivision count for the Simpson integrator.
pub const SIMPSON_INTERVALS: u32 = 1000;
/// Step for the symmetric-difference derivative.
pub const DERIV_STEP: f64 = 1e-5;

/// Golden ratio conjugate used by the section search.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

fn probe(f: &mut impl FnMut(f64) -> Option<f64>, x: f64) -> Result<f64> {
    f(x).ok_or_else(|| ErrorKind::Domain.into())
}

/// Bisection on [a, b]. Requires a sign change across the interval.
pub fn bisect(
    mut f: impl FnMut(f64) -> Option<f64>,
    a: f64,
    b: f64,
    tolerance: f64,
) -> Result<f64> {
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let mut f_lo = probe(&mut f, lo)?;
    let f_hi = probe(&mut f, hi)?;
    if f_lo * f_hi > 0.0 {
        return Err(ErrorKind::NoSignChange.into());
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let f_mid = probe(&mut f, mid)?;
        if f_mid.abs() < tolerance || 0.5 * (hi - lo) < tolerance {
            return Ok(mid);
        }
        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }
    // Iteration cap: the midpoint of the final interval is the answer.
    Ok(0.5 * (lo + hi))
}

/// Golden-section minimum of f on [a, b].
pub fn minimum(
    mut f: impl FnMut(f64) -> Option<f64>,
    a: f64,
    b: f64,
    tolerance: f64,
) -> Result<f64> {
    golden_section(&mut f, a, b, tolerance, false)
}

/// Golden-section maximum of f on [a, b]: minimization with the
/// probe comparison inverted.
pub fn maximum(
    mut f: impl FnMut(f64) -> Option<f64>,
    a: f64,
    b: f64,
    tolerance: f64,
) -> Result<f64> {
    golden_section(&mut f, a, b, tolerance, true)
}

fn golden_section(
    f: &mut impl FnMut(f64) -> Option<f64>,
    a: f64,
    b: f64,
    tolerance: f64,
    invert: bool,
) -> Result<f64> {
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let mut eval = |x: f64| -> Result<f64> {
        let y = probe(f, x)?;
        Ok(if invert { -y } else { y })
    };

    let mut x1 = hi - INV_PHI * (hi - lo);
    let mut x2 = lo + INV_PHI * (hi - lo);
    let mut f1 = eval(x1)?;
    let mut f2 = eval(x2)?;

    for _ in 0..MAX_ITERATIONS {
        if (hi - lo).abs() < tolerance {
            break;
        }
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - INV_PHI * (hi - lo);
            f1 = eval(x1)?;
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + INV_PHI * (hi - lo);
            f2 = eval(x2)?;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Composite Simpson's rule with an even subdivision count.
pub fn integrate(
    mut f: impl FnMut(f64) -> Option<f64>,
    a: f64,
    b: f64,
    intervals: u32,
) -> Result<f64> {
    let n = if intervals % 2 == 0 {
        intervals.max(2)
    } else {
        intervals + 1
    };
    let h = (b - a) / n as f64;
    let mut acc = probe(&mut f, a)? + probe(&mut f, b)?;
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        acc += weight * probe(&mut f, a + i as f64 * h)?;
    }
    Ok(acc * h / 3.0)
}

/// Symmetric-difference derivative at x.
pub fn derivative(
    mut f: impl FnMut(f64) -> Option<f64>,
    x: f64,
    step: f64,
) -> Result<f64> {
    let ahead = probe(&mut f, x + step)?;
    let behind = probe(&mut f, x - step)?;
    Ok((ahead - behind) / (2.0 * step))
}
