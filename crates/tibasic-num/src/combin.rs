//! Combinatorics kernels: factorial, permutations, combinations.

use tibasic_core::{ErrorKind, Result};

/// Largest factorial argument whose result fits a double.
pub const FACTORIAL_MAX: i64 = 69;

/// n! for 0 ≤ n ≤ 69, computed iteratively.
pub fn factorial(n: i64) -> Result<f64> {
    if n < 0 {
        return Err(ErrorKind::Domain.into());
    }
    if n > FACTORIAL_MAX {
        return Err(ErrorKind::Overflow.into());
    }
    let mut acc = 1.0;
    for k in 2..=n {
        acc *= k as f64;
    }
    Ok(acc)
}

/// nPr = n!/(n−r)! via the falling factorial.
pub fn permutations(n: i64, r: i64) -> Result<f64> {
    if r < 0 || n < 0 || r > n {
        return Err(ErrorKind::Domain.into());
    }
    let mut acc = 1.0;
    for k in (n - r + 1)..=n {
        acc *= k as f64;
    }
    Ok(acc)
}

/// nCr with the symmetric reduction (r ↦ n−r when that is smaller).
pub fn combinations(n: i64, r: i64) -> Result<f64> {
    if r < 0 || n < 0 || r > n {
        return Err(ErrorKind::Domain.into());
    }
    let r = r.min(n - r);
    let mut acc = 1.0;
    for k in 1..=r {
        acc = acc * ((n - r + k) as f64) / (k as f64);
    }
    Ok(acc)
}
