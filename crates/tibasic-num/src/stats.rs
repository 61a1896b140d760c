//! Statistics kernels.
//!
//! - one- and two-variable summaries with interpolated quartiles
//! - regressions: linear, quadratic, exponential, power, logarithmic
//!
//! Regressions on transformed data (exp/power/log) fail with Domain
//! when a required logarithm sees a non-positive input; degenerate
//! samples fail with Stat.

use tibasic_core::{ErrorKind, Result};

use crate::matrix;

/// One-variable summary of a sample.
#[derive(Clone, Debug, PartialEq)]
pub struct OneVarStats {
    pub n: usize,
    pub sum: f64,
    pub sum_sq: f64,
    pub mean: f64,
    /// Sample standard deviation (n − 1 divisor); zero for n = 1.
    pub sample_std: f64,
    /// Population standard deviation (n divisor).
    pub pop_std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// Two-variable summary: both marginals plus the cross moment.
#[derive(Clone, Debug, PartialEq)]
pub struct TwoVarStats {
    pub x: OneVarStats,
    pub y: OneVarStats,
    pub sum_xy: f64,
}

/// Fitted line y = a·x + b with correlation.
#[derive(Clone, Debug, PartialEq)]
pub struct LinFit {
    pub a: f64,
    pub b: f64,
    pub r: f64,
    pub r_sq: f64,
}

/// Fitted parabola y = a·x² + b·x + c.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadFit {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r_sq: f64,
}

/// Linearly interpolated order statistic at fractional position `p`
/// over sorted data (p in units of array index).
fn interpolated(sorted: &[f64], p: f64) -> f64 {
    let lo = p.floor() as usize;
    let hi = p.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = p - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// One-variable statistics. Fails with Stat on an empty sample.
pub fn one_var(data: &[f64]) -> Result<OneVarStats> {
    if data.is_empty() {
        return Err(ErrorKind::Stat.into());
    }
    let n = data.len();
    let sum: f64 = data.iter().sum();
    let sum_sq: f64 = data.iter().map(|v| v * v).sum();
    let mean = sum / n as f64;
    let ss: f64 = data.iter().map(|v| (v - mean) * (v - mean)).sum();
    let pop_std = (ss / n as f64).sqrt();
    let sample_std = if n > 1 {
        (ss / (n as f64 - 1.0)).sqrt()
    } else {
        0.0
    };

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = (n - 1) as f64;

    Ok(OneVarStats {
        n,
        sum,
        sum_sq,
        mean,
        sample_std,
        pop_std,
        min: sorted[0],
        max: sorted[n - 1],
        q1: interpolated(&sorted, 0.25 * last),
        median: interpolated(&sorted, 0.5 * last),
        q3: interpolated(&sorted, 0.75 * last),
    })
}

/// Two-variable statistics over paired samples.
pub fn two_var(x: &[f64], y: &[f64]) -> Result<TwoVarStats> {
    if x.len() != y.len() {
        return Err(ErrorKind::DimMismatch.into());
    }
    Ok(TwoVarStats {
        x: one_var(x)?,
        y: one_var(y)?,
        sum_xy: x.iter().zip(y).map(|(a, b)| a * b).sum(),
    })
}

/// Least-squares line fit, y = a·x + b.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinFit> {
    if x.len() != y.len() {
        return Err(ErrorKind::DimMismatch.into());
    }
    let n = x.len() as f64;
    if x.len() < 2 {
        return Err(ErrorKind::Stat.into());
    }
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xx: f64 = x.iter().map(|v| v * v).sum();
    let sum_yy: f64 = y.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();

    let denom = n * sum_xx - sum_x * sum_x;
    if denom == 0.0 {
        return Err(ErrorKind::Stat.into());
    }
    let a = (n * sum_xy - sum_x * sum_y) / denom;
    let b = (sum_y - a * sum_x) / n;

    let denom_y = n * sum_yy - sum_y * sum_y;
    let r = if denom_y == 0.0 {
        // A horizontal fit has no defined correlation; report 1 when
        // the fit is exact.
        1.0
    } else {
        (n * sum_xy - sum_x * sum_y) / (denom * denom_y).sqrt()
    };
    Ok(LinFit {
        a,
        b,
        r,
        r_sq: r * r,
    })
}

/// Quadratic fit by the 3×3 normal equations.
pub fn quadratic_regression(x: &[f64], y: &[f64]) -> Result<QuadFit> {
    if x.len() != y.len() {
        return Err(ErrorKind::DimMismatch.into());
    }
    if x.len() < 3 {
        return Err(ErrorKind::Stat.into());
    }
    let n = x.len() as f64;
    let s1: f64 = x.iter().sum();
    let s2: f64 = x.iter().map(|v| v.powi(2)).sum();
    let s3: f64 = x.iter().map(|v| v.powi(3)).sum();
    let s4: f64 = x.iter().map(|v| v.powi(4)).sum();
    let sy: f64 = y.iter().sum();
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sxxy: f64 = x.iter().zip(y).map(|(a, b)| a * a * b).sum();

    // Augmented normal system, reduced in place.
    let system = vec![
        vec![s4, s3, s2, sxxy],
        vec![s3, s2, s1, sxy],
        vec![s2, s1, n, sy],
    ];
    let reduced = matrix::reduced_row_echelon(&system);
    let (a, b, c) = (reduced[0][3], reduced[1][3], reduced[2][3]);
    if !a.is_finite() || !b.is_finite() || !c.is_finite() {
        return Err(ErrorKind::Stat.into());
    }

    let mean_y = sy / n;
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xv, yv)| {
            let fit = a * xv * xv + b * xv + c;
            (yv - fit).powi(2)
        })
        .sum();
    let r_sq = if ss_tot == 0.0 { 1.0 } else { 1.0 - ss_res / ss_tot };

    Ok(QuadFit { a, b, c, r_sq })
}

/// Exponential fit y = a·bˣ, linearized through ln y.
pub fn exponential_regression(x: &[f64], y: &[f64]) -> Result<LinFit> {
    if y.iter().any(|v| *v <= 0.0) {
        return Err(ErrorKind::Domain.into());
    }
    let ln_y: Vec<f64> = y.iter().map(|v| v.ln()).collect();
    let line = linear_regression(x, &ln_y)?;
    Ok(LinFit {
        a: line.b.exp(),
        b: line.a.exp(),
        r: line.r,
        r_sq: line.r_sq,
    })
}

/// Power fit y = a·xᵇ, linearized through ln x and ln y.
pub fn power_regression(x: &[f64], y: &[f64]) -> Result<LinFit> {
    if x.iter().any(|v| *v <= 0.0) || y.iter().any(|v| *v <= 0.0) {
        return Err(ErrorKind::Domain.into());
    }
    let ln_x: Vec<f64> = x.iter().map(|v| v.ln()).collect();
    let ln_y: Vec<f64> = y.iter().map(|v| v.ln()).collect();
    let line = linear_regression(&ln_x, &ln_y)?;
    Ok(LinFit {
        a: line.b.exp(),
        b: line.a,
        r: line.r,
        r_sq: line.r_sq,
    })
}

/// Logarithmic fit y = a + b·ln x.
pub fn logarithmic_regression(x: &[f64], y: &[f64]) -> Result<LinFit> {
    if x.iter().any(|v| *v <= 0.0) {
        return Err(ErrorKind::Domain.into());
    }
    let ln_x: Vec<f64> = x.iter().map(|v| v.ln()).collect();
    let line = linear_regression(&ln_x, y)?;
    Ok(LinFit {
        a: line.b,
        b: line.a,
        r: line.r,
        r_sq: line.r_sq,
    })
}
