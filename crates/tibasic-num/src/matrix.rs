//! Matrix reduction kernels.
//!
//! Plain functions over row-major `Vec<Vec<f64>>` data:
//! - multiply, power, identity, augment
//! - ref / rref by Gauss elimination with partial pivoting
//! - inverse by augment-and-eliminate
//! - determinant by cofactor expansion
//!
//! Rectangularity is the caller's invariant; these kernels assume it.

use tibasic_core::{ErrorKind, Result};

/// Pivots below this magnitude are treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-14;

pub type Rows = Vec<Vec<f64>>;

/// The n×n identity.
pub fn identity(n: usize) -> Rows {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Standard matrix product; inner dimensions must agree.
pub fn multiply(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Rows> {
    let inner = a.first().map(|r| r.len()).unwrap_or(0);
    if inner != b.len() {
        return Err(ErrorKind::DimMismatch.into());
    }
    let cols = b.first().map(|r| r.len()).unwrap_or(0);
    let mut out = vec![vec![0.0; cols]; a.len()];
    for (i, row) in a.iter().enumerate() {
        for k in 0..inner {
            let aik = row[k];
            for j in 0..cols {
                out[i][j] += aik * b[k][j];
            }
        }
    }
    Ok(out)
}

/// Non-negative integer power of a square matrix; the zeroth power is
/// the identity of the same size.
pub fn power(m: &[Vec<f64>], exponent: i64) -> Result<Rows> {
    let n = m.len();
    if m.iter().any(|row| row.len() != n) {
        return Err(ErrorKind::DimMismatch.into());
    }
    if exponent < 0 {
        return Err(ErrorKind::Domain.into());
    }
    let mut out = identity(n);
    for _ in 0..exponent {
        out = multiply(&out, m)?;
    }
    Ok(out)
}

/// Column-concatenate two matrices with the same row count.
pub fn augment(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Rows> {
    if a.len() != b.len() {
        return Err(ErrorKind::DimMismatch.into());
    }
    Ok(a.iter()
        .zip(b)
        .map(|(ra, rb)| ra.iter().chain(rb).copied().collect())
        .collect())
}

/// Row-echelon form by Gauss elimination with partial pivoting.
/// Columns whose best pivot is below the threshold are skipped.
pub fn row_echelon(m: &[Vec<f64>]) -> Rows {
    let mut rows = m.to_vec();
    eliminate(&mut rows, false);
    rows
}

/// Reduced row-echelon form: echelon, then back-substitution and
/// pivot normalization.
pub fn reduced_row_echelon(m: &[Vec<f64>]) -> Rows {
    let mut rows = m.to_vec();
    eliminate(&mut rows, true);
    rows
}

/// Shared elimination driver. With `reduce` set, pivots are scaled to 1
/// and cleared above as well as below.
fn eliminate(rows: &mut Rows, reduce: bool) {
    let nrows = rows.len();
    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    let mut pivot_row = 0;

    for col in 0..ncols {
        if pivot_row >= nrows {
            break;
        }
        // Partial pivoting: bring the largest magnitude into position.
        let best = (pivot_row..nrows)
            .max_by(|&a, &b| {
                rows[a][col]
                    .abs()
                    .partial_cmp(&rows[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(pivot_row);
        if rows[best][col].abs() < PIVOT_EPSILON {
            continue;
        }
        rows.swap(pivot_row, best);

        let pivot = rows[pivot_row][col];
        if reduce {
            for v in rows[pivot_row].iter_mut() {
                *v /= pivot;
            }
        }
        for r in 0..nrows {
            let skip = if reduce { r == pivot_row } else { r <= pivot_row };
            if skip {
                continue;
            }
            let factor = rows[r][col] / rows[pivot_row][col];
            if factor == 0.0 {
                continue;
            }
            for c in 0..ncols {
                rows[r][c] -= factor * rows[pivot_row][c];
            }
        }
        pivot_row += 1;
    }
}

/// Invert a square matrix by augmenting with the identity and reducing.
pub fn inverse(m: &[Vec<f64>]) -> Result<Rows> {
    let n = m.len();
    if m.iter().any(|row| row.len() != n) {
        return Err(ErrorKind::DimMismatch.into());
    }
    let mut work = augment(m, &identity(n))?;

    for col in 0..n {
        let best = (col..n)
            .max_by(|&a, &b| {
                work[a][col]
                    .abs()
                    .partial_cmp(&work[b][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if work[best][col].abs() < PIVOT_EPSILON {
            return Err(ErrorKind::Singular.into());
        }
        work.swap(col, best);

        let pivot = work[col][col];
        for v in work[col].iter_mut() {
            *v /= pivot;
        }
        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = work[r][col];
            if factor == 0.0 {
                continue;
            }
            for c in 0..2 * n {
                work[r][c] -= factor * work[col][c];
            }
        }
    }

    Ok(work.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Determinant by cofactor expansion along the first row.
pub fn determinant(m: &[Vec<f64>]) -> Result<f64> {
    let n = m.len();
    if m.iter().any(|row| row.len() != n) {
        return Err(ErrorKind::DimMismatch.into());
    }
    Ok(cofactor_det(m))
}

fn cofactor_det(m: &[Vec<f64>]) -> f64 {
    match m.len() {
        0 => 1.0,
        1 => m[0][0],
        2 => m[0][0] * m[1][1] - m[0][1] * m[1][0],
        n => {
            let mut det = 0.0;
            for col in 0..n {
                let minor: Rows = m[1..]
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|(j, _)| *j != col)
                            .map(|(_, v)| *v)
                            .collect()
                    })
                    .collect();
                let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
                det += sign * m[0][col] * cofactor_det(&minor);
            }
            det
        }
    }
}
