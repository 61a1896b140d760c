//! The universal calculator value.
//!
//! Every expression evaluates to one of these variants:
//! - Real - a double-precision number
//! - Complex - a (re, im) pair of doubles
//! - List / ComplexList - ordered 1-indexed sequences
//! - Matrix - rectangular, row-major, 1-indexed
//! - Str - text
//!
//! Coercions between variants are exposed through the `as_*` accessors;
//! anything stricter is the evaluator's business.

use serde::{Deserialize, Serialize};

/// Imaginary parts below this magnitude demote a Complex to a Real.
const IMAG_EPSILON: f64 = 1e-12;

/// Largest magnitude that `as_int` accepts; beyond this a double no
/// longer represents every integer exactly.
const INT_LIMIT: f64 = 1e15;

/// A runtime value.
///
/// Equality is structural. At the Real level two NaNs compare equal, so
/// tests can assert on NaN-carrying results deterministically.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    /// Real number (finite or not; non-finite propagates until an
    /// operation demands an integer).
    Real(f64),
    /// Complex number as (re, im).
    Complex(f64, f64),
    /// List of reals. May be empty.
    List(Vec<f64>),
    /// List of complex values as (re, im) pairs.
    ComplexList(Vec<(f64, f64)>),
    /// Rectangular matrix, row-major. At least one row and one column.
    Matrix(Vec<Vec<f64>>),
    /// Text value.
    Str(String),
}

/// NaN-tolerant equality on doubles: NaN equals NaN.
fn real_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Real(a), Value::Real(b)) => real_eq(*a, *b),
            (Value::Complex(ar, ai), Value::Complex(br, bi)) => {
                real_eq(*ar, *br) && real_eq(*ai, *bi)
            }
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| real_eq(*x, *y))
            }
            (Value::ComplexList(a), Value::ComplexList(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((xr, xi), (yr, yi))| real_eq(*xr, *yr) && real_eq(*xi, *yi))
            }
            (Value::Matrix(a), Value::Matrix(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(ra, rb)| {
                        ra.len() == rb.len() && ra.iter().zip(rb).all(|(x, y)| real_eq(*x, *y))
                    })
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Create a real value.
    pub fn real(v: f64) -> Self {
        Value::Real(v)
    }

    /// Create a complex value.
    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(re, im)
    }

    /// Create a list value.
    pub fn list(elements: Vec<f64>) -> Self {
        Value::List(elements)
    }

    /// Create a matrix value.
    pub fn matrix(rows: Vec<Vec<f64>>) -> Self {
        Value::Matrix(rows)
    }

    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Try to get as a real. A Complex with negligible imaginary part
    /// demotes to its real part.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Complex(re, im) if im.abs() < IMAG_EPSILON => Some(*re),
            _ => None,
        }
    }

    /// Try to get as a complex (re, im) pair. Reals promote with im = 0.
    pub fn as_complex(&self) -> Option<(f64, f64)> {
        match self {
            Value::Real(v) => Some((*v, 0.0)),
            Value::Complex(re, im) => Some((*re, *im)),
            _ => None,
        }
    }

    /// Try to get as a list of reals. A scalar coerces to a singleton.
    pub fn as_list(&self) -> Option<Vec<f64>> {
        match self {
            Value::List(v) => Some(v.clone()),
            Value::Real(v) => Some(vec![*v]),
            Value::Complex(re, im) if im.abs() < IMAG_EPSILON => Some(vec![*re]),
            _ => None,
        }
    }

    /// Try to get as a matrix. No coercions.
    pub fn as_matrix(&self) -> Option<&Vec<Vec<f64>>> {
        match self {
            Value::Matrix(rows) => Some(rows),
            _ => None,
        }
    }

    /// Try to get as a string. No coercions.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer: finite, integral, and small enough for
    /// a double to represent exactly.
    pub fn as_int(&self) -> Option<i64> {
        let v = self.as_real()?;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < INT_LIMIT {
            Some(v as i64)
        } else {
            None
        }
    }

    /// Name of the carried variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Real(_) => "real",
            Value::Complex(..) => "complex",
            Value::List(_) => "list",
            Value::ComplexList(_) => "complex list",
            Value::Matrix(_) => "matrix",
            Value::Str(_) => "string",
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}
