//! Built-in function dispatch.
//!
//! One arm per keypad function. Single-argument real functions
//! broadcast over lists through `map_real`; list, string, and matrix
//! operations check their own shapes. The angle-sensitive functions
//! read the current angle mode from the state; the random functions
//! draw from the state's generator.
//!
//! `seq`, `nDeriv`, and `fnInt` take unevaluated expressions and are
//! dispatched by the evaluator before arguments are reduced; they
//! never arrive here.

use tibasic_core::{ErrorKind, Result, Value};
use tibasic_lang::Func;
use tibasic_num::{invnorm, matrix, stats};

use crate::evaluator::map_real;
use crate::modes::AngleMode;
use crate::state::State;

/// Poles of tan are detected below this cosine magnitude.
const TAN_POLE_EPSILON: f64 = 1e-14;

pub fn call(state: &mut State, func: Func, args: &[Value]) -> Result<Value> {
    match func {
        // --- trigonometry, angle-mode sensitive ---
        Func::Sin => {
            let angle = state.modes().angle;
            one_arg(args).and_then(|v| map_real(v, |x| Ok(to_radians(x, angle).sin())))
        }
        Func::Cos => {
            let angle = state.modes().angle;
            one_arg(args).and_then(|v| map_real(v, |x| Ok(to_radians(x, angle).cos())))
        }
        Func::Tan => {
            let angle = state.modes().angle;
            one_arg(args).and_then(|v| {
                map_real(v, |x| {
                    let rad = to_radians(x, angle);
                    if rad.cos().abs() < TAN_POLE_EPSILON {
                        return Err(ErrorKind::Domain.into());
                    }
                    Ok(rad.tan())
                })
            })
        }
        Func::Asin => inverse_trig(state, args, f64::asin),
        Func::Acos => inverse_trig(state, args, f64::acos),
        Func::Atan => {
            let angle = state.modes().angle;
            one_arg(args).and_then(|v| map_real(v, |x| Ok(from_radians(x.atan(), angle))))
        }

        // --- hyperbolics ---
        Func::Sinh => real_fn(args, |x| Ok(x.sinh())),
        Func::Cosh => real_fn(args, |x| Ok(x.cosh())),
        Func::Tanh => real_fn(args, |x| Ok(x.tanh())),
        Func::Asinh => real_fn(args, |x| Ok(x.asinh())),
        Func::Acosh => real_fn(args, |x| {
            if x < 1.0 {
                return Err(ErrorKind::Domain.into());
            }
            Ok(x.acosh())
        }),
        Func::Atanh => real_fn(args, |x| {
            if x.abs() >= 1.0 {
                return Err(ErrorKind::Domain.into());
            }
            Ok(x.atanh())
        }),

        // --- roots, logs ---
        Func::Sqrt => real_fn(args, |x| {
            if x < 0.0 {
                return Err(ErrorKind::NonReal.into());
            }
            Ok(x.sqrt())
        }),
        Func::Cbrt => real_fn(args, |x| Ok(x.cbrt())),
        Func::Ln => real_fn(args, |x| {
            if x <= 0.0 {
                return Err(ErrorKind::Domain.into());
            }
            Ok(x.ln())
        }),
        Func::Log => match args {
            [v] => map_real(v, |x| {
                if x <= 0.0 {
                    return Err(ErrorKind::Domain.into());
                }
                Ok(x.log10())
            }),
            [v, base] => {
                let base = base.as_real().ok_or(ErrorKind::DataType)?;
                if base <= 0.0 || base == 1.0 {
                    return Err(ErrorKind::Domain.into());
                }
                map_real(v, |x| {
                    if x <= 0.0 {
                        return Err(ErrorKind::Domain.into());
                    }
                    Ok(x.ln() / base.ln())
                })
            }
            _ => Err(ErrorKind::Argument.into()),
        },

        // --- real helpers ---
        Func::Abs => real_fn(args, |x| Ok(x.abs())),
        Func::Round => match args {
            [v] => map_real(v, |x| Ok(round_to(x, 9))),
            [v, digits] => {
                let d = digits.as_int().ok_or(ErrorKind::Domain)?;
                if !(0..=9).contains(&d) {
                    return Err(ErrorKind::Domain.into());
                }
                map_real(v, |x| Ok(round_to(x, d as u32)))
            }
            _ => Err(ErrorKind::Argument.into()),
        },
        Func::Int => real_fn(args, |x| Ok(x.floor())),
        Func::IPart => real_fn(args, |x| Ok(x.trunc())),
        Func::FPart => real_fn(args, |x| Ok(x - x.trunc())),
        Func::Gcd => {
            let (a, b) = two_ints(args)?;
            if a < 0 || b < 0 {
                return Err(ErrorKind::Domain.into());
            }
            Ok(Value::Real(gcd(a, b) as f64))
        }
        Func::Lcm => {
            let (a, b) = two_ints(args)?;
            if a < 0 || b < 0 {
                return Err(ErrorKind::Domain.into());
            }
            if a == 0 || b == 0 {
                return Ok(Value::Real(0.0));
            }
            Ok(Value::Real((a / gcd(a, b) * b) as f64))
        }
        Func::Min => min_max(args, true),
        Func::Max => min_max(args, false),

        // --- list operations ---
        Func::Dim => match one_arg(args)? {
            Value::List(v) => Ok(Value::Real(v.len() as f64)),
            Value::Matrix(rows) => Ok(Value::List(vec![
                rows.len() as f64,
                rows.first().map(|r| r.len()).unwrap_or(0) as f64,
            ])),
            _ => Err(ErrorKind::DataType.into()),
        },
        Func::Sum => {
            let list = one_list(args)?;
            Ok(Value::Real(list.iter().sum()))
        }
        Func::Prod => {
            let list = one_list(args)?;
            Ok(Value::Real(list.iter().product()))
        }
        Func::Mean => {
            let list = one_list(args)?;
            if list.is_empty() {
                return Err(ErrorKind::Stat.into());
            }
            Ok(Value::Real(list.iter().sum::<f64>() / list.len() as f64))
        }
        Func::Median => {
            let list = one_list(args)?;
            Ok(Value::Real(stats::one_var(&list)?.median))
        }
        Func::CumSum => {
            let list = one_list(args)?;
            let mut acc = 0.0;
            Ok(Value::List(
                list.iter()
                    .map(|v| {
                        acc += v;
                        acc
                    })
                    .collect(),
            ))
        }
        Func::Augment => match args {
            [Value::List(a), Value::List(b)] => {
                Ok(Value::List(a.iter().chain(b).copied().collect()))
            }
            [Value::Matrix(a), Value::Matrix(b)] => Ok(Value::Matrix(matrix::augment(a, b)?)),
            [_, _] => Err(ErrorKind::DataType.into()),
            _ => Err(ErrorKind::Argument.into()),
        },
        Func::SortA | Func::SortD => {
            let mut list = one_list(args)?;
            list.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            if func == Func::SortD {
                list.reverse();
            }
            Ok(Value::List(list))
        }

        // --- string operations ---
        Func::Length => match one_arg(args)? {
            Value::Str(s) => Ok(Value::Real(s.chars().count() as f64)),
            _ => Err(ErrorKind::DataType.into()),
        },
        Func::Sub => match args {
            [Value::Str(s), start, len] => {
                let start = start.as_int().ok_or(ErrorKind::InvalidDim)?;
                let len = len.as_int().ok_or(ErrorKind::InvalidDim)?;
                let total = s.chars().count() as i64;
                if start < 1 || len < 0 || start + len - 1 > total {
                    return Err(ErrorKind::InvalidDim.into());
                }
                let body: String = s
                    .chars()
                    .skip(start as usize - 1)
                    .take(len as usize)
                    .collect();
                Ok(Value::Str(body))
            }
            [_, _, _] => Err(ErrorKind::DataType.into()),
            _ => Err(ErrorKind::Argument.into()),
        },
        Func::InString => {
            let (haystack, needle, start) = match args {
                [Value::Str(h), Value::Str(n)] => (h, n, 1i64),
                [Value::Str(h), Value::Str(n), s] => {
                    (h, n, s.as_int().ok_or(ErrorKind::InvalidDim)?)
                }
                [_, _] | [_, _, _] => return Err(ErrorKind::DataType.into()),
                _ => return Err(ErrorKind::Argument.into()),
            };
            if start < 1 {
                return Err(ErrorKind::InvalidDim.into());
            }
            Ok(Value::Real(instring(haystack, needle, start as usize)))
        }

        // --- matrix operations ---
        Func::Det => match one_arg(args)? {
            Value::Matrix(rows) => Ok(Value::Real(matrix::determinant(rows)?)),
            _ => Err(ErrorKind::DataType.into()),
        },
        Func::Identity => {
            let n = one_arg(args)?.as_int().ok_or(ErrorKind::Domain)?;
            if n < 1 {
                return Err(ErrorKind::Domain.into());
            }
            Ok(Value::Matrix(matrix::identity(n as usize)))
        }
        Func::Ref => match one_arg(args)? {
            Value::Matrix(rows) => Ok(Value::Matrix(matrix::row_echelon(rows))),
            _ => Err(ErrorKind::DataType.into()),
        },
        Func::Rref => match one_arg(args)? {
            Value::Matrix(rows) => Ok(Value::Matrix(matrix::reduced_row_echelon(rows))),
            _ => Err(ErrorKind::DataType.into()),
        },
        Func::RandM => {
            let (rows, cols) = two_ints(args)?;
            if rows < 1 || cols < 1 {
                return Err(ErrorKind::Domain.into());
            }
            let rows = (0..rows)
                .map(|_| {
                    (0..cols)
                        .map(|_| (state.rand_next() * 19.0).floor() - 9.0)
                        .collect()
                })
                .collect();
            Ok(Value::Matrix(rows))
        }

        // --- probability ---
        Func::RandInt => {
            let lo = arg_int(args, 0)?;
            let hi = arg_int(args, 1)?;
            if lo > hi {
                return Err(ErrorKind::Domain.into());
            }
            let span = (hi - lo + 1) as f64;
            let mut draw = || lo as f64 + (state.rand_next() * span).floor();
            match args.len() {
                2 => Ok(Value::Real(draw())),
                3 => {
                    let n = args[2].as_int().ok_or(ErrorKind::Domain)?;
                    if n < 1 {
                        return Err(ErrorKind::Domain.into());
                    }
                    Ok(Value::List((0..n).map(|_| draw()).collect()))
                }
                _ => Err(ErrorKind::Argument.into()),
            }
        }
        Func::RandNorm => {
            let mu = arg_real(args, 0)?;
            let sigma = arg_real(args, 1)?;
            let mut draw = || {
                let (u1, u2) = (state.rand_next().max(f64::MIN_POSITIVE), state.rand_next());
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                mu + sigma * z
            };
            match args.len() {
                2 => Ok(Value::Real(draw())),
                3 => {
                    let n = args[2].as_int().ok_or(ErrorKind::Domain)?;
                    if n < 1 {
                        return Err(ErrorKind::Domain.into());
                    }
                    Ok(Value::List((0..n).map(|_| draw()).collect()))
                }
                _ => Err(ErrorKind::Argument.into()),
            }
        }
        Func::InvNorm => match args.len() {
            1 => Ok(Value::Real(invnorm::inverse_normal(arg_real(args, 0)?)?)),
            3 => {
                let p = arg_real(args, 0)?;
                let mu = arg_real(args, 1)?;
                let sigma = arg_real(args, 2)?;
                Ok(Value::Real(mu + sigma * invnorm::inverse_normal(p)?))
            }
            _ => Err(ErrorKind::Argument.into()),
        },

        // Expression-argument builtins are dispatched in the evaluator.
        Func::Seq | Func::NDeriv | Func::FnInt => Err(ErrorKind::Argument.into()),
    }
}

// --- helpers ---

fn to_radians(x: f64, mode: AngleMode) -> f64 {
    match mode {
        AngleMode::Radian => x,
        AngleMode::Degree => x.to_radians(),
    }
}

fn from_radians(x: f64, mode: AngleMode) -> f64 {
    match mode {
        AngleMode::Radian => x,
        AngleMode::Degree => x.to_degrees(),
    }
}

fn inverse_trig(state: &State, args: &[Value], f: fn(f64) -> f64) -> Result<Value> {
    let angle = state.modes().angle;
    one_arg(args).and_then(|v| {
        map_real(v, |x| {
            if !(-1.0..=1.0).contains(&x) {
                return Err(ErrorKind::Domain.into());
            }
            Ok(from_radians(f(x), angle))
        })
    })
}

fn one_arg(args: &[Value]) -> Result<&Value> {
    match args {
        [v] => Ok(v),
        _ => Err(ErrorKind::Argument.into()),
    }
}

fn real_fn(args: &[Value], f: impl Fn(f64) -> Result<f64>) -> Result<Value> {
    one_arg(args).and_then(|v| map_real(v, f))
}

fn one_list(args: &[Value]) -> Result<Vec<f64>> {
    one_arg(args)?.as_list().ok_or_else(|| ErrorKind::DataType.into())
}

fn arg_real(args: &[Value], index: usize) -> Result<f64> {
    args.get(index)
        .ok_or(ErrorKind::Argument)?
        .as_real()
        .ok_or_else(|| ErrorKind::DataType.into())
}

fn arg_int(args: &[Value], index: usize) -> Result<i64> {
    args.get(index)
        .ok_or(ErrorKind::Argument)?
        .as_int()
        .ok_or_else(|| ErrorKind::Domain.into())
}

fn two_ints(args: &[Value]) -> Result<(i64, i64)> {
    if args.len() != 2 {
        return Err(ErrorKind::Argument.into());
    }
    Ok((arg_int(args, 0)?, arg_int(args, 1)?))
}

fn round_to(x: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (x * scale).round() / scale
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// min/max over a single list, a scalar pair, or pairwise over lists.
fn min_max(args: &[Value], take_min: bool) -> Result<Value> {
    let pick = |a: f64, b: f64| if take_min { a.min(b) } else { a.max(b) };
    match args {
        [Value::List(v)] => {
            if v.is_empty() {
                return Err(ErrorKind::InvalidDim.into());
            }
            Ok(Value::Real(v.iter().copied().fold(v[0], pick)))
        }
        [Value::List(a), Value::List(b)] => {
            if a.len() != b.len() {
                return Err(ErrorKind::DimMismatch.into());
            }
            Ok(Value::List(
                a.iter().zip(b).map(|(x, y)| pick(*x, *y)).collect(),
            ))
        }
        [Value::List(a), b] | [b, Value::List(a)] => {
            let s = b.as_real().ok_or(ErrorKind::DataType)?;
            Ok(Value::List(a.iter().map(|x| pick(*x, s)).collect()))
        }
        [a, b] => {
            let x = a.as_real().ok_or(ErrorKind::DataType)?;
            let y = b.as_real().ok_or(ErrorKind::DataType)?;
            Ok(Value::Real(pick(x, y)))
        }
        _ => Err(ErrorKind::Argument.into()),
    }
}

/// 1-based position of `needle` in `haystack` at or after `start`;
/// 0 when absent. Positions count characters.
fn instring(haystack: &str, needle: &str, start: usize) -> f64 {
    let chars: Vec<char> = haystack.chars().collect();
    let target: Vec<char> = needle.chars().collect();
    if target.is_empty() || start > chars.len() {
        return 0.0;
    }
    for i in (start - 1)..=chars.len().saturating_sub(target.len()) {
        if chars[i..i + target.len()] == target[..] {
            return (i + 1) as f64;
        }
    }
    0.0
}
