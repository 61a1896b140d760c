//! Tree-walking expression evaluator.
//!
//! Walks an [`Expr`] against a [`State`], producing a [`Value`] or one
//! error kind. Binary operations broadcast over lists and matrices;
//! the store protocol writes through to the state's named stores.
//! Operands and function arguments evaluate strictly left to right.

use tibasic_core::{ErrorKind, Result, Value};
use tibasic_lang::ast::{BinOp, Expr, PostOp, UnOp};
use tibasic_lang::parser::parse_str;
use tibasic_lang::Func;
use tibasic_num::{combin, matrix, solve};

use crate::builtins;
use crate::state::State;

/// Evaluate an expression against the state.
pub fn eval(state: &mut State, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Number(v) => Ok(Value::Real(*v)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Pi => Ok(Value::Real(std::f64::consts::PI)),
        Expr::EulerE => Ok(Value::Real(std::f64::consts::E)),
        Expr::ImaginaryI => Ok(Value::Complex(0.0, 1.0)),
        Expr::Ans => Ok(state.ans().clone()),
        Expr::Rand => Ok(Value::Real(state.rand_next())),
        Expr::Var(name) => Ok(state.var(*name)),
        Expr::ListVar(name) => Ok(Value::List(state.list(name)?)),
        Expr::MatrixVar(name) => Ok(Value::Matrix(state.matrix(*name)?)),
        Expr::StrVar(index) => Ok(Value::Str(state.string_var(*index)?)),
        Expr::FuncSlot(index) => {
            // A bare slot reference evaluates at the current X.
            let x = state.var('X').as_real().ok_or(ErrorKind::DataType)?;
            Ok(Value::Real(eval_slot(state, *index, x)?))
        }
        Expr::Binary(op, lhs, rhs) => {
            let left = eval(state, lhs)?;
            let right = eval(state, rhs)?;
            apply_binary(*op, left, right)
        }
        Expr::ImplicitMul(lhs, rhs) => {
            let left = eval(state, lhs)?;
            let right = eval(state, rhs)?;
            apply_binary(BinOp::Mul, left, right)
        }
        Expr::Unary(op, operand) => {
            let value = eval(state, operand)?;
            apply_unary(*op, value)
        }
        Expr::Postfix(operand, op) => {
            let value = eval(state, operand)?;
            apply_postfix(*op, value)
        }
        Expr::Call(func, args) => match func {
            Func::Seq => eval_seq(state, args),
            Func::NDeriv => eval_nderiv(state, args),
            Func::FnInt => eval_fnint(state, args),
            _ => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(eval(state, arg)?);
                }
                builtins::call(state, *func, &values)
            }
        },
        Expr::ListLit(elements) => {
            let mut out = Vec::with_capacity(elements.len());
            for element in elements {
                let v = eval(state, element)?;
                out.push(v.as_real().ok_or(ErrorKind::DataType)?);
            }
            Ok(Value::List(out))
        }
        Expr::MatrixLit(rows) => eval_matrix_literal(state, rows),
        Expr::Index(target, indices) => eval_index(state, target, indices),
        Expr::Store(value, target) => {
            let v = eval(state, value)?;
            eval_store(state, v, target)
        }
    }
}

/// Evaluate function slot `index` at `x`: bind X, evaluate the stored
/// text, and restore the previous binding on every exit path.
pub fn eval_slot(state: &mut State, index: u8, x: f64) -> Result<f64> {
    let text = state.slot_text(index)?.to_string();
    log::trace!("evaluating slot Y{index} at {x}");
    let expr = parse_str(&text)?;
    let value = with_var_bound(state, 'X', x, |st| eval(st, &expr))?;
    value.as_real().ok_or_else(|| ErrorKind::DataType.into())
}

/// Bind `name` to `x`, run `f`, and restore the prior binding whether
/// `f` succeeds or fails.
fn with_var_bound<T>(
    state: &mut State,
    name: char,
    x: f64,
    f: impl FnOnce(&mut State) -> Result<T>,
) -> Result<T> {
    let saved = state.var(name);
    state.set_var(name, Value::Real(x));
    let result = f(state);
    state.set_var(name, saved);
    result
}

// --- binary operations ---

/// Demote a complex result with negligible imaginary part to a real.
fn complex_value(re: f64, im: f64) -> Value {
    if im.abs() < 1e-12 {
        Value::Real(re)
    } else {
        Value::Complex(re, im)
    }
}

fn apply_binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value> {
    match (&lhs, &rhs) {
        // Strings: only concatenation.
        (Value::Str(a), Value::Str(b)) => {
            if op == BinOp::Add {
                Ok(Value::Str(format!("{a}{b}")))
            } else {
                Err(ErrorKind::DataType.into())
            }
        }
        (Value::Str(_), _) | (_, Value::Str(_)) => Err(ErrorKind::DataType.into()),

        (Value::Matrix(a), Value::Matrix(b)) => matrix_matrix(op, a, b),
        (Value::Matrix(m), other) => match other.as_real() {
            Some(s) => matrix_scalar(op, m, s),
            None => Err(ErrorKind::DataType.into()),
        },
        (other, Value::Matrix(m)) => match (op, other.as_real()) {
            (BinOp::Mul, Some(s)) => Ok(Value::Matrix(scale_matrix(m, s))),
            _ => Err(ErrorKind::DataType.into()),
        },

        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Err(ErrorKind::DimMismatch.into());
            }
            let mut out = Vec::with_capacity(a.len());
            for (x, y) in a.iter().zip(b) {
                out.push(scalar_binary(op, *x, *y)?);
            }
            Ok(Value::List(out))
        }
        (Value::List(a), other) => match other.as_real() {
            Some(s) => Ok(Value::List(
                a.iter()
                    .map(|x| scalar_binary(op, *x, s))
                    .collect::<Result<_>>()?,
            )),
            None => Err(ErrorKind::DataType.into()),
        },
        (other, Value::List(b)) => match other.as_real() {
            Some(s) => Ok(Value::List(
                b.iter()
                    .map(|y| scalar_binary(op, s, *y))
                    .collect::<Result<_>>()?,
            )),
            None => Err(ErrorKind::DataType.into()),
        },

        // A genuinely complex operand forces the complex rule.
        (Value::Complex(..), _) | (_, Value::Complex(..))
            if lhs.as_real().is_none() || rhs.as_real().is_none() =>
        {
            let a = lhs.as_complex().ok_or(ErrorKind::DataType)?;
            let b = rhs.as_complex().ok_or(ErrorKind::DataType)?;
            complex_binary(op, a, b)
        }

        _ => {
            let a = lhs.as_real().ok_or(ErrorKind::DataType)?;
            let b = rhs.as_real().ok_or(ErrorKind::DataType)?;
            Ok(Value::Real(scalar_binary(op, a, b)?))
        }
    }
}

fn matrix_matrix(op: BinOp, a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Value> {
    match op {
        BinOp::Add | BinOp::Sub => {
            let same_shape = a.len() == b.len()
                && a.iter().zip(b).all(|(ra, rb)| ra.len() == rb.len());
            if !same_shape {
                return Err(ErrorKind::DimMismatch.into());
            }
            let rows = a
                .iter()
                .zip(b)
                .map(|(ra, rb)| {
                    ra.iter()
                        .zip(rb)
                        .map(|(x, y)| if op == BinOp::Add { x + y } else { x - y })
                        .collect()
                })
                .collect();
            Ok(Value::Matrix(rows))
        }
        BinOp::Mul => Ok(Value::Matrix(matrix::multiply(a, b)?)),
        _ => Err(ErrorKind::DataType.into()),
    }
}

fn matrix_scalar(op: BinOp, m: &[Vec<f64>], s: f64) -> Result<Value> {
    match op {
        BinOp::Mul => Ok(Value::Matrix(scale_matrix(m, s))),
        BinOp::Div => {
            if s == 0.0 {
                return Err(ErrorKind::DivideByZero.into());
            }
            Ok(Value::Matrix(
                m.iter()
                    .map(|row| row.iter().map(|v| v / s).collect())
                    .collect(),
            ))
        }
        BinOp::Pow => {
            let exponent = Value::Real(s).as_int().ok_or(ErrorKind::Domain)?;
            Ok(Value::Matrix(matrix::power(m, exponent)?))
        }
        _ => Err(ErrorKind::DataType.into()),
    }
}

fn scale_matrix(m: &[Vec<f64>], s: f64) -> Vec<Vec<f64>> {
    m.iter()
        .map(|row| row.iter().map(|v| v * s).collect())
        .collect()
}

fn complex_binary(op: BinOp, (ar, ai): (f64, f64), (br, bi): (f64, f64)) -> Result<Value> {
    match op {
        BinOp::Add => Ok(complex_value(ar + br, ai + bi)),
        BinOp::Sub => Ok(complex_value(ar - br, ai - bi)),
        BinOp::Mul => Ok(complex_value(ar * br - ai * bi, ar * bi + ai * br)),
        BinOp::Div => {
            let denom = br * br + bi * bi;
            if denom == 0.0 {
                return Err(ErrorKind::DivideByZero.into());
            }
            Ok(complex_value(
                (ar * br + ai * bi) / denom,
                (ai * br - ar * bi) / denom,
            ))
        }
        BinOp::Eq => Ok(Value::Real(f64::from(ar == br && ai == bi))),
        BinOp::Ne => Ok(Value::Real(f64::from(ar != br || ai != bi))),
        _ => Err(ErrorKind::DataType.into()),
    }
}

/// The scalar rule for one pair of reals.
fn scalar_binary(op: BinOp, a: f64, b: f64) -> Result<f64> {
    Ok(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(ErrorKind::DivideByZero.into());
            }
            a / b
        }
        BinOp::Pow => {
            let r = a.powf(b);
            if a.is_finite() && b.is_finite() {
                if r.is_nan() {
                    return Err(ErrorKind::Domain.into());
                }
                if r.is_infinite() {
                    return Err(ErrorKind::Overflow.into());
                }
            }
            r
        }
        BinOp::Npr | BinOp::Ncr => {
            let n = Value::Real(a).as_int().ok_or(ErrorKind::Domain)?;
            let r = Value::Real(b).as_int().ok_or(ErrorKind::Domain)?;
            if op == BinOp::Npr {
                combin::permutations(n, r)?
            } else {
                combin::combinations(n, r)?
            }
        }
        BinOp::Eq => f64::from(a == b),
        BinOp::Ne => f64::from(a != b),
        BinOp::Lt => f64::from(a < b),
        BinOp::Gt => f64::from(a > b),
        BinOp::Le => f64::from(a <= b),
        BinOp::Ge => f64::from(a >= b),
        BinOp::And => f64::from(a != 0.0 && b != 0.0),
        BinOp::Or => f64::from(a != 0.0 || b != 0.0),
        BinOp::Xor => f64::from((a != 0.0) != (b != 0.0)),
    })
}

// --- unary and postfix ---

fn apply_unary(op: UnOp, value: Value) -> Result<Value> {
    match op {
        UnOp::Neg => match value {
            Value::Real(v) => Ok(Value::Real(-v)),
            Value::Complex(re, im) => Ok(Value::Complex(-re, -im)),
            Value::List(v) => Ok(Value::List(v.into_iter().map(|x| -x).collect())),
            Value::ComplexList(v) => Ok(Value::ComplexList(
                v.into_iter().map(|(re, im)| (-re, -im)).collect(),
            )),
            Value::Matrix(rows) => Ok(Value::Matrix(
                rows.into_iter()
                    .map(|row| row.into_iter().map(|x| -x).collect())
                    .collect(),
            )),
            Value::Str(_) => Err(ErrorKind::DataType.into()),
        },
        UnOp::Not => {
            let v = value.as_real().ok_or(ErrorKind::DataType)?;
            Ok(Value::Real(f64::from(v == 0.0)))
        }
    }
}

/// Map a real function over a scalar or elementwise over a list.
pub(crate) fn map_real(value: &Value, f: impl Fn(f64) -> Result<f64>) -> Result<Value> {
    match value {
        Value::Real(v) => Ok(Value::Real(f(*v)?)),
        Value::Complex(..) => match value.as_real() {
            Some(v) => Ok(Value::Real(f(v)?)),
            None => Err(ErrorKind::DataType.into()),
        },
        Value::List(v) => Ok(Value::List(
            v.iter().map(|x| f(*x)).collect::<Result<_>>()?,
        )),
        _ => Err(ErrorKind::DataType.into()),
    }
}

fn apply_postfix(op: PostOp, value: Value) -> Result<Value> {
    match op {
        PostOp::Factorial => {
            let n = value.as_int().ok_or(ErrorKind::Domain)?;
            Ok(Value::Real(combin::factorial(n)?))
        }
        PostOp::Square => match &value {
            Value::Matrix(m) => Ok(Value::Matrix(matrix::power(m, 2)?)),
            _ => map_real(&value, |x| Ok(x * x)),
        },
        PostOp::Cube => match &value {
            Value::Matrix(m) => Ok(Value::Matrix(matrix::power(m, 3)?)),
            _ => map_real(&value, |x| Ok(x * x * x)),
        },
        PostOp::Inverse => match &value {
            Value::Matrix(m) => Ok(Value::Matrix(matrix::inverse(m)?)),
            _ => map_real(&value, |x| {
                if x == 0.0 {
                    Err(ErrorKind::DivideByZero.into())
                } else {
                    Ok(1.0 / x)
                }
            }),
        },
        PostOp::Degree => map_real(&value, |x| Ok(x.to_radians())),
    }
}

// --- element access ---

fn eval_index(state: &mut State, target: &Expr, indices: &[Expr]) -> Result<Value> {
    match target {
        Expr::ListVar(name) => {
            if indices.len() != 1 {
                return Err(ErrorKind::Argument.into());
            }
            let idx = eval(state, &indices[0])?
                .as_int()
                .ok_or(ErrorKind::InvalidDim)?;
            let list = state.list(name)?;
            if idx < 1 || idx as usize > list.len() {
                return Err(ErrorKind::InvalidDim.into());
            }
            Ok(Value::Real(list[idx as usize - 1]))
        }
        Expr::MatrixVar(name) => {
            if indices.len() != 2 {
                return Err(ErrorKind::Argument.into());
            }
            let row = eval(state, &indices[0])?
                .as_int()
                .ok_or(ErrorKind::InvalidDim)?;
            let col = eval(state, &indices[1])?
                .as_int()
                .ok_or(ErrorKind::InvalidDim)?;
            let rows = state.matrix(*name)?;
            if row < 1 || row as usize > rows.len() {
                return Err(ErrorKind::InvalidDim.into());
            }
            let r = &rows[row as usize - 1];
            if col < 1 || col as usize > r.len() {
                return Err(ErrorKind::InvalidDim.into());
            }
            Ok(Value::Real(r[col as usize - 1]))
        }
        Expr::FuncSlot(index) => {
            if indices.len() != 1 {
                return Err(ErrorKind::Argument.into());
            }
            let x = eval(state, &indices[0])?
                .as_real()
                .ok_or(ErrorKind::DataType)?;
            Ok(Value::Real(eval_slot(state, *index, x)?))
        }
        _ => Err(ErrorKind::DataType.into()),
    }
}

// --- store protocol ---

fn eval_store(state: &mut State, value: Value, target: &Expr) -> Result<Value> {
    match target {
        Expr::Var(name) => {
            // Scalar variables hold numbers only.
            if value.as_complex().is_none() {
                return Err(ErrorKind::DataType.into());
            }
            state.set_var(*name, value.clone());
            Ok(value)
        }
        Expr::ListVar(name) => {
            let list = value.as_list().ok_or(ErrorKind::DataType)?;
            state.set_list(name, list.clone());
            Ok(Value::List(list))
        }
        Expr::MatrixVar(name) => {
            let rows = value.as_matrix().ok_or(ErrorKind::DataType)?.clone();
            state.set_matrix(*name, rows);
            Ok(value)
        }
        Expr::StrVar(index) => {
            let text = value.as_string().ok_or(ErrorKind::DataType)?.to_string();
            state.set_string_var(*index, text);
            Ok(value)
        }
        Expr::Rand => {
            let seed = value.as_int().ok_or(ErrorKind::DataType)?;
            state.reseed(seed);
            Ok(value)
        }
        Expr::Index(inner, indices) => match &**inner {
            Expr::ListVar(name) => {
                if indices.len() != 1 {
                    return Err(ErrorKind::Argument.into());
                }
                let idx = eval(state, &indices[0])?
                    .as_int()
                    .ok_or(ErrorKind::InvalidDim)?;
                let v = value.as_real().ok_or(ErrorKind::DataType)?;
                state.set_list_element(name, idx, v)?;
                Ok(value)
            }
            Expr::MatrixVar(name) => {
                if indices.len() != 2 {
                    return Err(ErrorKind::Argument.into());
                }
                let row = eval(state, &indices[0])?
                    .as_int()
                    .ok_or(ErrorKind::InvalidDim)?;
                let col = eval(state, &indices[1])?
                    .as_int()
                    .ok_or(ErrorKind::InvalidDim)?;
                let v = value.as_real().ok_or(ErrorKind::DataType)?;
                state.set_matrix_element(*name, row, col, v)?;
                Ok(value)
            }
            _ => Err(ErrorKind::Syntax.into()),
        },
        _ => Err(ErrorKind::Syntax.into()),
    }
}

// --- literals ---

fn eval_matrix_literal(state: &mut State, rows: &[Vec<Expr>]) -> Result<Value> {
    if rows.is_empty() || rows[0].is_empty() {
        return Err(ErrorKind::InvalidDim.into());
    }
    let width = rows[0].len();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() != width {
            return Err(ErrorKind::DimMismatch.into());
        }
        let mut cells = Vec::with_capacity(width);
        for cell in row {
            let v = eval(state, cell)?;
            cells.push(v.as_real().ok_or(ErrorKind::DataType)?);
        }
        out.push(cells);
    }
    Ok(Value::Matrix(out))
}

// --- expression-argument builtins (seq, nDeriv, fnInt) ---

/// `seq(expr, var, start, end[, step])`: re-evaluates the expression
/// at each step with the loop variable bound.
fn eval_seq(state: &mut State, args: &[Expr]) -> Result<Value> {
    if !(4..=5).contains(&args.len()) {
        return Err(ErrorKind::Argument.into());
    }
    let Expr::Var(var) = &args[1] else {
        return Err(ErrorKind::Syntax.into());
    };
    let var = *var;
    let start = eval_real(state, &args[2])?;
    let end = eval_real(state, &args[3])?;
    let step = match args.get(4) {
        Some(e) => eval_real(state, e)?,
        None => 1.0,
    };
    if step == 0.0 {
        return Err(ErrorKind::Domain.into());
    }

    let mut out = Vec::new();
    let mut x = start;
    while (step > 0.0 && x <= end) || (step < 0.0 && x >= end) {
        let v = with_var_bound(state, var, x, |st| eval(st, &args[0]))?;
        out.push(v.as_real().ok_or(ErrorKind::DataType)?);
        x += step;
    }
    Ok(Value::List(out))
}

/// `nDeriv(expr, var, x)`: symmetric-difference derivative.
fn eval_nderiv(state: &mut State, args: &[Expr]) -> Result<Value> {
    if args.len() != 3 {
        return Err(ErrorKind::Argument.into());
    }
    let Expr::Var(var) = &args[1] else {
        return Err(ErrorKind::Syntax.into());
    };
    let var = *var;
    let at = eval_real(state, &args[2])?;
    let body = &args[0];
    let d = solve::derivative(
        |x| {
            with_var_bound(state, var, x, |st| eval(st, body))
                .ok()
                .and_then(|v| v.as_real())
        },
        at,
        solve::DERIV_STEP,
    )?;
    Ok(Value::Real(d))
}

/// `fnInt(expr, var, lower, upper)`: composite Simpson integral.
fn eval_fnint(state: &mut State, args: &[Expr]) -> Result<Value> {
    if args.len() != 4 {
        return Err(ErrorKind::Argument.into());
    }
    let Expr::Var(var) = &args[1] else {
        return Err(ErrorKind::Syntax.into());
    };
    let var = *var;
    let lower = eval_real(state, &args[2])?;
    let upper = eval_real(state, &args[3])?;
    let body = &args[0];
    let integral = solve::integrate(
        |x| {
            with_var_bound(state, var, x, |st| eval(st, body))
                .ok()
                .and_then(|v| v.as_real())
        },
        lower,
        upper,
        solve::SIMPSON_INTERVALS,
    )?;
    Ok(Value::Real(integral))
}

pub(crate) fn eval_real(state: &mut State, expr: &Expr) -> Result<f64> {
    eval(state, expr)?
        .as_real()
        .ok_or_else(|| ErrorKind::DataType.into())
}
