//! Computational core of a classic graphing calculator.
//!
//! A language frontend (tokenizer and Pratt parser), a tree-walking
//! evaluator over a universal tagged value, a statement interpreter
//! for the calculator's procedural language, and numeric kernels for
//! plotting, solving, and statistics. Rendering, keypad handling, and
//! persistence are the embedder's business.
//!
//! ```
//! use tibasic::{eval_entry, State};
//!
//! let mut state = State::new();
//! let value = eval_entry(&mut state, "2+3*4").unwrap();
//! assert_eq!(value.as_real(), Some(14.0));
//! ```

pub use tibasic_core::{CalcError, ErrorKind, Pos, Result, Value};
pub use tibasic_eval::{
    eval, eval_slot, AngleMode, ComplexFormat, GraphMode, ModeSettings, NumberFormat, Snapshot,
    State, WindowParams,
};
pub use tibasic_lang::{parse, parse_str, tokenize, BinOp, Expr, Func, PostOp, Token, UnOp};
pub use tibasic_num as num;
pub use tibasic_prog::{
    format_value, parse_program, HostIo, Interpreter, Program, SilentIo, Statement,
};

/// Evaluate one home-screen entry: parse, evaluate, record the result
/// as Ans and in the history.
pub fn eval_entry(state: &mut State, text: &str) -> Result<Value> {
    let expr = parse_str(text)?;
    let value = eval(state, &expr)?;
    state.set_ans(value.clone());
    state.push_history(text, value.clone());
    Ok(value)
}

/// Run program source against a state with no I/O attached.
pub fn run_program(state: &mut State, source: &str) -> Result<()> {
    let mut io = SilentIo;
    Interpreter::new(state, &mut io).run(source)
}
