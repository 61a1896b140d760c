//! The calculator error taxonomy.
//!
//! Every fallible operation in the core surfaces exactly one of these
//! kinds. Nothing inside the core catches an error; they propagate to
//! the embedding caller (or abort the running program).

use thiserror::Error;

use crate::pos::Pos;

/// The distinct failure conditions callers can branch on.
///
/// Display strings follow the calculator's on-screen error headers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Tokenizer or parser rejected the input, or a statement fell
    /// through the statement grammar.
    #[error("ERR:SYNTAX")]
    Syntax,
    /// Exact-zero denominator in real or complex division.
    #[error("ERR:DIVIDE BY 0")]
    DivideByZero,
    /// Non-finite intermediate where a finite result is required.
    #[error("ERR:OVERFLOW")]
    Overflow,
    /// Argument outside a function's mathematical domain.
    #[error("ERR:DOMAIN")]
    Domain,
    /// A value of the wrong shape reached an operation.
    #[error("ERR:DATA TYPE")]
    DataType,
    /// Wrong number of arguments to a built-in function.
    #[error("ERR:ARGUMENT")]
    Argument,
    /// Mismatched shapes in a list or matrix binary operation.
    #[error("ERR:DIM MISMATCH")]
    DimMismatch,
    /// Non-invertible matrix during inversion or linear solve.
    #[error("ERR:SINGULAR MAT")]
    Singular,
    /// Read of an unset list/matrix/string/function slot, or a call to
    /// a missing program.
    #[error("ERR:UNDEFINED")]
    Undefined,
    /// Element access out of bounds, or a bad substring range.
    #[error("ERR:INVALID DIM")]
    InvalidDim,
    /// Degenerate statistical input.
    #[error("ERR:STAT")]
    Stat,
    /// Square root (or even root) of a negative with complex mode off.
    #[error("ERR:NONREAL ANS")]
    NonReal,
    /// Root finder given an interval without a sign change.
    #[error("ERR:NO SIGN CHNG")]
    NoSignChange,
    /// Goto or Menu target that does not resolve to a label.
    #[error("ERR:LABEL {0}")]
    LabelNotFound(String),
    /// Cooperative cancellation.
    #[error("ERR:BREAK")]
    Break,
    /// Subroutine recursion exceeded the interpreter's depth budget.
    #[error("ERR:MEMORY")]
    MemoryFull,
}

/// An error with an optional source position.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct CalcError {
    pub kind: ErrorKind,
    /// Byte offset into the offending input, when known.
    pub pos: Option<Pos>,
}

impl CalcError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, pos: None }
    }

    /// Attach a source position.
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl From<ErrorKind> for CalcError {
    fn from(kind: ErrorKind) -> Self {
        CalcError::new(kind)
    }
}

/// Shorthand result type used across the workspace.
pub type Result<T> = std::result::Result<T, CalcError>;
