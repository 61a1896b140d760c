//! Built-in function identifiers.
//!
//! Each entry corresponds to one parenthesized function spelling on the
//! keypad (`sin(`, `randInt(`, ...). The tokenizer recognizes the word
//! and consumes the opening paren as part of the token; evaluation
//! lives in the evaluator's dispatch table.

/// Identifier of a built-in function.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Func {
    // Trigonometric (angle-mode sensitive)
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    // Roots, logs, exponentials
    Sqrt,
    Cbrt,
    Ln,
    Log,
    // Real-number helpers
    Abs,
    Round,
    Int,
    IPart,
    FPart,
    Gcd,
    Lcm,
    Min,
    Max,
    // List operations
    Dim,
    Sum,
    Prod,
    Mean,
    Median,
    CumSum,
    Augment,
    SortA,
    SortD,
    Seq,
    // String operations
    Length,
    Sub,
    InString,
    // Matrix operations
    Det,
    Identity,
    Ref,
    Rref,
    RandM,
    // Probability
    RandInt,
    RandNorm,
    InvNorm,
    // Calculus
    NDeriv,
    FnInt,
}

impl Func {
    /// Look up a function by its word spelling (without the paren).
    pub fn from_word(word: &str) -> Option<Func> {
        Some(match word {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "sin⁻¹" | "asin" => Func::Asin,
            "cos⁻¹" | "acos" => Func::Acos,
            "tan⁻¹" | "atan" => Func::Atan,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            "sinh⁻¹" | "asinh" => Func::Asinh,
            "cosh⁻¹" | "acosh" => Func::Acosh,
            "tanh⁻¹" | "atanh" => Func::Atanh,
            "sqrt" => Func::Sqrt,
            "ln" => Func::Ln,
            "log" => Func::Log,
            "abs" => Func::Abs,
            "round" => Func::Round,
            "int" => Func::Int,
            "iPart" => Func::IPart,
            "fPart" => Func::FPart,
            "gcd" => Func::Gcd,
            "lcm" => Func::Lcm,
            "min" => Func::Min,
            "max" => Func::Max,
            "dim" => Func::Dim,
            "sum" => Func::Sum,
            "prod" => Func::Prod,
            "mean" => Func::Mean,
            "median" => Func::Median,
            "cumSum" => Func::CumSum,
            "augment" => Func::Augment,
            "SortA" => Func::SortA,
            "SortD" => Func::SortD,
            "seq" => Func::Seq,
            "length" => Func::Length,
            "sub" => Func::Sub,
            "inString" => Func::InString,
            "det" => Func::Det,
            "identity" => Func::Identity,
            "ref" => Func::Ref,
            "rref" => Func::Rref,
            "randM" => Func::RandM,
            "randInt" => Func::RandInt,
            "randNorm" => Func::RandNorm,
            "invNorm" => Func::InvNorm,
            "nDeriv" => Func::NDeriv,
            "fnInt" => Func::FnInt,
            _ => return None,
        })
    }

    /// Keypad spelling, paren included.
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin(",
            Func::Cos => "cos(",
            Func::Tan => "tan(",
            Func::Asin => "sin⁻¹(",
            Func::Acos => "cos⁻¹(",
            Func::Atan => "tan⁻¹(",
            Func::Sinh => "sinh(",
            Func::Cosh => "cosh(",
            Func::Tanh => "tanh(",
            Func::Asinh => "sinh⁻¹(",
            Func::Acosh => "cosh⁻¹(",
            Func::Atanh => "tanh⁻¹(",
            Func::Sqrt => "√(",
            Func::Cbrt => "³√(",
            Func::Ln => "ln(",
            Func::Log => "log(",
            Func::Abs => "abs(",
            Func::Round => "round(",
            Func::Int => "int(",
            Func::IPart => "iPart(",
            Func::FPart => "fPart(",
            Func::Gcd => "gcd(",
            Func::Lcm => "lcm(",
            Func::Min => "min(",
            Func::Max => "max(",
            Func::Dim => "dim(",
            Func::Sum => "sum(",
            Func::Prod => "prod(",
            Func::Mean => "mean(",
            Func::Median => "median(",
            Func::CumSum => "cumSum(",
            Func::Augment => "augment(",
            Func::SortA => "SortA(",
            Func::SortD => "SortD(",
            Func::Seq => "seq(",
            Func::Length => "length(",
            Func::Sub => "sub(",
            Func::InString => "inString(",
            Func::Det => "det(",
            Func::Identity => "identity(",
            Func::Rref => "rref(",
            Func::Ref => "ref(",
            Func::RandM => "randM(",
            Func::RandInt => "randInt(",
            Func::RandNorm => "randNorm(",
            Func::InvNorm => "invNorm(",
            Func::NDeriv => "nDeriv(",
            Func::FnInt => "fnInt(",
        }
    }
}
