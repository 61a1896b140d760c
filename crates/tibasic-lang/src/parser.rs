//! Pratt parser over the token stream.
//!
//! Operators sit on a fixed precedence lattice; each level's binding
//! power is `level*2` for left associativity and `level*2 - 1` for
//! right, which folds associativity into the minimum-binding-power
//! test. Store binds loosest and to the right; exponent binds to the
//! right above negation, so `-3^2` is `-(3^2)` while `2^3^2` is
//! `2^(3^2)`.

use tibasic_core::{CalcError, ErrorKind, Result};

use crate::ast::{BinOp, Expr, PostOp, UnOp};
use crate::token::{SpannedToken, Token};
use crate::tokenizer::tokenize;

/// Store: level 1, right-associative.
const STORE_BP: u8 = 1;
/// Or / Xor: level 2.
const OR_BP: u8 = 4;
/// And: level 3.
const AND_BP: u8 = 6;
/// Logical not (prefix): level 4.
const NOT_BP: u8 = 8;
/// Comparisons: level 5.
const CMP_BP: u8 = 10;
/// Addition: level 6.
const ADD_BP: u8 = 12;
/// Multiplication (plus nPr, nCr, implicit multiply): level 7.
const MUL_BP: u8 = 14;
/// Negation (prefix): level 8, below the exponent.
const NEG_BP: u8 = 16;
/// Exponent: level 9, right-associative.
const POW_BP: u8 = 17;

/// Parse a tokenized expression; the whole stream must be consumed.
pub fn parse(tokens: Vec<SpannedToken>) -> Result<Expr> {
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr(0)?;
    if parser.peek() != &Token::Eof {
        return Err(parser.syntax());
    }
    Ok(expr)
}

/// Tokenize and parse in one step.
pub fn parse_str(src: &str) -> Result<Expr> {
    parse(tokenize(src)?)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    idx: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, idx: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.idx)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn bump(&mut self) -> Token {
        let token = self
            .tokens
            .get(self.idx)
            .map(|t| t.token.clone())
            .unwrap_or(Token::Eof);
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
        token
    }

    fn syntax(&self) -> CalcError {
        let err = CalcError::new(ErrorKind::Syntax);
        match self.tokens.get(self.idx).or_else(|| self.tokens.last()) {
            Some(t) => err.at(t.pos),
            None => err,
        }
    }

    /// Infix binding: (operator, binding power, right-associative).
    fn infix_binding(token: &Token) -> Option<(BinOp, u8, bool)> {
        Some(match token {
            Token::Or => (BinOp::Or, OR_BP, false),
            Token::Xor => (BinOp::Xor, OR_BP, false),
            Token::And => (BinOp::And, AND_BP, false),
            Token::Eq => (BinOp::Eq, CMP_BP, false),
            Token::Ne => (BinOp::Ne, CMP_BP, false),
            Token::Lt => (BinOp::Lt, CMP_BP, false),
            Token::Gt => (BinOp::Gt, CMP_BP, false),
            Token::Le => (BinOp::Le, CMP_BP, false),
            Token::Ge => (BinOp::Ge, CMP_BP, false),
            Token::Plus => (BinOp::Add, ADD_BP, false),
            Token::Minus => (BinOp::Sub, ADD_BP, false),
            Token::Multiply => (BinOp::Mul, MUL_BP, false),
            Token::Divide => (BinOp::Div, MUL_BP, false),
            Token::Npr => (BinOp::Npr, MUL_BP, false),
            Token::Ncr => (BinOp::Ncr, MUL_BP, false),
            Token::Power => (BinOp::Pow, POW_BP, true),
            _ => return None,
        })
    }

    fn postfix_op(token: &Token) -> Option<PostOp> {
        Some(match token {
            Token::Factorial => PostOp::Factorial,
            Token::Square => PostOp::Square,
            Token::Cube => PostOp::Cube,
            Token::Inverse => PostOp::Inverse,
            Token::DegreeMark => PostOp::Degree,
            _ => return None,
        })
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let token = self.peek();
            if let Some(op) = Self::postfix_op(token) {
                // Postfix level outbinds everything to its left.
                self.bump();
                lhs = Expr::postfix(lhs, op);
                continue;
            }
            if token == &Token::Store && min_bp <= STORE_BP {
                self.bump();
                let target = self.parse_expr(STORE_BP)?;
                lhs = Expr::store(lhs, target);
                continue;
            }
            if token == &Token::ImplicitMul && min_bp <= MUL_BP {
                self.bump();
                let rhs = self.parse_expr(MUL_BP + 1)?;
                lhs = Expr::implicit_mul(lhs, rhs);
                continue;
            }
            if let Some((op, bp, right_assoc)) = Self::infix_binding(token)
                && min_bp <= bp
            {
                self.bump();
                let rhs = self.parse_expr(if right_assoc { bp } else { bp + 1 })?;
                lhs = Expr::binary(op, lhs, rhs);
                continue;
            }
            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        let expr = match self.bump() {
            Token::Number(v) => Expr::Number(v),
            Token::Str(s) => Expr::Str(s),
            Token::Pi => Expr::Pi,
            Token::EulerE => Expr::EulerE,
            Token::ImaginaryI => Expr::ImaginaryI,
            Token::Ans => Expr::Ans,
            Token::Rand => Expr::Rand,
            Token::Variable(name) => Expr::Var(name),
            Token::StringVar(index) => Expr::StrVar(index),
            Token::ListName(name) => self.maybe_index(Expr::ListVar(name))?,
            Token::MatrixName(name) => self.maybe_index(Expr::MatrixVar(name))?,
            Token::FunctionSlot(index) => self.maybe_index(Expr::FuncSlot(index))?,
            Token::Negate => Expr::unary(UnOp::Neg, self.parse_expr(NEG_BP)?),
            Token::Not => Expr::unary(UnOp::Not, self.parse_expr(NOT_BP)?),
            Token::LeftParen => {
                let inner = self.parse_expr(0)?;
                match self.peek() {
                    Token::RightParen => {
                        self.bump();
                    }
                    // Calculator input may drop a trailing close paren.
                    Token::Eof => {}
                    _ => return Err(self.syntax()),
                }
                inner
            }
            Token::LeftBrace => self.parse_list_literal()?,
            Token::LeftBracket => self.parse_matrix_literal()?,
            Token::Function(func) => {
                let args = self.parse_args()?;
                Expr::Call(func, args)
            }
            _ => {
                self.idx = self.idx.saturating_sub(1);
                return Err(self.syntax());
            }
        };
        Ok(expr)
    }

    /// Element access after a list, matrix, or function-slot atom.
    fn maybe_index(&mut self, target: Expr) -> Result<Expr> {
        if self.peek() != &Token::LeftParen {
            return Ok(target);
        }
        self.bump();
        let mut indices: Vec<Expr> = Vec::new();
        loop {
            indices.push(self.parse_expr(0)?);
            match self.bump() {
                Token::Comma => continue,
                Token::RightParen => break,
                _ => return Err(self.syntax()),
            }
        }
        Ok(Expr::Index(Box::new(target), indices))
    }

    /// Arguments of a built-in call. The opening paren was consumed by
    /// the tokenizer; the closing paren may be dropped at end of input.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if matches!(self.peek(), Token::RightParen) {
            self.bump();
            return Ok(args);
        }
        if matches!(self.peek(), Token::Eof) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr(0)?);
            match self.peek() {
                Token::Comma => {
                    self.bump();
                }
                Token::RightParen => {
                    self.bump();
                    break;
                }
                Token::Eof => break,
                _ => return Err(self.syntax()),
            }
        }
        Ok(args)
    }

    /// `{e1, e2, ...}`; the closing brace may be dropped at end of input.
    fn parse_list_literal(&mut self) -> Result<Expr> {
        let mut elements = Vec::new();
        if matches!(self.peek(), Token::RightBrace) {
            self.bump();
            return Ok(Expr::ListLit(elements));
        }
        loop {
            elements.push(self.parse_expr(0)?);
            match self.peek() {
                Token::Comma => {
                    self.bump();
                }
                Token::RightBrace => {
                    self.bump();
                    break;
                }
                Token::Eof => break,
                _ => return Err(self.syntax()),
            }
        }
        Ok(Expr::ListLit(elements))
    }

    /// `[[a, b][c, d]]`, with an optional comma between rows. The
    /// leading outer bracket was consumed by the caller.
    fn parse_matrix_literal(&mut self) -> Result<Expr> {
        let mut rows = Vec::new();
        loop {
            match self.peek() {
                Token::LeftBracket => {
                    self.bump();
                    rows.push(self.parse_matrix_row()?);
                    if self.peek() == &Token::Comma {
                        self.bump();
                    }
                }
                Token::RightBracket => {
                    self.bump();
                    break;
                }
                Token::Eof => break,
                _ => return Err(self.syntax()),
            }
        }
        Ok(Expr::MatrixLit(rows))
    }

    fn parse_matrix_row(&mut self) -> Result<Vec<Expr>> {
        let mut row = Vec::new();
        loop {
            row.push(self.parse_expr(0)?);
            match self.bump() {
                Token::Comma => continue,
                Token::RightBracket => break,
                _ => return Err(self.syntax()),
            }
        }
        Ok(row)
    }
}
