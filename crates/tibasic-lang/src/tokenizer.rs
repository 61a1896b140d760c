//! Expression tokenizer.
//!
//! Turns keypad text into a positioned token stream, handling the two
//! context-sensitive rules of the input language:
//! - implicit multiplication between adjacent value tokens (`2(3)`,
//!   `6/2(1+2)`, `2πR`), inserted while scanning;
//! - negation versus subtraction for `-`, rewritten in a post-pass over
//!   the finished stream based on each minus's predecessor.
//!
//! The stream always ends in exactly one Eof token at the input length.

use tibasic_core::{CalcError, ErrorKind, Pos, Result};

use crate::builtins::Func;
use crate::token::{SpannedToken, Token};

/// Superscript minus, the dedicated negation glyph.
const NEG_GLYPH: char = '⁻';
/// Calculator exponent marker (small-caps E).
const EXP_GLYPH: char = 'ᴇ';
/// User list-name prefix.
const LIST_GLYPH: char = 'ʟ';
/// Store arrow and its alternate form.
const STORE_GLYPHS: [char; 2] = ['→', '⇒'];

pub struct Tokenizer<'a> {
    src: &'a str,
    /// (byte offset, char) pairs; scanning is index-based over this.
    chars: Vec<(usize, char)>,
    idx: usize,
    tokens: Vec<SpannedToken>,
}

/// Tokenize an expression into a stream terminated by Eof.
pub fn tokenize(src: &str) -> Result<Vec<SpannedToken>> {
    Tokenizer::new(src).run()
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().collect(),
            idx: 0,
            tokens: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<Vec<SpannedToken>> {
        while let Some(c) = self.skip_whitespace() {
            let pos = self.pos();
            if self.needs_implicit_mul(c) {
                self.tokens.push(SpannedToken::new(Token::ImplicitMul, pos));
            }
            let token = self.scan_token(c)?;
            self.tokens.push(SpannedToken::new(token, pos));
        }
        self.tokens.push(SpannedToken::new(
            Token::Eof,
            Pos::new(self.src.len() as u32),
        ));
        resolve_negation(&mut self.tokens);
        Ok(self.tokens)
    }

    fn pos(&self) -> Pos {
        let offset = self
            .chars
            .get(self.idx)
            .map(|(o, _)| *o)
            .unwrap_or(self.src.len());
        Pos::new(offset as u32)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).map(|(_, c)| *c)
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.idx + ahead).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        Some(c)
    }

    /// Skip whitespace and return the next significant character.
    /// Whitespace never suppresses implicit multiplication.
    fn skip_whitespace(&mut self) -> Option<char> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.idx += 1;
            } else {
                return Some(c);
            }
        }
        None
    }

    /// Whether the previous token ends a value and the upcoming
    /// character starts one, requiring an inserted multiplication.
    /// Spelled-out operator words (`and`, `or`, `nPr`, ...) begin with
    /// letters but are not values, so they never trigger insertion.
    fn needs_implicit_mul(&self, next: char) -> bool {
        let Some(prev) = self.tokens.last() else {
            return false;
        };
        prev.token.ends_value() && begins_value(next) && !self.at_keyword_word()
    }

    /// Lookahead: does an operator keyword start at the current position?
    fn at_keyword_word(&self) -> bool {
        let word: String = self.chars[self.idx..]
            .iter()
            .map(|(_, c)| *c)
            .take_while(|c| is_word_char(*c))
            .collect();
        matches!(word.as_str(), "and" | "or" | "xor" | "not" | "nPr" | "nCr")
    }

    fn syntax(&self) -> CalcError {
        CalcError::new(ErrorKind::Syntax).at(self.pos())
    }

    fn scan_token(&mut self, c: char) -> Result<Token> {
        if c.is_ascii_digit() || c == '.' {
            return self.scan_number();
        }
        if c == '"' {
            return Ok(self.scan_string());
        }
        if c == LIST_GLYPH {
            return self.scan_user_list();
        }
        if c.is_alphabetic() && !matches!(c, 'π' | 'ℯ') {
            return self.scan_word();
        }

        self.idx += 1;
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' | '×' => Token::Multiply,
            '/' | '÷' => Token::Divide,
            '^' => Token::Power,
            '!' => Token::Factorial,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            ',' => Token::Comma,
            '=' => Token::Eq,
            '≠' => Token::Ne,
            '≤' => Token::Le,
            '≥' => Token::Ge,
            'π' => Token::Pi,
            'ℯ' => Token::EulerE,
            '²' => Token::Square,
            '°' => Token::DegreeMark,
            '<' => {
                if self.peek() == Some('=') {
                    self.idx += 1;
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.idx += 1;
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            NEG_GLYPH => {
                if self.peek() == Some('¹') {
                    self.idx += 1;
                    Token::Inverse
                } else {
                    Token::Negate
                }
            }
            '³' => {
                // ³√( is the cube-root function; bare ³ is the cube postfix.
                if self.peek() == Some('√') {
                    self.idx += 1;
                    self.eat_paren();
                    Token::Function(Func::Cbrt)
                } else {
                    Token::Cube
                }
            }
            '√' => {
                self.eat_paren();
                Token::Function(Func::Sqrt)
            }
            '[' => return self.scan_bracket(),
            c if STORE_GLYPHS.contains(&c) => Token::Store,
            _ => {
                self.idx -= 1;
                return Err(self.syntax());
            }
        };
        Ok(token)
    }

    /// Consume a `(` if present (function spellings carry their paren).
    fn eat_paren(&mut self) {
        if self.peek() == Some('(') {
            self.idx += 1;
        }
    }

    /// `[` introduces either a matrix name (`[A]`) or a matrix literal.
    /// The caller has already consumed the bracket.
    fn scan_bracket(&mut self) -> Result<Token> {
        if let Some(c) = self.peek()
            && c.is_ascii_uppercase()
        {
            self.idx += 1;
            if self.bump() != Some(']') {
                return Err(self.syntax());
            }
            return Ok(Token::MatrixName(c));
        }
        Ok(Token::LeftBracket)
    }

    /// Number: digits, optional fraction, optional exponent. The
    /// exponent marker is `E` or the dedicated glyph, with an optional
    /// sign (either minus form).
    fn scan_number(&mut self) -> Result<Token> {
        let mut text = String::new();
        let mut saw_digit = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                saw_digit = true;
                text.push(c);
                self.idx += 1;
            } else {
                break;
            }
        }
        if self.peek() == Some('.') {
            text.push('.');
            self.idx += 1;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    saw_digit = true;
                    text.push(c);
                    self.idx += 1;
                } else {
                    break;
                }
            }
        }
        if !saw_digit {
            return Err(self.syntax());
        }

        if matches!(self.peek(), Some('E') | Some(EXP_GLYPH)) {
            // Only take the marker when an exponent actually follows.
            let mut ahead = 1;
            if matches!(self.peek_at(1), Some('-') | Some('+') | Some(NEG_GLYPH)) {
                ahead = 2;
            }
            if self.peek_at(ahead).is_some_and(|c| c.is_ascii_digit()) {
                self.idx += 1;
                text.push('E');
                if let Some(sign) = self.peek()
                    && matches!(sign, '-' | '+' | NEG_GLYPH)
                {
                    self.idx += 1;
                    text.push(if sign == NEG_GLYPH { '-' } else { sign });
                }
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.idx += 1;
                    } else {
                        break;
                    }
                }
            }
        }

        match text.parse::<f64>() {
            Ok(v) => Ok(Token::Number(v)),
            Err(_) => Err(self.syntax()),
        }
    }

    /// String literal: everything through the next quote (or end of
    /// input). The closing quote is consumed when present.
    fn scan_string(&mut self) -> Token {
        self.idx += 1;
        let mut body = String::new();
        while let Some(c) = self.bump() {
            if c == '"' {
                break;
            }
            body.push(c);
        }
        Token::Str(body)
    }

    /// User list name: the list glyph followed by up to five
    /// alphanumeric characters.
    fn scan_user_list(&mut self) -> Result<Token> {
        self.idx += 1;
        let mut name = String::new();
        while name.chars().count() < 5 {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() => {
                    name.push(c);
                    self.idx += 1;
                }
                _ => break,
            }
        }
        if name.is_empty() {
            return Err(self.syntax());
        }
        Ok(Token::ListName(name))
    }

    /// Identifier word: a maximal run of letters and digits plus the
    /// superscript characters used in inverse-function spellings.
    fn scan_word(&mut self) -> Result<Token> {
        let start = self.idx;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if is_word_char(c) {
                word.push(c);
                self.idx += 1;
            } else {
                break;
            }
        }

        // Keywords, operators-as-words, and named constants.
        match word.as_str() {
            "and" => return Ok(Token::And),
            "or" => return Ok(Token::Or),
            "xor" => return Ok(Token::Xor),
            "not" => return Ok(Token::Not),
            "nPr" => return Ok(Token::Npr),
            "nCr" => return Ok(Token::Ncr),
            "Ans" => return Ok(Token::Ans),
            "rand" => return Ok(Token::Rand),
            "pi" => return Ok(Token::Pi),
            "e" => return Ok(Token::EulerE),
            "i" => return Ok(Token::ImaginaryI),
            _ => {}
        }

        // Built-in list, slot, and string-variable names.
        if let Some(rest) = word.strip_prefix('L')
            && rest.len() == 1
            && matches!(rest.as_bytes()[0], b'1'..=b'6')
        {
            return Ok(Token::ListName(word));
        }
        if let Some(rest) = word.strip_prefix('Y')
            && rest.len() == 1
            && rest.as_bytes()[0].is_ascii_digit()
        {
            return Ok(Token::FunctionSlot(rest.as_bytes()[0] - b'0'));
        }
        if let Some(rest) = word.strip_prefix("Str")
            && rest.len() == 1
            && rest.as_bytes()[0].is_ascii_digit()
        {
            return Ok(Token::StringVar(rest.as_bytes()[0] - b'0'));
        }

        // Function spellings consume their opening paren.
        if let Some(func) = Func::from_word(&word) {
            self.eat_paren();
            return Ok(Token::Function(func));
        }

        let mut letters = word.chars();
        let first = letters.next().unwrap_or('\0');
        if letters.next().is_none() {
            if first.is_ascii_uppercase() || first == 'θ' {
                return Ok(Token::Variable(first));
            }
            return Err(self.syntax_at(start));
        }

        // Unknown multi-letter word: take just the first letter as a
        // variable and rescan the rest, so `AB` becomes A·B.
        if first.is_ascii_uppercase() {
            self.idx = start + 1;
            return Ok(Token::Variable(first));
        }
        Err(self.syntax_at(start))
    }

    fn syntax_at(&self, char_idx: usize) -> CalcError {
        let offset = self
            .chars
            .get(char_idx)
            .map(|(o, _)| *o)
            .unwrap_or(self.src.len());
        CalcError::new(ErrorKind::Syntax).at(Pos::new(offset as u32))
    }
}

/// Characters that may continue an identifier word.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == 'θ' || c == NEG_GLYPH || c == '¹'
}

/// Whether a character can begin a value token: digit, point, an open
/// grouping, the root glyph, or any letter other than the exponent
/// markers (π, θ, ℯ, and the list prefix are all letters).
fn begins_value(c: char) -> bool {
    c.is_ascii_digit()
        || matches!(c, '.' | '(' | '[' | '{' | '√')
        || (c.is_alphabetic() && c != 'E' && c != EXP_GLYPH)
}

/// Post-pass: rewrite `-` to negation unless its predecessor ends a
/// value (number, closing grouping, variable-like, or postfix).
fn resolve_negation(tokens: &mut [SpannedToken]) {
    for i in 0..tokens.len() {
        if tokens[i].token != Token::Minus {
            continue;
        }
        let negate = match i.checked_sub(1) {
            None => true,
            Some(p) => !tokens[p].token.ends_value(),
        };
        if negate {
            tokens[i].token = Token::Negate;
        }
    }
}
