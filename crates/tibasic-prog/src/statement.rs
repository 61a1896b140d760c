//! Program text → typed statements.
//!
//! A program is split on newlines, then on `:` within each line
//! (string literals shield both), and each non-empty part is matched
//! against the statement grammar: prefix keywords (`If`, `Goto`,
//! `Disp`, ...), parenthesized forms (`For(`, `Output(`, `Menu(`,
//! ...), and slot stores (`"expr"→Y1`). Anything else is a bare
//! expression statement. Labels are indexed after parsing.

use std::collections::HashMap;

use tibasic_core::{CalcError, ErrorKind, Result};

/// One program statement. Argument expressions stay as text and are
/// parsed when executed.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// A bare expression; its value becomes Ans.
    Expression(String),
    /// `Disp` with zero or more arguments.
    Display(Vec<String>),
    /// `Output(row, col, expr)`.
    Output(String, String, String),
    /// `Input ["prompt",] var`.
    Input(Option<String>, String),
    /// `Prompt var[, var...]`.
    Prompt(Vec<String>),
    ClrHome,
    If(String),
    Then,
    Else,
    End,
    /// `For(var, start, end[, step])`.
    For(String, String, String, Option<String>),
    While(String),
    Repeat(String),
    Label(String),
    Goto(String),
    /// `Menu("title", "choice", label, ...)`.
    Menu(String, Vec<(String, String)>),
    Stop,
    Return,
    /// `Pause [expr]`.
    Pause(Option<String>),
    /// `getKey→var`.
    GetKey(String),
    /// `prgmNAME`.
    ProgramCall(String),
    Line(String, String, String, String),
    Circle(String, String, String),
    Text(String, String, String),
    PtOn(String, String),
    PtOff(String, String),
    ClrDraw,
    DelVar(String),
    ClrList(Vec<String>),
    /// `"expr"→Yn`: store raw text into a function slot.
    StoredExpression(String, u8),
}

/// A parsed program: flat statements plus the label index.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub labels: HashMap<String, usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Parse a program source into statements and the label index.
pub fn parse_program(source: &str) -> Result<Program> {
    let mut statements = Vec::new();
    for line in source.lines() {
        for part in split_statements(line) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            statements.push(parse_statement(part)?);
        }
    }

    let mut labels = HashMap::new();
    for (index, statement) in statements.iter().enumerate() {
        if let Statement::Label(name) = statement {
            // First occurrence wins, matching hardware behavior.
            labels.entry(name.clone()).or_insert(index);
        }
    }

    Ok(Program { statements, labels })
}

/// Split one line on `:`, shielding string literals.
fn split_statements(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    for c in line.chars() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            ':' if !in_string => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Split on top-level commas: paren depth and string state shield.
fn split_args(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_string = false;
    for c in text.chars() {
        match c {
            '"' => {
                in_string = !in_string;
                current.push(c);
            }
            '(' | '[' | '{' if !in_string => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' if !in_string => {
                depth -= 1;
                current.push(c);
            }
            ',' if !in_string && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts.into_iter().map(|p| p.trim().to_string()).collect()
}

/// Arguments of a parenthesized form: strip the optional trailing `)`
/// and split.
fn paren_args(rest: &str) -> Vec<String> {
    let rest = rest.strip_suffix(')').unwrap_or(rest);
    split_args(rest)
}

fn syntax() -> CalcError {
    CalcError::new(ErrorKind::Syntax)
}

fn parse_statement(part: &str) -> Result<Statement> {
    // Exact keywords first.
    match part {
        "Then" => return Ok(Statement::Then),
        "Else" => return Ok(Statement::Else),
        "End" => return Ok(Statement::End),
        "Stop" => return Ok(Statement::Stop),
        "Return" => return Ok(Statement::Return),
        "ClrHome" => return Ok(Statement::ClrHome),
        "ClrDraw" => return Ok(Statement::ClrDraw),
        "Pause" => return Ok(Statement::Pause(None)),
        _ => {}
    }

    // Prefix keyword forms.
    if let Some(rest) = part.strip_prefix("If ") {
        return Ok(Statement::If(rest.trim().to_string()));
    }
    if let Some(rest) = part.strip_prefix("While ") {
        return Ok(Statement::While(rest.trim().to_string()));
    }
    if let Some(rest) = part.strip_prefix("Repeat ") {
        return Ok(Statement::Repeat(rest.trim().to_string()));
    }
    if let Some(rest) = part.strip_prefix("Lbl ") {
        return Ok(Statement::Label(rest.trim().to_string()));
    }
    if let Some(rest) = part.strip_prefix("Goto ") {
        return Ok(Statement::Goto(rest.trim().to_string()));
    }
    if part == "Disp" {
        return Ok(Statement::Display(Vec::new()));
    }
    if let Some(rest) = part.strip_prefix("Disp ") {
        return Ok(Statement::Display(split_args(rest.trim())));
    }
    if let Some(rest) = part.strip_prefix("Prompt ") {
        return Ok(Statement::Prompt(split_args(rest.trim())));
    }
    if let Some(rest) = part.strip_prefix("Input") {
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(syntax());
        }
        if rest.starts_with('"') {
            let args = split_args(rest);
            if args.len() != 2 {
                return Err(syntax());
            }
            let prompt = args[0]
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .ok_or_else(syntax)?;
            return Ok(Statement::Input(
                Some(prompt.to_string()),
                args[1].clone(),
            ));
        }
        return Ok(Statement::Input(None, rest.to_string()));
    }
    if let Some(rest) = part.strip_prefix("Pause ") {
        return Ok(Statement::Pause(Some(rest.trim().to_string())));
    }
    if let Some(rest) = part.strip_prefix("prgm") {
        let name = rest.trim();
        if name.is_empty() {
            return Err(syntax());
        }
        return Ok(Statement::ProgramCall(name.to_string()));
    }
    if let Some(rest) = part.strip_prefix("DelVar ") {
        return Ok(Statement::DelVar(rest.trim().to_string()));
    }
    if let Some(rest) = part.strip_prefix("ClrList ") {
        return Ok(Statement::ClrList(split_args(rest.trim())));
    }
    if let Some(rest) = part.strip_prefix("getKey") {
        let rest = rest.trim();
        if let Some(var) = rest.strip_prefix('→').or_else(|| rest.strip_prefix('⇒')) {
            return Ok(Statement::GetKey(var.trim().to_string()));
        }
        return Err(syntax());
    }

    // Parenthesized forms.
    if let Some(rest) = part.strip_prefix("For(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [var, start, end] => Ok(Statement::For(
                var.clone(),
                start.clone(),
                end.clone(),
                None,
            )),
            [var, start, end, step] => Ok(Statement::For(
                var.clone(),
                start.clone(),
                end.clone(),
                Some(step.clone()),
            )),
            _ => Err(syntax()),
        };
    }
    if let Some(rest) = part.strip_prefix("Output(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [row, col, expr] => Ok(Statement::Output(row.clone(), col.clone(), expr.clone())),
            _ => Err(syntax()),
        };
    }
    if let Some(rest) = part.strip_prefix("Menu(") {
        let args = paren_args(rest);
        // Title plus (choice, label) pairs: the count must be odd.
        if args.len() < 3 || args.len() % 2 == 0 {
            return Err(syntax());
        }
        let title = strip_quotes(&args[0]);
        let options = args[1..]
            .chunks(2)
            .map(|pair| (strip_quotes(&pair[0]), pair[1].clone()))
            .collect();
        return Ok(Statement::Menu(title, options));
    }
    if let Some(rest) = part.strip_prefix("Line(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [x1, y1, x2, y2] => Ok(Statement::Line(
                x1.clone(),
                y1.clone(),
                x2.clone(),
                y2.clone(),
            )),
            _ => Err(syntax()),
        };
    }
    if let Some(rest) = part.strip_prefix("Circle(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [x, y, r] => Ok(Statement::Circle(x.clone(), y.clone(), r.clone())),
            _ => Err(syntax()),
        };
    }
    if let Some(rest) = part.strip_prefix("Text(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [row, col, text] => Ok(Statement::Text(row.clone(), col.clone(), text.clone())),
            _ => Err(syntax()),
        };
    }
    if let Some(rest) = part.strip_prefix("Pt-On(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [x, y] => Ok(Statement::PtOn(x.clone(), y.clone())),
            _ => Err(syntax()),
        };
    }
    if let Some(rest) = part.strip_prefix("Pt-Off(") {
        let args = paren_args(rest);
        return match args.as_slice() {
            [x, y] => Ok(Statement::PtOff(x.clone(), y.clone())),
            _ => Err(syntax()),
        };
    }

    // `"expr"→Yn` stores text into a function slot.
    if let Some((lhs, slot)) = match_slot_store(part) {
        return Ok(Statement::StoredExpression(lhs, slot));
    }

    // Everything else is an expression statement.
    Ok(Statement::Expression(part.to_string()))
}

fn strip_quotes(text: &str) -> String {
    text.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text)
        .to_string()
}

/// Match `"..." → Y<digit>` with the arrow outside any string.
fn match_slot_store(part: &str) -> Option<(String, u8)> {
    let mut in_string = false;
    let mut arrow = None;
    for (i, c) in part.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '→' | '⇒' if !in_string => arrow = Some((i, c.len_utf8())),
            _ => {}
        }
    }
    let (at, width) = arrow?;
    let target = part[at + width..].trim();
    let digit = target.strip_prefix('Y')?;
    if digit.len() != 1 || !digit.as_bytes()[0].is_ascii_digit() {
        return None;
    }
    let lhs = part[..at].trim();
    let body = lhs.strip_prefix('"')?.strip_suffix('"')?;
    Some((body.to_string(), digit.as_bytes()[0] - b'0'))
}
