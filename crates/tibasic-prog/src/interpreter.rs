//! Statement executor.
//!
//! Runs a parsed program with a program counter. Structured blocks
//! (If/Then/Else/End, For, While, Repeat) are executed by inner
//! drivers over the body's statement range; an unstructured Goto
//! simply repositions the counter, unwinding any loop frames it
//! escapes. Loop termination re-reads the counter variable from the
//! state each iteration, so a body may mutate its own counter.
//!
//! A cancel flag is consulted before every statement; setting it makes
//! the next check fail with Break.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tibasic_core::{CalcError, ErrorKind, Result, Value};
use tibasic_eval::{eval, State};
use tibasic_lang::ast::Expr;
use tibasic_lang::parser::parse_str;

use crate::io::HostIo;
use crate::statement::{parse_program, Program, Statement};

/// Subroutine nesting beyond this fails with MemoryFull.
const MAX_CALL_DEPTH: u32 = 64;

/// Where control goes after one statement.
enum Flow {
    /// Fall through to the next statement.
    Normal,
    /// Continue at the given statement index.
    Jump(usize),
    /// Past the end of the statement list.
    Halt,
}

pub struct Interpreter<'a> {
    state: &'a mut State,
    io: &'a mut dyn HostIo,
    cancel: Arc<AtomicBool>,
    depth: u32,
}

impl<'a> Interpreter<'a> {
    pub fn new(state: &'a mut State, io: &'a mut dyn HostIo) -> Self {
        Self::with_cancel(state, io, Arc::new(AtomicBool::new(false)))
    }

    /// Build an interpreter whose cancel flag the caller owns; setting
    /// the flag aborts the run with Break at the next statement.
    pub fn with_cancel(
        state: &'a mut State,
        io: &'a mut dyn HostIo,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            state,
            io,
            cancel,
            depth: 0,
        }
    }

    /// Parse and run program source.
    pub fn run(&mut self, source: &str) -> Result<()> {
        let program = parse_program(source)?;
        self.run_program(&program)
    }

    /// Run a stored program by name.
    pub fn run_named(&mut self, name: &str) -> Result<()> {
        let source = self.state.program(name)?;
        log::debug!("running prgm{name}");
        self.run(&source)
    }

    fn run_program(&mut self, program: &Program) -> Result<()> {
        self.exec_range(program, 0, program.len())?;
        Ok(())
    }

    fn check_cancel(&self) -> Result<()> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(ErrorKind::Break.into());
        }
        Ok(())
    }

    /// Drive statements in [start, end). Jumps inside the range move
    /// the counter; a jump to the range end finishes it normally; any
    /// other jump unwinds to an enclosing driver.
    fn exec_range(&mut self, program: &Program, start: usize, end: usize) -> Result<Flow> {
        let mut pc = start;
        while pc < end {
            self.check_cancel()?;
            match self.exec_statement(program, pc)? {
                Flow::Normal => pc += 1,
                Flow::Jump(target) if (start..end).contains(&target) => pc = target,
                Flow::Jump(target) if target == end => pc = end,
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_statement(&mut self, program: &Program, pc: usize) -> Result<Flow> {
        let statement = &program.statements[pc];
        log::trace!("pc {pc}: {statement:?}");
        match statement {
            Statement::Expression(text) => {
                let value = self.eval_text(text)?;
                self.state.set_ans(value);
                Ok(Flow::Normal)
            }
            Statement::Display(args) => {
                for arg in args {
                    let text = self.eval_display_text(arg)?;
                    self.io.display(&text);
                }
                Ok(Flow::Normal)
            }
            Statement::Output(row, col, expr) => {
                let row = self.eval_int(row)?;
                let col = self.eval_int(col)?;
                let text = self.eval_display_text(expr)?;
                self.io.output(row, col, &text);
                Ok(Flow::Normal)
            }
            Statement::Input(prompt, var) => {
                let entered = self.io.input(prompt.as_deref());
                self.check_cancel()?;
                self.store_input(&entered, var)?;
                Ok(Flow::Normal)
            }
            Statement::Prompt(vars) => {
                for var in vars {
                    let entered = self.io.input(Some(&format!("{var}=?")));
                    self.check_cancel()?;
                    self.store_input(&entered, var)?;
                }
                Ok(Flow::Normal)
            }
            Statement::ClrHome => {
                self.io.clear_home();
                Ok(Flow::Normal)
            }

            Statement::If(cond) => self.exec_if(program, pc, cond),
            Statement::Then => Ok(Flow::Normal),
            Statement::Else => {
                // Reached after a taken Then branch: skip to the End.
                let end = find_block_end(program, pc + 1);
                Ok(Flow::Jump(end + 1))
            }
            Statement::End => Ok(Flow::Normal),

            Statement::For(var, start, end, step) => {
                self.exec_for(program, pc, var, start, end, step.as_deref())
            }
            Statement::While(cond) => self.exec_while(program, pc, cond),
            Statement::Repeat(cond) => self.exec_repeat(program, pc, cond),

            Statement::Label(_) => Ok(Flow::Normal),
            Statement::Goto(name) => self.goto(program, name),
            Statement::Menu(title, options) => {
                let target = self.io.show_menu(title, options);
                self.check_cancel()?;
                self.goto(program, &target)
            }
            Statement::Stop | Statement::Return => Ok(Flow::Halt),
            Statement::Pause(expr) => {
                match expr {
                    Some(text) => {
                        let shown = self.eval_display_text(text)?;
                        self.io.pause(Some(&shown));
                    }
                    None => self.io.pause(None),
                }
                self.check_cancel()?;
                Ok(Flow::Normal)
            }
            Statement::GetKey(var) => {
                let key = self.io.get_key();
                self.check_cancel()?;
                let target = parse_str(var)?;
                eval(
                    self.state,
                    &Expr::store(Expr::Number(key as f64), target),
                )?;
                Ok(Flow::Normal)
            }
            Statement::ProgramCall(name) => {
                if self.depth >= MAX_CALL_DEPTH {
                    return Err(ErrorKind::MemoryFull.into());
                }
                let source = self.state.program(name)?;
                log::debug!("calling prgm{name} at depth {}", self.depth + 1);
                let called = parse_program(&source)?;
                self.depth += 1;
                let result = self.run_program(&called);
                self.depth -= 1;
                result?;
                Ok(Flow::Normal)
            }

            Statement::Line(x1, y1, x2, y2) => {
                let (x1, y1) = (self.eval_number(x1)?, self.eval_number(y1)?);
                let (x2, y2) = (self.eval_number(x2)?, self.eval_number(y2)?);
                self.io.draw_line(x1, y1, x2, y2);
                Ok(Flow::Normal)
            }
            Statement::Circle(x, y, r) => {
                let (x, y, r) = (
                    self.eval_number(x)?,
                    self.eval_number(y)?,
                    self.eval_number(r)?,
                );
                self.io.draw_circle(x, y, r);
                Ok(Flow::Normal)
            }
            Statement::Text(row, col, expr) => {
                let row = self.eval_int(row)?;
                let col = self.eval_int(col)?;
                let text = self.eval_display_text(expr)?;
                self.io.draw_text(row, col, &text);
                Ok(Flow::Normal)
            }
            Statement::PtOn(x, y) => {
                let (x, y) = (self.eval_number(x)?, self.eval_number(y)?);
                self.io.plot_point(x, y, true);
                Ok(Flow::Normal)
            }
            Statement::PtOff(x, y) => {
                let (x, y) = (self.eval_number(x)?, self.eval_number(y)?);
                self.io.plot_point(x, y, false);
                Ok(Flow::Normal)
            }
            Statement::ClrDraw => {
                self.io.clear_draw();
                Ok(Flow::Normal)
            }

            Statement::DelVar(var) => {
                match parse_str(var)? {
                    Expr::Var(name) => self.state.delete_var(name),
                    Expr::ListVar(name) => self.state.clear_list(&name),
                    _ => return Err(ErrorKind::Syntax.into()),
                }
                Ok(Flow::Normal)
            }
            Statement::ClrList(names) => {
                for name in names {
                    match parse_str(name)? {
                        Expr::ListVar(name) => self.state.clear_list(&name),
                        _ => return Err(ErrorKind::Syntax.into()),
                    }
                }
                Ok(Flow::Normal)
            }
            Statement::StoredExpression(text, slot) => {
                self.state.set_slot(*slot, text.clone());
                Ok(Flow::Normal)
            }
        }
    }

    // --- structured blocks ---

    fn exec_if(&mut self, program: &Program, pc: usize, cond: &str) -> Result<Flow> {
        let taken = self.eval_number(cond)? != 0.0;
        let block_form = matches!(program.statements.get(pc + 1), Some(Statement::Then));
        if taken {
            // Fall through; a following Then is a no-op.
            return Ok(Flow::Normal);
        }
        if !block_form {
            // Single-statement form: skip just the next statement.
            return Ok(Flow::Jump(pc + 2));
        }
        // Skip to the matching Else (branch target) or past the End.
        let mut depth = 0usize;
        let mut i = pc + 2;
        while i < program.len() {
            match &program.statements[i] {
                Statement::Then
                | Statement::For(..)
                | Statement::While(_)
                | Statement::Repeat(_) => depth += 1,
                Statement::Else if depth == 0 => return Ok(Flow::Jump(i + 1)),
                Statement::End => {
                    if depth == 0 {
                        return Ok(Flow::Jump(i + 1));
                    }
                    depth -= 1;
                }
                _ => {}
            }
            i += 1;
        }
        Ok(Flow::Jump(program.len()))
    }

    fn exec_for(
        &mut self,
        program: &Program,
        pc: usize,
        var: &str,
        start: &str,
        end: &str,
        step: Option<&str>,
    ) -> Result<Flow> {
        let Expr::Var(name) = parse_str(var)? else {
            return Err(ErrorKind::Syntax.into());
        };
        let start = self.eval_number(start)?;
        let end = self.eval_number(end)?;
        let step = match step {
            Some(text) => self.eval_number(text)?,
            None => 1.0,
        };
        let body_end = find_block_end(program, pc + 1);

        self.state.set_var(name, Value::Real(start));
        loop {
            self.check_cancel()?;
            // Read back each iteration: the body may move the counter.
            let current = self
                .state
                .var(name)
                .as_real()
                .ok_or(ErrorKind::DataType)?;
            if (step > 0.0 && current > end) || (step < 0.0 && current < end) {
                break;
            }
            match self.exec_range(program, pc + 1, body_end)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
            let current = self
                .state
                .var(name)
                .as_real()
                .ok_or(ErrorKind::DataType)?;
            self.state.set_var(name, Value::Real(current + step));
        }
        Ok(Flow::Jump(body_end + 1))
    }

    fn exec_while(&mut self, program: &Program, pc: usize, cond: &str) -> Result<Flow> {
        let body_end = find_block_end(program, pc + 1);
        loop {
            self.check_cancel()?;
            if self.eval_number(cond)? == 0.0 {
                break;
            }
            match self.exec_range(program, pc + 1, body_end)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Jump(body_end + 1))
    }

    fn exec_repeat(&mut self, program: &Program, pc: usize, cond: &str) -> Result<Flow> {
        let body_end = find_block_end(program, pc + 1);
        loop {
            self.check_cancel()?;
            match self.exec_range(program, pc + 1, body_end)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
            // Post-test, inverted from While: stop once true.
            if self.eval_number(cond)? != 0.0 {
                break;
            }
        }
        Ok(Flow::Jump(body_end + 1))
    }

    fn goto(&mut self, program: &Program, name: &str) -> Result<Flow> {
        match program.labels.get(name) {
            Some(&index) => Ok(Flow::Jump(index)),
            None => Err(CalcError::new(ErrorKind::LabelNotFound(name.to_string()))),
        }
    }

    // --- expression plumbing ---

    fn eval_text(&mut self, text: &str) -> Result<Value> {
        let expr = parse_str(text)?;
        eval(self.state, &expr)
    }

    fn eval_number(&mut self, text: &str) -> Result<f64> {
        self.eval_text(text)?
            .as_real()
            .ok_or_else(|| ErrorKind::DataType.into())
    }

    fn eval_int(&mut self, text: &str) -> Result<i64> {
        self.eval_text(text)?
            .as_int()
            .ok_or_else(|| ErrorKind::DataType.into())
    }

    fn eval_display_text(&mut self, text: &str) -> Result<String> {
        Ok(format_value(&self.eval_text(text)?))
    }

    /// Store entered text into an Input/Prompt target. String variables
    /// take the raw text; everything else evaluates it.
    fn store_input(&mut self, entered: &str, var: &str) -> Result<()> {
        let target = parse_str(var)?;
        if let Expr::StrVar(index) = target {
            self.state.set_string_var(index, entered.to_string());
            return Ok(());
        }
        let value_expr = parse_str(entered)?;
        eval(self.state, &Expr::store(value_expr, target))?;
        Ok(())
    }
}

/// Index of the End closing the block whose body starts at `from`
/// (program length when unterminated).
fn find_block_end(program: &Program, from: usize) -> usize {
    let mut depth = 0usize;
    let mut i = from;
    while i < program.len() {
        match &program.statements[i] {
            Statement::Then
            | Statement::For(..)
            | Statement::While(_)
            | Statement::Repeat(_) => depth += 1,
            Statement::End => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            _ => {}
        }
        i += 1;
    }
    program.len()
}

/// Render a value for Disp/Output. Real display formatting policy
/// lives with the embedder; this is the plain form.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Real(v) => format_real(*v),
        Value::Complex(re, im) => {
            if *im < 0.0 {
                format!("{}-{}i", format_real(*re), format_real(-im))
            } else {
                format!("{}+{}i", format_real(*re), format_real(*im))
            }
        }
        Value::List(v) => {
            let body: Vec<String> = v.iter().map(|x| format_real(*x)).collect();
            format!("{{{}}}", body.join(","))
        }
        Value::ComplexList(v) => {
            let body: Vec<String> = v
                .iter()
                .map(|(re, im)| format_value(&Value::Complex(*re, *im)))
                .collect();
            format!("{{{}}}", body.join(","))
        }
        Value::Matrix(rows) => {
            let body: Vec<String> = rows
                .iter()
                .map(|row| {
                    let cells: Vec<String> = row.iter().map(|x| format_real(*x)).collect();
                    format!("[{}]", cells.join(","))
                })
                .collect();
            format!("[{}]", body.join(""))
        }
        Value::Str(s) => s.clone(),
    }
}

fn format_real(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
