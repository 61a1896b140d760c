//! The calculator's procedural language: statement parsing and the
//! program interpreter.
//!
//! Programs are parsed into flat [`Statement`] lists with a label
//! index, then executed by [`Interpreter`] against a `State`. All
//! screen/keyboard work goes through the [`HostIo`] capability;
//! [`SilentIo`] is the no-op default.

pub mod interpreter;
pub mod io;
pub mod statement;

pub use interpreter::{format_value, Interpreter};
pub use io::{HostIo, SilentIo};
pub use statement::{parse_program, Program, Statement};
