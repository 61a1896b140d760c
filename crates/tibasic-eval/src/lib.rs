//! Calculator state and the tree-walking evaluator.
//!
//! [`State`] owns every named store (variables, lists, matrices,
//! strings, function slots, Ans, modes, window, history, programs,
//! RNG). [`evaluator::eval`] walks an AST against it;
//! [`evaluator::eval_slot`] is the `Y_i(x)` side entry used by element
//! access and plotting.

pub mod builtins;
pub mod evaluator;
pub mod modes;
pub mod state;

pub use evaluator::{eval, eval_slot};
pub use modes::{AngleMode, ComplexFormat, GraphMode, ModeSettings, NumberFormat, WindowParams};
pub use state::{FunctionSlot, HistoryEntry, Snapshot, State};
