//! The calculator's named stores.
//!
//! One `State` holds everything an evaluation can read or write:
//! scalar variables, lists, matrices, string variables, the ten
//! function slots, Ans, modes, the graph window, history, stored
//! programs, and the random-number generator. Constructed once and
//! mutated by the evaluator and interpreter; callers serialize access.
//!
//! Reads of unset scalars return 0; reads of unset lists, matrices,
//! strings, slots, and programs fail with Undefined.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tibasic_core::{ErrorKind, Result, Value};

use crate::modes::{ModeSettings, WindowParams};

/// LCG multiplier (MINSTD).
const LCG_A: i64 = 48271;
/// LCG modulus, 2³¹ − 1.
const LCG_M: i64 = 2_147_483_647;
/// Seed installed on construction and by `0→rand`.
const DEFAULT_SEED: i64 = 12345;
/// History entries beyond this are dropped, oldest first.
const HISTORY_LIMIT: usize = 50;

/// One function slot: the stored expression text and its plot flag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionSlot {
    pub text: String,
    pub enabled: bool,
}

/// One expression/result pair from the home screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub input: String,
    pub result: Value,
}

/// The process-wide calculator state.
#[derive(Clone, Debug)]
pub struct State {
    vars: HashMap<char, Value>,
    lists: HashMap<String, Vec<f64>>,
    matrices: HashMap<char, Vec<Vec<f64>>>,
    strings: HashMap<u8, String>,
    slots: [FunctionSlot; 10],
    ans: Value,
    modes: ModeSettings,
    window: WindowParams,
    history: Vec<HistoryEntry>,
    programs: HashMap<String, String>,
    rng_seed: i64,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            lists: HashMap::new(),
            matrices: HashMap::new(),
            strings: HashMap::new(),
            slots: Default::default(),
            ans: Value::Real(0.0),
            modes: ModeSettings::default(),
            window: WindowParams::default(),
            history: Vec::new(),
            programs: HashMap::new(),
            rng_seed: DEFAULT_SEED,
        }
    }

    // --- scalar variables ---

    /// Read a variable; unset variables read as 0.
    pub fn var(&self, name: char) -> Value {
        self.vars.get(&name).cloned().unwrap_or(Value::Real(0.0))
    }

    pub fn set_var(&mut self, name: char, value: Value) {
        self.vars.insert(name, value);
    }

    /// Remove a variable, returning its store to the unset default.
    pub fn delete_var(&mut self, name: char) {
        self.vars.remove(&name);
    }

    // --- lists ---

    pub fn list(&self, name: &str) -> Result<Vec<f64>> {
        self.lists
            .get(name)
            .cloned()
            .ok_or_else(|| ErrorKind::Undefined.into())
    }

    pub fn set_list(&mut self, name: &str, values: Vec<f64>) {
        self.lists.insert(name.to_string(), values);
    }

    pub fn clear_list(&mut self, name: &str) {
        self.lists.remove(name);
    }

    /// Write one 1-indexed element, zero-padding the list out to the
    /// index when it is past the end.
    pub fn set_list_element(&mut self, name: &str, index: i64, value: f64) -> Result<()> {
        if index < 1 {
            return Err(ErrorKind::InvalidDim.into());
        }
        let list = self.lists.entry(name.to_string()).or_default();
        let index = index as usize;
        if list.len() < index {
            list.resize(index, 0.0);
        }
        list[index - 1] = value;
        Ok(())
    }

    // --- matrices ---

    pub fn matrix(&self, name: char) -> Result<Vec<Vec<f64>>> {
        self.matrices
            .get(&name)
            .cloned()
            .ok_or_else(|| ErrorKind::Undefined.into())
    }

    pub fn set_matrix(&mut self, name: char, rows: Vec<Vec<f64>>) {
        self.matrices.insert(name, rows);
    }

    /// Write one 1-indexed element; the index must be in range.
    pub fn set_matrix_element(&mut self, name: char, row: i64, col: i64, value: f64) -> Result<()> {
        let matrix = self
            .matrices
            .get_mut(&name)
            .ok_or(ErrorKind::Undefined)?;
        if row < 1 || col < 1 {
            return Err(ErrorKind::InvalidDim.into());
        }
        let (r, c) = (row as usize - 1, col as usize - 1);
        match matrix.get_mut(r).and_then(|row| row.get_mut(c)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(ErrorKind::InvalidDim.into()),
        }
    }

    // --- string variables ---

    pub fn string_var(&self, index: u8) -> Result<String> {
        self.strings
            .get(&index)
            .cloned()
            .ok_or_else(|| ErrorKind::Undefined.into())
    }

    pub fn set_string_var(&mut self, index: u8, text: String) {
        self.strings.insert(index, text);
    }

    // --- function slots ---

    /// Text of slot `index`; empty slots are Undefined.
    pub fn slot_text(&self, index: u8) -> Result<&str> {
        let slot = self
            .slots
            .get(index as usize)
            .ok_or(ErrorKind::Undefined)?;
        if slot.text.is_empty() {
            return Err(ErrorKind::Undefined.into());
        }
        Ok(&slot.text)
    }

    pub fn set_slot(&mut self, index: u8, text: impl Into<String>) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            slot.text = text.into();
            slot.enabled = true;
        }
    }

    pub fn slot_enabled(&self, index: u8) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(|slot| slot.enabled && !slot.text.is_empty())
    }

    pub fn set_slot_enabled(&mut self, index: u8, enabled: bool) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            slot.enabled = enabled;
        }
    }

    // --- ans and history ---

    pub fn ans(&self) -> &Value {
        &self.ans
    }

    pub fn set_ans(&mut self, value: Value) {
        self.ans = value;
    }

    /// Record an expression/result pair, dropping the oldest entry
    /// past the history limit.
    pub fn push_history(&mut self, input: impl Into<String>, result: Value) {
        self.history.push(HistoryEntry {
            input: input.into(),
            result,
        });
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    // --- modes and window ---

    pub fn modes(&self) -> &ModeSettings {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeSettings {
        &mut self.modes
    }

    pub fn window(&self) -> &WindowParams {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut WindowParams {
        &mut self.window
    }

    // --- programs ---

    pub fn program(&self, name: &str) -> Result<String> {
        self.programs
            .get(name)
            .cloned()
            .ok_or_else(|| ErrorKind::Undefined.into())
    }

    pub fn set_program(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.programs.insert(name.into(), source.into());
    }

    // --- random numbers ---

    /// Next value in [0, 1) from the MINSTD generator.
    pub fn rand_next(&mut self) -> f64 {
        self.rng_seed = LCG_A.wrapping_mul(self.rng_seed) % LCG_M;
        self.rng_seed as f64 / LCG_M as f64
    }

    /// Reseed the generator; 0 restores the default seed.
    pub fn reseed(&mut self, seed: i64) {
        let seed = seed.abs() % LCG_M;
        self.rng_seed = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    // --- persistence ---

    /// Capture the persistent surface of this state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            vars: self.vars.clone(),
            lists: self.lists.clone(),
            matrices: self.matrices.clone(),
            strings: self.strings.clone(),
            slots: self.slots.clone(),
            ans: self.ans.clone(),
            modes: self.modes,
            window: self.window,
            programs: self.programs.clone(),
        }
    }

    /// Restore a previously captured snapshot.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.vars = snapshot.vars;
        self.lists = snapshot.lists;
        self.matrices = snapshot.matrices;
        self.strings = snapshot.strings;
        self.slots = snapshot.slots;
        self.ans = snapshot.ans;
        self.modes = snapshot.modes;
        self.window = snapshot.window;
        self.programs = snapshot.programs;
    }
}

/// Serializable image of the state's persistent surface. History and
/// the RNG position are deliberately not captured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub vars: HashMap<char, Value>,
    pub lists: HashMap<String, Vec<f64>>,
    pub matrices: HashMap<char, Vec<Vec<f64>>>,
    pub strings: HashMap<u8, String>,
    pub slots: [FunctionSlot; 10],
    pub ans: Value,
    pub modes: ModeSettings,
    pub window: WindowParams,
    pub programs: HashMap<String, String>,
}
