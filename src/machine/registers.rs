//! Simpletron CPU registers.
//!
//! The Simpletron has a single arithmetic register plus the bookkeeping
//! registers of the fetch-decode-execute cycle:
//! - accumulator: the sole arithmetic register
//! - instruction_counter: address of the next instruction (the PC)
//! - instruction_register: raw copy of the current instruction word
//! - operation_code / operand: the two halves of the split instruction

use crate::word::Word;
use serde::{Serialize, Deserialize};

/// The Simpletron register file.
///
/// The instruction_counter is deliberately a plain integer rather than a
/// bounded address type: valid programs keep it in 0-99, but the machine
/// checks that explicitly at fetch time and abends on violation, so the
/// register itself must be able to hold the out-of-range value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Registers {
    /// The accumulator, target of LOAD/ADD/SUBTRACT/MULTIPLY/DIVIDE.
    pub accumulator: Word,

    /// Program counter: address of the next instruction to fetch.
    pub instruction_counter: i32,

    /// Raw copy of the most recently fetched instruction word.
    pub instruction_register: Word,

    /// Leftmost two digits of the instruction register.
    pub operation_code: i32,

    /// Rightmost two digits of the instruction register.
    pub operand: i32,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self {
            accumulator: Word::ZERO,
            instruction_counter: 0,
            instruction_register: Word::ZERO,
            operation_code: 0,
            operand: 0,
        }
    }

    /// Increment the program counter by 1.
    pub fn advance_pc(&mut self) {
        self.instruction_counter += 1;
    }

    /// Set the program counter to an absolute address.
    pub fn jump(&mut self, addr: i32) {
        self.instruction_counter = addr;
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
