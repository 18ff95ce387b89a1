//! Instruction decoder for the Simpletron.
//!
//! An instruction word is a positive four-digit value: the leftmost two
//! digits select one of twelve operations, the rightmost two digits give
//! a memory address 0-99.

use crate::word::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The twelve Simpletron operations.
///
/// Discriminants are the two-digit operation codes of the instruction set:
/// - I/O: READ, WRITE
/// - Transfer: LOAD, STORE
/// - Arithmetic: ADD, SUBTRACT, MULTIPLY, DIVIDE
/// - Control: BRANCH, BRANCHZERO, BRANCHNEG, HALT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum Opcode {
    /// Read a word from input into memory\[operand\], echoing it.
    Read = 11,
    /// Emit memory\[operand\] to output.
    Write = 12,
    /// memory\[operand\] := accumulator
    Store = 21,
    /// accumulator := memory\[operand\]
    Load = 22,
    /// accumulator := accumulator + memory\[operand\], range-checked.
    Add = 31,
    /// accumulator := accumulator - memory\[operand\], range-checked.
    Subtract = 32,
    /// accumulator := accumulator * memory\[operand\], range-checked.
    Multiply = 33,
    /// accumulator := accumulator / memory\[operand\] (truncated).
    Divide = 34,
    /// Unconditional jump to operand.
    Branch = 41,
    /// Jump to operand if the accumulator is zero.
    BranchZero = 42,
    /// Jump to operand if the accumulator is negative.
    BranchNeg = 43,
    /// Stop execution normally.
    Halt = 44,
}

impl Opcode {
    /// All twelve opcodes in numeric order.
    pub const ALL: [Opcode; 12] = [
        Opcode::Read,
        Opcode::Write,
        Opcode::Store,
        Opcode::Load,
        Opcode::Add,
        Opcode::Subtract,
        Opcode::Multiply,
        Opcode::Divide,
        Opcode::Branch,
        Opcode::BranchZero,
        Opcode::BranchNeg,
        Opcode::Halt,
    ];

    /// Look up an opcode by its two-digit code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            11 => Some(Opcode::Read),
            12 => Some(Opcode::Write),
            21 => Some(Opcode::Store),
            22 => Some(Opcode::Load),
            31 => Some(Opcode::Add),
            32 => Some(Opcode::Subtract),
            33 => Some(Opcode::Multiply),
            34 => Some(Opcode::Divide),
            41 => Some(Opcode::Branch),
            42 => Some(Opcode::BranchZero),
            43 => Some(Opcode::BranchNeg),
            44 => Some(Opcode::Halt),
            _ => None,
        }
    }

    /// The two-digit operation code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Assembly mnemonic for listings.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Store => "STORE",
            Opcode::Load => "LOAD",
            Opcode::Add => "ADD",
            Opcode::Subtract => "SUBTRACT",
            Opcode::Multiply => "MULTIPLY",
            Opcode::Divide => "DIVIDE",
            Opcode::Branch => "BRANCH",
            Opcode::BranchZero => "BRANCHZERO",
            Opcode::BranchNeg => "BRANCHNEG",
            Opcode::Halt => "HALT",
        }
    }

    /// The three branch opcodes manage the program counter themselves;
    /// every other opcode gets the automatic +1 advance after execution.
    #[inline]
    pub const fn is_branch(self) -> bool {
        matches!(self, Opcode::Branch | Opcode::BranchZero | Opcode::BranchNeg)
    }
}

/// A decoded instruction: operation plus two-digit address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Memory address 0-99. Structurally bounded: the rightmost two
    /// digits of a positive instruction word.
    pub operand: u8,
}

impl Instruction {
    /// The operand as a memory index.
    #[inline]
    pub fn address(self) -> usize {
        usize::from(self.operand)
    }
}

/// Split a raw word into (operation_code, operand).
///
/// Uses Rust's native truncation-toward-zero division and remainder. For
/// the positive words of valid programs this is the plain digit split;
/// a negative word yields a negative operation_code, which matches no
/// opcode and is rejected at decode.
#[inline]
pub fn split(raw: Word) -> (i32, i32) {
    (raw.value() / 100, raw.value() % 100)
}

/// Decode a raw instruction word.
pub fn decode(raw: Word) -> Result<Instruction, DecodeError> {
    let (code, operand) = split(raw);

    let opcode = Opcode::from_code(code).ok_or(DecodeError::InvalidOpcode(code))?;

    // A valid opcode implies raw >= 1100, so the operand is 0-99 here.
    Ok(Instruction {
        opcode,
        operand: operand as u8,
    })
}

/// Encode an instruction back to a word.
pub fn encode(instr: Instruction) -> Word {
    Word::new((instr.opcode.code() * 100 + i32::from(instr.operand)) as i16)
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid operation code: {0}")]
    InvalidOpcode(i32),
}
