//! The Simpletron machine model.
//!
//! This module implements the complete machine:
//! - 100 word-sized memory cells (fill value +7777)
//! - registers: accumulator, instruction counter, instruction register,
//!   and the decoded operation_code/operand pair
//! - the 12-instruction SML set with a fetch-decode-execute loop
//! - sentinel-terminated program loading
//! - the register/memory dump

pub mod memory;
pub mod registers;
pub mod decode;
pub mod loader;
pub mod execute;
pub mod dump;

pub use memory::{Memory, MEMORY_SIZE};
pub use registers::Registers;
pub use decode::{Instruction, Opcode, DecodeError};
pub use loader::{LoadError, SENTINEL};
pub use execute::{Abend, Machine, MachineState};
pub use dump::Dump;
