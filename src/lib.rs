//! # Simpletron Emulator
//!
//! An emulator of the Simpletron, a 100-word decimal teaching computer.
//!
//! The Simpletron executes SML (Simpletron Machine Language): signed
//! four-digit words whose leftmost two digits select one of twelve
//! operations and whose rightmost two digits address memory. A program
//! is loaded as a sentinel-terminated word stream, then run until it
//! halts or aborts ("ABEND"). This emulator recreates the machine for
//! educational purposes.

pub mod word;
pub mod stream;
pub mod machine;
pub mod sml;

// Re-export commonly used types
pub use word::{Word, WordRangeError};
pub use stream::{StreamError, WordStream};
pub use machine::{
    Abend, Instruction, LoadError, Machine, MachineState, Memory, Opcode, Registers, MEMORY_SIZE,
    SENTINEL,
};
pub use sml::{disassemble, load_deck, save_deck, Deck, DeckError};
