//! SML (Simpletron Machine Language) program tooling.
//!
//! This module provides:
//! - The deck file format (text files of signed words, one per line)
//! - A disassembler (words → readable listing)

pub mod deck;
pub mod disasm;

pub use deck::{Deck, DeckError, load_deck, save_deck};
pub use disasm::{disassemble, disassemble_word};
