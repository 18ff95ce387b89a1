//! Disassembler for SML programs.
//!
//! Converts raw program words back to a readable listing. Words that do
//! not decode as instructions are shown as data; in SML there is no way
//! to tell code from data until the program counter arrives, so the
//! listing is best-effort by design.

use crate::machine::decode::{self, Opcode};
use crate::word::Word;

/// Disassemble a single word to text.
pub fn disassemble_word(raw: Word) -> String {
    match decode::decode(raw) {
        Ok(instr) => {
            if instr.opcode == Opcode::Halt {
                instr.opcode.mnemonic().to_string()
            } else {
                format!("{} {:02}", instr.opcode.mnemonic(), instr.operand)
            }
        }
        Err(_) => format!("DATA {}", raw),
    }
}

/// Disassemble a slice of raw words.
pub fn disassemble(words: &[i32]) -> String {
    let mut output = String::new();
    output.push_str("; SML Disassembly\n");
    output.push_str("; ---------------\n\n");

    for (addr, &value) in words.iter().enumerate() {
        let line = match Word::try_new(value) {
            Ok(word) => format!("{:02}: {:<14} ; {}", addr, disassemble_word(word), word),
            Err(_) => format!("{:02}: {:<14} ; {}", addr, "????", value),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}
