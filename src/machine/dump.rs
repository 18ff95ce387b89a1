//! Register and memory dump.
//!
//! A pure rendering of machine state for post-mortem inspection: a
//! labeled register block followed by the full memory array as a
//! 10-column grid. Callers invoke it explicitly after a load failure,
//! an abend or a normal halt; nothing here mutates the machine.

use std::fmt;

use crate::machine::memory::Memory;
use crate::machine::registers::Registers;

/// A borrowed view of machine state that renders as the dump text.
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a> {
    regs: &'a Registers,
    mem: &'a Memory,
}

impl<'a> Dump<'a> {
    /// Borrow register and memory state for rendering.
    pub fn new(regs: &'a Registers, mem: &'a Memory) -> Self {
        Self { regs, mem }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Register block: labels left-padded to 24 columns, word-valued
        // registers in sign+4-digit form, the split registers and the
        // program counter as unsigned two-digit values.
        writeln!(f, "\nREGISTERS:")?;
        writeln!(f, "{:<24}{}", "accumulator:", self.regs.accumulator)?;
        writeln!(f, "{:<24}{:02}", "instruction_counter:", self.regs.instruction_counter)?;
        writeln!(f, "{:<24}{}", "instruction_register:", self.regs.instruction_register)?;
        writeln!(f, "{:<24}{:02}", "operation_code:", self.regs.operation_code)?;
        writeln!(f, "{:<24}{:02}", "operand:", self.regs.operand)?;

        // Memory grid: column headers 0-9, rows labeled 0, 10, ..., 90.
        writeln!(f, "\nMEMORY:")?;
        for column in 0..10 {
            if column == 0 {
                write!(f, "{:>8}", column)?;
            } else {
                write!(f, "{:>6}", column)?;
            }
        }

        for (addr, cell) in self.mem.cells().enumerate() {
            if addr % 10 == 0 {
                write!(f, "\n{:>2}", addr)?;
            }
            write!(f, " {}", cell)?;
        }
        writeln!(f)?;

        Ok(())
    }
}

/// Render the dump to a string.
pub fn render(regs: &Registers, mem: &Memory) -> String {
    Dump::new(regs, mem).to_string()
}
