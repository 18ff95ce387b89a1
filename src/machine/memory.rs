//! Simpletron memory subsystem.
//!
//! The machine has 100 word-sized cells, addressed 0-99. Uninitialized
//! cells hold `+7777`, an obviously invalid instruction, so stray
//! execution into untouched memory fails visibly instead of silently.

use crate::word::Word;
use serde::{Serialize, Deserialize};

/// The number of memory cells in the Simpletron.
pub const MEMORY_SIZE: usize = 100;

/// Fill value for untouched cells. `77` is not a defined opcode.
pub const FILL: Word = Word::new(7777);

/// Simpletron memory: 100 signed four-digit words.
#[derive(Clone, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a new memory with every cell set to the fill value.
    pub fn new() -> Self {
        Self {
            cells: vec![FILL; MEMORY_SIZE],
        }
    }

    /// Read a cell by address (0-99).
    ///
    /// # Panics
    /// Panics if address is out of range. Operand-derived addresses are
    /// two-digit fields and cannot trip this; the execution engine checks
    /// the program counter itself before fetching.
    #[inline]
    pub fn read(&self, addr: usize) -> Word {
        assert!(addr < MEMORY_SIZE, "memory address {} out of range (0-{})", addr, MEMORY_SIZE - 1);
        self.cells[addr]
    }

    /// Write a cell by address (0-99).
    ///
    /// # Panics
    /// Panics if address is out of range.
    #[inline]
    pub fn write(&mut self, addr: usize, value: Word) {
        assert!(addr < MEMORY_SIZE, "memory address {} out of range (0-{})", addr, MEMORY_SIZE - 1);
        self.cells[addr] = value;
    }

    /// Iterate over all cells in address order.
    pub fn cells(&self) -> impl Iterator<Item = Word> + '_ {
        self.cells.iter().copied()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only count cells that differ from the fill value
        let touched = self.cells.iter().filter(|&&cell| cell != FILL).count();

        f.debug_struct("Memory")
            .field("touched_cells", &touched)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_starts_filled() {
        let mem = Memory::new();
        for addr in 0..MEMORY_SIZE {
            assert_eq!(mem.read(addr), FILL);
        }
    }

    #[test]
    fn test_memory_read_write() {
        let mut mem = Memory::new();
        let value = Word::new(1234);

        mem.write(10, value);
        assert_eq!(mem.read(10), value);
        assert_eq!(mem.read(11), FILL);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_memory_read_out_of_range() {
        let mem = Memory::new();
        let _ = mem.read(100);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_memory_write_out_of_range() {
        let mut mem = Memory::new();
        mem.write(100, Word::ZERO);
    }
}
