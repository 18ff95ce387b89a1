//! Execution engine for the Simpletron.
//!
//! Implements the fetch-decode-execute cycle and all twelve instruction
//! behaviors. Every abnormal condition ends the run immediately with a
//! reported kind ("ABEND"); the only successful terminal state is a HALT.

use std::io::{self, BufRead, Write};

use crate::machine::decode::{self, Instruction, Opcode};
use crate::machine::loader::{self, LoadError};
use crate::machine::memory::Memory;
use crate::machine::registers::Registers;
use crate::machine::dump;
use crate::stream::WordStream;
use crate::word::{self, Word};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Machine execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineState {
    /// The machine is running normally.
    Running,
    /// The machine executed HALT (terminal, success).
    Halted,
    /// The machine aborted (terminal, failure).
    Abended(Abend),
}

/// Abnormal-end kinds. All are fatal; none are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Abend {
    /// Program counter outside 0-99 at fetch time.
    #[error("addressability error")]
    AddressabilityError,

    /// A READ-supplied value was outside [-9999, +9999] or missing.
    #[error("illegal input")]
    IllegalInput,

    /// An ADD/SUBTRACT/MULTIPLY result exceeded +9999.
    #[error("overflow")]
    Overflow,

    /// An ADD/SUBTRACT/MULTIPLY result fell below -9999.
    #[error("underflow")]
    Underflow,

    /// DIVIDE with a zero divisor.
    #[error("attempted division by 0")]
    DivisionByZero,

    /// The decoded operation code matched none of the twelve instructions.
    #[error("invalid opcode")]
    InvalidOpcode,
}

/// The Simpletron machine: registers, memory and run state.
///
/// One instance owns all state for exactly one load+run cycle.
#[derive(Clone, Serialize, Deserialize)]
pub struct Machine {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Current execution state.
    pub state: MachineState,
    /// Instruction count (for diagnostics).
    pub cycles: u64,
    /// Last executed instruction (for trace output).
    last_instr: Option<Instruction>,
}

impl Machine {
    /// Create a new machine with zeroed registers and filled memory.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: MachineState::Running,
            cycles: 0,
            last_instr: None,
        }
    }

    /// Load a program from a word stream into memory.
    ///
    /// See [`loader::load_program`]; the same stream may then carry the
    /// runtime input for READ instructions.
    pub fn load_program<R, W>(
        &mut self,
        words: &mut WordStream<R>,
        out: &mut W,
    ) -> Result<usize, LoadError>
    where
        R: BufRead,
        W: Write,
    {
        loader::load_program(&mut self.mem, words, out)
    }

    /// Load a program from an in-memory word list (a parsed deck file).
    pub fn load_words<W: Write>(
        &mut self,
        program: &[i32],
        out: &mut W,
    ) -> Result<usize, LoadError> {
        loader::load_words(&mut self.mem, program, out)
    }

    /// Execute a single instruction.
    ///
    /// Returns the machine state after the step. READ consumes one word
    /// from `input`; READ echoes, WRITE output, abort diagnostics and the
    /// halt message all go to `out`. Only sink failures surface as errors;
    /// machine-level failures become an [`MachineState::Abended`] state.
    pub fn step<R, W>(
        &mut self,
        input: &mut WordStream<R>,
        out: &mut W,
    ) -> io::Result<MachineState>
    where
        R: BufRead,
        W: Write,
    {
        if self.state != MachineState::Running {
            return Ok(self.state);
        }

        // The PC range check is a business rule, not a safety net: it is
        // what turns a runaway program into a reported addressability error.
        let pc = self.regs.instruction_counter;
        if !(0..100).contains(&pc) {
            return self.abend(Abend::AddressabilityError, out);
        }

        // Fetch
        let raw = self.mem.read(pc as usize);
        self.regs.instruction_register = raw;

        // Decode: the split registers are visible in dumps even when the
        // word turns out not to be a valid instruction.
        let (code, operand) = decode::split(raw);
        self.regs.operation_code = code;
        self.regs.operand = operand;

        let instr = match decode::decode(raw) {
            Ok(instr) => instr,
            Err(_) => return self.abend(Abend::InvalidOpcode, out),
        };

        // Execute
        let addr = instr.address();
        match instr.opcode {
            Opcode::Read => {
                let value = match input.next_word() {
                    Ok(Some(value)) if word::in_range(value) => value,
                    // Out-of-range, missing and unreadable input all end
                    // the run the same way.
                    _ => return self.abend(Abend::IllegalInput, out),
                };
                self.mem.write(addr, Word::new(value as i16));
                writeln!(out, "READ: {}", self.mem.read(addr))?;
            }

            Opcode::Write => {
                writeln!(out, "{}", self.mem.read(addr))?;
            }

            Opcode::Load => {
                self.regs.accumulator = self.mem.read(addr);
            }

            Opcode::Store => {
                self.mem.write(addr, self.regs.accumulator);
            }

            Opcode::Add => {
                let result = self.regs.accumulator.value() + self.mem.read(addr).value();
                if let Some(state) = self.commit_arithmetic(result, out)? {
                    return Ok(state);
                }
            }

            Opcode::Subtract => {
                let result = self.regs.accumulator.value() - self.mem.read(addr).value();
                if let Some(state) = self.commit_arithmetic(result, out)? {
                    return Ok(state);
                }
            }

            Opcode::Multiply => {
                let result = self.regs.accumulator.value() * self.mem.read(addr).value();
                if let Some(state) = self.commit_arithmetic(result, out)? {
                    return Ok(state);
                }
            }

            Opcode::Divide => {
                let divisor = self.mem.read(addr);
                if divisor.is_zero() {
                    return self.abend(Abend::DivisionByZero, out);
                }
                // Truncating division. Unlike the other arithmetic ops
                // there is no post-check; the quotient of two in-range
                // words cannot leave the range anyway.
                let quotient = self.regs.accumulator.value() / divisor.value();
                self.regs.accumulator = Word::new(quotient as i16);
            }

            Opcode::Branch => {
                self.regs.jump(i32::from(instr.operand));
            }

            Opcode::BranchZero => {
                if self.regs.accumulator.is_zero() {
                    self.regs.jump(i32::from(instr.operand));
                } else {
                    self.regs.advance_pc();
                }
            }

            Opcode::BranchNeg => {
                if self.regs.accumulator.is_negative() {
                    self.regs.jump(i32::from(instr.operand));
                } else {
                    self.regs.advance_pc();
                }
            }

            Opcode::Halt => {
                writeln!(out, "*** Simpletron execution terminated. ***")?;
                self.state = MachineState::Halted;
            }
        }

        // Branch opcodes set the PC themselves; HALT ends the loop.
        if !instr.opcode.is_branch() && self.state == MachineState::Running {
            self.regs.advance_pc();
        }

        self.cycles += 1;
        self.last_instr = Some(instr);

        Ok(self.state)
    }

    /// Run until halt or abend.
    ///
    /// Returns the terminal state.
    pub fn run<R, W>(
        &mut self,
        input: &mut WordStream<R>,
        out: &mut W,
    ) -> io::Result<MachineState>
    where
        R: BufRead,
        W: Write,
    {
        while self.state == MachineState::Running {
            self.step(input, out)?;
        }
        Ok(self.state)
    }

    /// Commit a transient arithmetic result to the accumulator, or abend.
    ///
    /// Returns `Some(state)` if the result violated the word range (the
    /// accumulator is left unchanged), `None` on a successful commit.
    fn commit_arithmetic<W: Write>(
        &mut self,
        result: i32,
        out: &mut W,
    ) -> io::Result<Option<MachineState>> {
        if result < Word::MIN {
            return self.abend(Abend::Underflow, out).map(Some);
        }
        if result > Word::MAX {
            return self.abend(Abend::Overflow, out).map(Some);
        }
        self.regs.accumulator = Word::new(result as i16);
        Ok(None)
    }

    /// Emit the diagnostic line and enter the terminal abend state.
    fn abend<W: Write>(&mut self, kind: Abend, out: &mut W) -> io::Result<MachineState> {
        writeln!(out, "*** ABEND: {}. ***", kind)?;
        self.state = MachineState::Abended(kind);
        Ok(self.state)
    }

    /// Render the register/memory dump.
    pub fn dump(&self) -> String {
        dump::render(&self.regs, &self.mem)
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the machine has halted normally.
    pub fn is_halted(&self) -> bool {
        self.state == MachineState::Halted
    }

    /// Check if the machine is still running.
    pub fn is_running(&self) -> bool {
        self.state == MachineState::Running
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(text: &str) -> WordStream<Cursor<String>> {
        WordStream::new(Cursor::new(text.to_string()))
    }

    /// Load `program`, run with `input`, return (machine, output text).
    fn load_and_run(program: &[i32], input: &str) -> (Machine, String) {
        let mut machine = Machine::new();
        let mut out = Vec::new();
        machine
            .load_words(program, &mut out)
            .expect("test program must load");
        let mut input = stream(input);
        machine.run(&mut input, &mut out).expect("Vec sink");
        (machine, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_halt() {
        let (machine, output) = load_and_run(&[4400], "");
        assert!(machine.is_halted());
        assert_eq!(machine.cycles, 1);
        assert_eq!(output, "*** Simpletron execution terminated. ***\n");
    }

    #[test]
    fn test_scenario_a_read_add_write() {
        // Read two numbers, add them, store and write the sum, halt.
        let program = [1109, 1110, 2209, 3110, 2111, 1211, 4400];
        let (machine, output) = load_and_run(&program, "5 3\n");

        assert_eq!(
            output,
            "READ: +0005\nREAD: +0003\n+0008\n*** Simpletron execution terminated. ***\n"
        );
        assert!(machine.is_halted());
        assert_eq!(machine.regs.accumulator, Word::new(8));
        assert_eq!(machine.mem.read(11), Word::new(8));
    }

    #[test]
    fn test_scenario_b_add_overflow() {
        // acc := 9999, then 9999 + 1 overflows.
        let program = [2203, 3104, 4400, 9999, 1];
        let (machine, output) = load_and_run(&program, "");

        assert_eq!(machine.state, MachineState::Abended(Abend::Overflow));
        // The accumulator keeps its pre-instruction value
        assert_eq!(machine.regs.accumulator, Word::new(9999));
        assert_eq!(output, "*** ABEND: overflow. ***\n");
    }

    #[test]
    fn test_subtract_underflow() {
        let program = [2203, 3204, 4400, -9999, 1];
        let (machine, output) = load_and_run(&program, "");

        assert_eq!(machine.state, MachineState::Abended(Abend::Underflow));
        assert_eq!(machine.regs.accumulator, Word::new(-9999));
        assert_eq!(output, "*** ABEND: underflow. ***\n");
    }

    #[test]
    fn test_multiply_range_check() {
        // 200 * 50 = 10000, one past the top of the range.
        let program = [2203, 3304, 4400, 200, 50];
        let (machine, _) = load_and_run(&program, "");
        assert_eq!(machine.state, MachineState::Abended(Abend::Overflow));
        assert_eq!(machine.regs.accumulator, Word::new(200));
    }

    #[test]
    fn test_scenario_c_division_by_zero() {
        let program = [2203, 3404, 4400, 17, 0];
        let (machine, output) = load_and_run(&program, "");

        assert_eq!(machine.state, MachineState::Abended(Abend::DivisionByZero));
        assert_eq!(machine.regs.accumulator, Word::new(17));
        assert_eq!(output, "*** ABEND: attempted division by 0. ***\n");
    }

    #[test]
    fn test_divide_truncates_toward_zero() {
        let program = [2203, 3404, 4400, -7, 2];
        let (machine, _) = load_and_run(&program, "");
        assert!(machine.is_halted());
        assert_eq!(machine.regs.accumulator, Word::new(-3));
    }

    #[test]
    fn test_scenario_e_invalid_opcode() {
        let (machine, output) = load_and_run(&[5012], "");
        assert_eq!(machine.state, MachineState::Abended(Abend::InvalidOpcode));
        assert_eq!(output, "*** ABEND: invalid opcode. ***\n");
        // The split registers still reflect the bad word
        assert_eq!(machine.regs.operation_code, 50);
        assert_eq!(machine.regs.operand, 12);
    }

    #[test]
    fn test_read_illegal_input() {
        let (machine, output) = load_and_run(&[1109, 4400], "10000\n");
        assert_eq!(machine.state, MachineState::Abended(Abend::IllegalInput));
        assert_eq!(output, "*** ABEND: illegal input. ***\n");
    }

    #[test]
    fn test_read_exhausted_input() {
        let (machine, _) = load_and_run(&[1109, 4400], "");
        assert_eq!(machine.state, MachineState::Abended(Abend::IllegalInput));
    }

    #[test]
    fn test_addressability_error_on_runaway_pc() {
        // BRANCH to 99, whose fill word abends as invalid opcode; instead
        // fill address 99 with a harmless WRITE and fall off the end.
        let mut machine = Machine::new();
        let mut out = Vec::new();
        machine.load_words(&[4199], &mut out).unwrap();
        machine.mem.write(99, Word::new(1200));
        let mut input = stream("");
        let state = machine.run(&mut input, &mut out).unwrap();

        assert_eq!(state, MachineState::Abended(Abend::AddressabilityError));
        assert_eq!(machine.regs.instruction_counter, 100);
        assert!(String::from_utf8(out)
            .unwrap()
            .ends_with("*** ABEND: addressability error. ***\n"));
    }

    #[test]
    fn test_pc_advance_law() {
        let mut machine = Machine::new();
        let mut out = Vec::new();
        // LOAD at 0, STORE at 1: plain +1 advance each.
        machine.load_words(&[2205, 2105, 4400], &mut out).unwrap();
        let mut input = stream("");

        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 1);
        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 2);
    }

    #[test]
    fn test_branch_sets_pc() {
        let mut machine = Machine::new();
        let mut out = Vec::new();
        machine.load_words(&[4105], &mut out).unwrap();
        machine.mem.write(5, Word::new(4400));
        let mut input = stream("");

        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 5);

        let state = machine.run(&mut input, &mut out).unwrap();
        assert_eq!(state, MachineState::Halted);
    }

    #[test]
    fn test_branchzero_taken_and_not_taken() {
        // acc = 0: taken
        let mut machine = Machine::new();
        let mut out = Vec::new();
        machine.load_words(&[4207], &mut out).unwrap();
        let mut input = stream("");
        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 7);

        // acc = 1: falls through to PC+1
        let mut machine = Machine::new();
        machine.load_words(&[2202, 4207, 1], &mut out).unwrap();
        machine.step(&mut input, &mut out).unwrap();
        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 2);
    }

    #[test]
    fn test_branchneg_taken_and_not_taken() {
        let mut out = Vec::new();
        let mut input = stream("");

        // acc = -1: taken
        let mut machine = Machine::new();
        machine.load_words(&[2202, 4309, -1], &mut out).unwrap();
        machine.step(&mut input, &mut out).unwrap();
        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 9);

        // acc = 0: not taken
        let mut machine = Machine::new();
        machine.load_words(&[4309], &mut out).unwrap();
        machine.step(&mut input, &mut out).unwrap();
        assert_eq!(machine.regs.instruction_counter, 1);
    }

    #[test]
    fn test_step_after_terminal_state_is_inert() {
        let (mut machine, _) = load_and_run(&[4400], "");
        let cycles = machine.cycles;
        let mut input = stream("");
        let mut out = Vec::new();

        let state = machine.step(&mut input, &mut out).unwrap();
        assert_eq!(state, MachineState::Halted);
        assert_eq!(machine.cycles, cycles);
        assert!(out.is_empty());
    }

    #[test]
    fn test_load_then_run_from_one_stream() {
        // Program and runtime input share a single stream, separated by
        // the sentinel, exactly like a card deck fed to the machine.
        let mut machine = Machine::new();
        let mut out = Vec::new();
        let mut words = stream("1109 1110 2209 3110 2111 1211 4400\n-99999\n5 3\n");

        let count = machine.load_program(&mut words, &mut out).unwrap();
        assert_eq!(count, 7);

        machine.run(&mut words, &mut out).unwrap();
        assert!(machine.is_halted());
        assert_eq!(machine.mem.read(11), Word::new(8));
    }
}
