//! Program loader.
//!
//! Words are committed to memory sequentially, starting at address 0,
//! until the sentinel (or end of input) is reached. Every word is
//! range-checked before commit; loading stops at the first failure and
//! the caller must not proceed to execution.

use std::io::{self, Write};

use crate::machine::memory::{Memory, MEMORY_SIZE};
use crate::stream::{StreamError, WordStream};
use crate::word::{self, Word};
use thiserror::Error;

/// End-of-program marker. Never stored: loading stops when it is read.
pub const SENTINEL: i32 = -99_999;

/// Load a program from a word stream into memory.
///
/// Reads until the sentinel or end of input and returns the number of
/// words stored. Words already committed before a failure stay in memory;
/// that is harmless because execution must not start after a load error.
pub fn load_program<R, W>(
    mem: &mut Memory,
    words: &mut WordStream<R>,
    out: &mut W,
) -> Result<usize, LoadError>
where
    R: io::BufRead,
    W: Write,
{
    let mut count = 0;

    loop {
        let value = match words.next_word()? {
            // EOF ends the program just like the sentinel does.
            None | Some(SENTINEL) => return Ok(count),
            Some(value) => value,
        };

        if !word::in_range(value) {
            writeln!(out, "*** ABEND: {}. ***", LoadError::InvalidWord(value))?;
            return Err(LoadError::InvalidWord(value));
        }

        if count >= MEMORY_SIZE {
            writeln!(out, "*** ABEND: {}. ***", LoadError::ProgramTooLarge)?;
            return Err(LoadError::ProgramTooLarge);
        }

        mem.write(count, Word::new(value as i16));
        count += 1;
    }
}

/// Load a program from an in-memory word list (a parsed deck file).
///
/// Applies the same validation and sentinel rule as [`load_program`].
pub fn load_words<W: Write>(
    mem: &mut Memory,
    program: &[i32],
    out: &mut W,
) -> Result<usize, LoadError> {
    let mut count = 0;

    for &value in program {
        if value == SENTINEL {
            break;
        }

        if !word::in_range(value) {
            writeln!(out, "*** ABEND: {}. ***", LoadError::InvalidWord(value))?;
            return Err(LoadError::InvalidWord(value));
        }

        if count >= MEMORY_SIZE {
            writeln!(out, "*** ABEND: {}. ***", LoadError::ProgramTooLarge)?;
            return Err(LoadError::ProgramTooLarge);
        }

        mem.write(count, Word::new(value as i16));
        count += 1;
    }

    Ok(count)
}

/// Errors that can occur while loading a program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A word before the sentinel was outside [-9999, +9999].
    #[error("pgm load: invalid word")]
    InvalidWord(i32),

    /// More than 100 words arrived before the sentinel.
    #[error("pgm load: pgm too large")]
    ProgramTooLarge,

    /// The input stream failed or contained a non-integer token.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Writing the diagnostic line failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
