//! Deck file format for SML programs.
//!
//! A deck is a simple text format, one word per line:
//! - Signed decimal integers (`+1009`, `-99999`, `42`)
//! - Lines starting with `;` are comments
//! - Anything after the word on a line is ignored
//! - Blank lines are ignored

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// A loaded deck file.
#[derive(Debug, Clone)]
pub struct Deck {
    /// The program words in load order (may include the sentinel).
    pub words: Vec<i32>,
    /// Original source lines (for listings).
    pub source_lines: Vec<String>,
}

impl Deck {
    /// Create a new empty deck.
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            source_lines: Vec::new(),
        }
    }

    /// Add a word.
    pub fn push(&mut self, word: i32, source: &str) {
        self.words.push(word);
        self.source_lines.push(source.to_string());
    }

    /// Get the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a deck file from disk.
pub fn load_deck<P: AsRef<Path>>(path: P) -> Result<Deck, DeckError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| DeckError::Io(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut deck = Deck::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| DeckError::Io(e.to_string()))?;
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        // The word is the first whitespace-separated token; the rest of
        // the line is free-form commentary.
        let token = trimmed
            .split_whitespace()
            .next()
            .unwrap_or_default();

        let word = token.parse::<i32>().map_err(|_| DeckError::Parse {
            line: line_num + 1,
            message: format!("expected a signed integer, found '{}'", token),
        })?;

        deck.push(word, trimmed);
    }

    Ok(deck)
}

/// Save a deck file to disk.
pub fn save_deck<P: AsRef<Path>>(path: P, deck: &Deck) -> Result<(), DeckError> {
    let mut file = std::fs::File::create(path.as_ref())
        .map_err(|e| DeckError::Io(e.to_string()))?;

    writeln!(file, "; SML deck file").map_err(|e| DeckError::Io(e.to_string()))?;
    writeln!(file, "; {} words", deck.len()).map_err(|e| DeckError::Io(e.to_string()))?;
    writeln!(file).map_err(|e| DeckError::Io(e.to_string()))?;

    for (addr, word) in deck.words.iter().enumerate() {
        writeln!(file, "{:+05} ; {:02}", word, addr)
            .map_err(|e| DeckError::Io(e.to_string()))?;
    }

    Ok(())
}

/// Errors that can occur during deck operations.
#[derive(Debug, Clone, Error)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}
