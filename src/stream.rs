//! Whitespace-tokenized integer input.
//!
//! Both program loading and the `READ` instruction consume signed integers
//! from the same kind of stream: whitespace-separated tokens over any
//! buffered reader. The sentinel and range rules live with the consumers;
//! this module only tokenizes and parses.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use thiserror::Error;

/// A stream of signed integers read token-by-token from a `BufRead`.
pub struct WordStream<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> WordStream<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Read the next integer token.
    ///
    /// Returns `Ok(None)` at end of input. A token that does not parse as
    /// a signed integer is a [`StreamError::Malformed`].
    pub fn next_word(&mut self) -> Result<Option<i32>, StreamError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return match token.parse::<i32>() {
                    Ok(value) => Ok(Some(value)),
                    Err(_) => Err(StreamError::Malformed(token)),
                };
            }

            let mut line = String::new();
            let bytes = self.reader.read_line(&mut line)?;
            if bytes == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(String::from));
        }
    }
}

impl<R> std::fmt::Debug for WordStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordStream")
            .field("pending", &self.pending)
            .finish()
    }
}

/// Errors that can occur while tokenizing the input stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("malformed word token: '{0}'")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(text: &str) -> WordStream<Cursor<&str>> {
        WordStream::new(Cursor::new(text))
    }

    #[test]
    fn test_tokenizes_whitespace() {
        let mut words = stream("+1009 1110\n  -99999\t42\n");
        assert_eq!(words.next_word().unwrap(), Some(1009));
        assert_eq!(words.next_word().unwrap(), Some(1110));
        assert_eq!(words.next_word().unwrap(), Some(-99999));
        assert_eq!(words.next_word().unwrap(), Some(42));
        assert_eq!(words.next_word().unwrap(), None);
    }

    #[test]
    fn test_empty_input() {
        let mut words = stream("");
        assert_eq!(words.next_word().unwrap(), None);
        // EOF is sticky
        assert_eq!(words.next_word().unwrap(), None);
    }

    #[test]
    fn test_malformed_token() {
        let mut words = stream("12 banana 34");
        assert_eq!(words.next_word().unwrap(), Some(12));
        match words.next_word() {
            Err(StreamError::Malformed(token)) => assert_eq!(token, "banana"),
            other => panic!("expected malformed token error, got {:?}", other),
        }
        // The stream is still usable after a bad token
        assert_eq!(words.next_word().unwrap(), Some(34));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut words = stream("\n\n  \n7\n");
        assert_eq!(words.next_word().unwrap(), Some(7));
        assert_eq!(words.next_word().unwrap(), None);
    }
}
