//! The Simpletron's native data unit.
//!
//! A `Word` is a signed decimal value in the range [-9999, +9999],
//! written externally as an explicit sign plus four zero-padded digits
//! (`+0005`, `-0042`). Memory cells, the accumulator and the instruction
//! register all hold exactly one `Word`.

use std::fmt;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A signed four-digit Simpletron word.
///
/// Used for:
/// - Memory cells (the machine has 100 of these)
/// - The accumulator register
/// - The instruction register (raw fetched instruction)
///
/// Value range: -9,999 to +9,999
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(i16);

impl Word {
    /// Maximum positive value: +9,999
    pub const MAX: i32 = 9_999;

    /// Minimum negative value: -9,999
    pub const MIN: i32 = -9_999;

    /// The zero word.
    pub const ZERO: Word = Word(0);

    /// Create a word from a value known to be in range.
    ///
    /// # Panics
    /// Panics if value is outside the range [-9999, +9999].
    #[inline]
    pub const fn new(value: i16) -> Self {
        assert!(value >= -9_999 && value <= 9_999);
        Self(value)
    }

    /// Create a word from a decimal integer, checking the range.
    pub fn try_new(value: i32) -> Result<Self, WordRangeError> {
        if in_range(value) {
            Ok(Self(value as i16))
        } else {
            Err(WordRangeError(value))
        }
    }

    /// The numeric value of this word.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0 as i32
    }

    /// Check if this word is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if this word is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

/// Check whether a transient arithmetic result fits the word range.
#[inline]
pub const fn in_range(value: i32) -> bool {
    value >= Word::MIN && value <= Word::MAX
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:+05})", self.0)
    }
}

impl fmt::Display for Word {
    /// Sign-explicit, zero-padded four-digit form: `+0005`, `-0042`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+05}", self.0)
    }
}

impl TryFrom<i32> for Word {
    type Error = WordRangeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Word::try_new(value)
    }
}

impl From<Word> for i32 {
    fn from(word: Word) -> Self {
        word.value()
    }
}

/// Error produced when a value does not fit the word range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value {0} out of word range [-9999, +9999]")]
pub struct WordRangeError(pub i32);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_word_zero() {
        let zero = Word::ZERO;
        assert_eq!(zero.value(), 0);
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_word_try_new() {
        assert_eq!(Word::try_new(0).unwrap().value(), 0);
        assert_eq!(Word::try_new(9999).unwrap().value(), 9999);
        assert_eq!(Word::try_new(-9999).unwrap().value(), -9999);

        assert_eq!(Word::try_new(10_000), Err(WordRangeError(10_000)));
        assert_eq!(Word::try_new(-10_000), Err(WordRangeError(-10_000)));
        assert_eq!(Word::try_new(-99_999), Err(WordRangeError(-99_999)));
    }

    #[test]
    fn test_word_display() {
        assert_eq!(Word::new(5).to_string(), "+0005");
        assert_eq!(Word::new(-42).to_string(), "-0042");
        assert_eq!(Word::new(0).to_string(), "+0000");
        assert_eq!(Word::new(9999).to_string(), "+9999");
        assert_eq!(Word::new(-9999).to_string(), "-9999");
        assert_eq!(Word::new(1109).to_string(), "+1109");
    }

    #[test]
    fn test_word_sign() {
        assert!(Word::new(-1).is_negative());
        assert!(!Word::new(1).is_negative());
        assert!(!Word::new(0).is_negative());
    }

    proptest! {
        #[test]
        fn prop_in_range_matches_try_new(value in -20_000i32..20_000) {
            prop_assert_eq!(in_range(value), Word::try_new(value).is_ok());
        }

        #[test]
        fn prop_display_is_five_chars(value in -9_999i16..=9_999) {
            let rendered = Word::new(value).to_string();
            prop_assert_eq!(rendered.len(), 5);
            prop_assert!(rendered.starts_with('+') || rendered.starts_with('-'));
        }

        #[test]
        fn prop_display_roundtrip(value in -9_999i16..=9_999) {
            let rendered = Word::new(value).to_string();
            let parsed: i32 = rendered.parse().unwrap();
            prop_assert_eq!(parsed, i32::from(value));
        }
    }
}
