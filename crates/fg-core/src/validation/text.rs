//! Free-text validation.
//!
//! Names, subjects, and messages are bounded in length (counted in
//! characters, since most submissions are Arabic) and optionally
//! restricted to an allowed alphabet.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The character sets a free-text field may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    /// No character restriction.
    Any,
    /// Arabic block, ASCII letters and digits, whitespace, and the
    /// punctuation the site accepts in subjects and messages.
    ArabicLatin,
    /// Arabic and ASCII letters plus whitespace. Used for names.
    Letters,
}

impl Alphabet {
    fn allows(self, c: char) -> bool {
        let arabic = ('\u{0600}'..='\u{06FF}').contains(&c);
        match self {
            Alphabet::Any => true,
            Alphabet::ArabicLatin => {
                arabic
                    || c.is_ascii_alphanumeric()
                    || c.is_whitespace()
                    || matches!(c, '-' | '_' | '.' | ',' | '!' | '?')
            }
            Alphabet::Letters => arabic || c.is_ascii_alphabetic() || c.is_whitespace(),
        }
    }
}

/// Length and alphabet bounds for a free-text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBounds {
    /// Minimum length in characters.
    pub min: usize,
    /// Maximum length in characters.
    pub max: usize,
    /// Allowed character set.
    pub alphabet: Alphabet,
}

impl TextBounds {
    /// Bounds with no alphabet restriction.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            alphabet: Alphabet::Any,
        }
    }

    /// Replaces the alphabet restriction.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }
}

/// Errors that can occur during free-text validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("must be at least {0} characters")]
    TooShort(usize),

    #[error("must be at most {0} characters")]
    TooLong(usize),

    #[error("contains disallowed character '{0}'")]
    DisallowedCharacter(char),
}

/// Checks `input` against `bounds`, collecting every failed check.
///
/// Only the first disallowed character is reported. An empty result
/// means the input is valid.
pub fn validate_text(input: &str, bounds: &TextBounds) -> Vec<TextError> {
    let mut errors = Vec::new();
    let length = input.chars().count();

    if length < bounds.min {
        errors.push(TextError::TooShort(bounds.min));
    }
    if length > bounds.max {
        errors.push(TextError::TooLong(bounds.max));
    }
    if let Some(c) = input.chars().find(|c| !bounds.alphabet.allows(*c)) {
        errors.push(TextError::DisallowedCharacter(c));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arabic_message_within_bounds() {
        let bounds = TextBounds::new(10, 1000);
        assert!(validate_text("أحتاج موقعاً جديداً لشركتي الناشئة", &bounds).is_empty());
    }

    #[test]
    fn length_is_counted_in_characters() {
        // Four Arabic characters occupy eight bytes but count as four.
        let bounds = TextBounds::new(1, 4);
        assert!(validate_text("مرحب", &bounds).is_empty());
        assert_eq!(validate_text("مرحبا", &bounds), vec![TextError::TooLong(4)]);
    }

    #[test]
    fn short_and_long_inputs_fail() {
        let bounds = TextBounds::new(5, 10);
        assert_eq!(validate_text("abc", &bounds), vec![TextError::TooShort(5)]);
        assert_eq!(
            validate_text("abcdefghijk", &bounds),
            vec![TextError::TooLong(10)]
        );
    }

    #[test]
    fn letters_alphabet_rejects_digits() {
        let bounds = TextBounds::new(2, 50).with_alphabet(Alphabet::Letters);
        assert!(validate_text("محمد علي", &bounds).is_empty());
        assert!(validate_text("John Smith", &bounds).is_empty());
        assert_eq!(
            validate_text("agent 007", &bounds),
            vec![TextError::DisallowedCharacter('0')]
        );
    }

    #[test]
    fn arabic_latin_alphabet_allows_basic_punctuation() {
        let bounds = TextBounds::new(1, 100).with_alphabet(Alphabet::ArabicLatin);
        assert!(validate_text("مرحبا! How are you?", &bounds).is_empty());
        assert_eq!(
            validate_text("hello <world>", &bounds),
            vec![TextError::DisallowedCharacter('<')]
        );
    }

    #[test]
    fn collects_length_and_alphabet_errors_together() {
        let bounds = TextBounds::new(5, 100).with_alphabet(Alphabet::Letters);
        assert_eq!(
            validate_text("a1", &bounds),
            vec![
                TextError::TooShort(5),
                TextError::DisallowedCharacter('1')
            ]
        );
    }
}
