//! Phone number validation.
//!
//! Accepts international numbers in the form the contact form collects
//! them: an optional leading `+`, a first digit of 1-9, and 8 to 16
//! digits in total, never longer than 20 characters. No separator or
//! formatting characters are allowed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a phone number, including the optional `+`.
const MAX_PHONE_LENGTH: usize = 20;
/// Minimum number of digits.
const MIN_DIGITS: usize = 8;
/// Maximum number of digits.
const MAX_DIGITS: usize = 16;

/// Errors that can occur during phone validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,

    #[error("phone number exceeds {MAX_PHONE_LENGTH} characters")]
    TooLong,

    #[error("phone number must have between {MIN_DIGITS} and {MAX_DIGITS} digits (got {0})")]
    BadDigitCount(usize),

    #[error("phone number cannot start with '0'")]
    LeadingZero,

    #[error("invalid character '{0}' in phone number")]
    InvalidCharacter(char),
}

/// A validated phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatedPhone(String);

impl ValidatedPhone {
    /// Validates `input` and returns the trimmed number.
    pub fn new(input: &str) -> Result<Self, PhoneError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PhoneError::Empty);
        }
        if input.len() > MAX_PHONE_LENGTH {
            return Err(PhoneError::TooLong);
        }

        let digits = input.strip_prefix('+').unwrap_or(input);
        if digits.is_empty() {
            return Err(PhoneError::BadDigitCount(0));
        }
        for c in digits.chars() {
            if !c.is_ascii_digit() {
                return Err(PhoneError::InvalidCharacter(c));
            }
        }
        if digits.starts_with('0') {
            return Err(PhoneError::LeadingZero);
        }
        if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
            return Err(PhoneError::BadDigitCount(digits.len()));
        }

        Ok(Self(input.to_string()))
    }

    /// Returns the number as entered, minus surrounding whitespace.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the digits without the leading `+`.
    pub fn digits(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }

    /// Consumes the value and returns the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ValidatedPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ValidatedPhone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatedPhone::new(s)
    }
}

impl TryFrom<String> for ValidatedPhone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ValidatedPhone::new(&value)
    }
}

impl From<ValidatedPhone> for String {
    fn from(phone: ValidatedPhone) -> String {
        phone.0
    }
}
