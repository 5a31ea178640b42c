//! Field validation for untrusted form input.
//!
//! Each submitted value is screened against the injection heuristics
//! (on the raw input), sanitized, and then checked structurally
//! according to its field kind. All applicable errors are collected;
//! nothing short-circuits, so the caller can surface every problem
//! with a field at once.

pub mod email;
pub mod phone;
pub mod text;
pub mod url;

pub use email::{EmailError, ValidatedEmail};
pub use phone::{PhoneError, ValidatedPhone};
pub use text::{validate_text, Alphabet, TextBounds, TextError};
pub use url::{UrlError, ValidatedUrl};

use thiserror::Error;

use crate::sanitize::Sanitizer;
use crate::threat::{ThreatKind, ThreatPatterns};

/// The kinds of field the validator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Phone,
    Url,
    FreeText(TextBounds),
}

/// A single problem with a submitted field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("value is required")]
    Required,

    #[error("must be at least {0} characters")]
    TooShort(usize),

    #[error("must be at most {0} characters")]
    TooLong(usize),

    #[error("contains disallowed character '{0}'")]
    DisallowedCharacter(char),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("input matches a {0} pattern")]
    Threat(ThreatKind),
}

impl From<TextError> for FieldError {
    fn from(error: TextError) -> Self {
        match error {
            TextError::TooShort(min) => FieldError::TooShort(min),
            TextError::TooLong(max) => FieldError::TooLong(max),
            TextError::DisallowedCharacter(c) => FieldError::DisallowedCharacter(c),
        }
    }
}

/// The outcome of validating one field.
///
/// `sanitized` is what the caller should forward downstream when the
/// field is valid. Errors are in check order: threat flags first, then
/// structural problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub valid: bool,
    pub sanitized: String,
    pub errors: Vec<FieldError>,
}

impl FieldReport {
    pub(crate) fn from_errors(sanitized: String, errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            sanitized,
            errors,
        }
    }
}

/// Validates individual field values.
///
/// Owns the compiled sanitizer and threat patterns so repeated
/// validations share one compilation.
pub struct FieldValidator {
    sanitizer: Sanitizer,
    threats: ThreatPatterns,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self {
            sanitizer: Sanitizer::new(),
            threats: ThreatPatterns::new(),
        }
    }

    /// Builds a validator around pre-built parts (e.g. threat patterns
    /// extended from configuration).
    pub fn with_parts(sanitizer: Sanitizer, threats: ThreatPatterns) -> Self {
        Self { sanitizer, threats }
    }

    /// Validates `input` as a value of `kind`.
    ///
    /// The threat scan runs on the raw input; the structural check
    /// runs on the sanitized value. Input that sanitizes to the empty
    /// string is reported as missing.
    pub fn validate(&self, input: &str, kind: &FieldKind) -> FieldReport {
        let mut errors: Vec<FieldError> = self
            .threats
            .scan(input)
            .into_iter()
            .map(FieldError::Threat)
            .collect();

        let sanitized = self.sanitizer.sanitize(input);

        if sanitized.is_empty() {
            // Optional fields are the caller's concern; the only kind
            // that tolerates emptiness here is free text with no
            // minimum.
            match kind {
                FieldKind::FreeText(bounds) if bounds.min == 0 => {}
                _ => errors.push(FieldError::Required),
            }
        } else {
            match kind {
                FieldKind::Email => {
                    if let Err(e) = ValidatedEmail::new(&sanitized) {
                        errors.push(e.into());
                    }
                }
                FieldKind::Phone => {
                    if let Err(e) = ValidatedPhone::new(&sanitized) {
                        errors.push(e.into());
                    }
                }
                FieldKind::Url => {
                    if let Err(e) = ValidatedUrl::new(&sanitized) {
                        errors.push(e.into());
                    }
                }
                FieldKind::FreeText(bounds) => {
                    errors.extend(
                        validate_text(&sanitized, bounds)
                            .into_iter()
                            .map(FieldError::from),
                    );
                }
            }
        }

        FieldReport::from_errors(sanitized, errors)
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}
