//! # fg-core
//!
//! Input domain for formgate: field validators, injection heuristics,
//! sanitization, and the contact-form validator used by the site's
//! submission pipeline.
//!
//! Validation failures are returned as collected error values, never
//! raised; the only fallible constructors are the ones that compile
//! caller-supplied regex patterns.

pub mod form;
pub mod messages;
pub mod sanitize;
pub mod threat;
pub mod validation;

pub use form::{
    ContactFormBounds, ContactFormReport, ContactFormValidator, ContactSubmission,
};
pub use messages::message_ar;
pub use sanitize::Sanitizer;
pub use threat::{
    validate_regex_safe, RegexValidationError, ThreatKind, ThreatPatternError, ThreatPatterns,
};
pub use validation::{
    Alphabet, EmailError, FieldError, FieldKind, FieldReport, FieldValidator, PhoneError,
    TextBounds, UrlError, ValidatedEmail, ValidatedPhone, ValidatedUrl,
};
