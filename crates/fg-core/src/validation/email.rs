//! Email address validation.
//!
//! Contact submissions carry a sender address that is forwarded to the
//! mail integration, so the address is validated structurally (an
//! RFC 5322 subset) rather than with a single permissive regex.
//! Validated addresses are trimmed and normalized to lowercase.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a complete address (RFC 5321).
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum length of the local part (before the `@`).
const MAX_LOCAL_LENGTH: usize = 64;
/// Maximum length of the domain part.
const MAX_DOMAIN_LENGTH: usize = 253;
/// Maximum length of a single domain label.
const MAX_LABEL_LENGTH: usize = 63;

/// Errors that can occur during email validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email address is empty")]
    Empty,

    #[error("email address exceeds {MAX_EMAIL_LENGTH} characters")]
    TooLong,

    #[error("email address must contain exactly one '@'")]
    BadAtCount,

    #[error("local part is empty or exceeds {MAX_LOCAL_LENGTH} characters")]
    BadLocalLength,

    #[error("local part has a leading, trailing, or doubled dot")]
    BadLocalDots,

    #[error("invalid character '{0}' in local part")]
    InvalidLocalChar(char),

    #[error("domain is empty or exceeds {MAX_DOMAIN_LENGTH} characters")]
    BadDomainLength,

    #[error("domain must contain at least one dot")]
    MissingTld,

    #[error("domain label '{0}' is invalid")]
    BadLabel(String),

    #[error("invalid character '{0}' in domain")]
    InvalidDomainChar(char),
}

/// A validated, lowercase-normalized email address.
///
/// Can only be constructed through validation, so any instance is
/// known to be well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatedEmail {
    email: String,
    at: usize,
}

impl ValidatedEmail {
    /// Validates `input` and returns the normalized address.
    pub fn new(input: &str) -> Result<Self, EmailError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EmailError::Empty);
        }
        if input.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }

        let at = {
            let mut positions = input.match_indices('@').map(|(i, _)| i);
            match (positions.next(), positions.next()) {
                (Some(i), None) => i,
                _ => return Err(EmailError::BadAtCount),
            }
        };

        Self::check_local(&input[..at])?;
        Self::check_domain(&input[at + 1..])?;

        Ok(Self {
            email: input.to_lowercase(),
            at,
        })
    }

    fn check_local(local: &str) -> Result<(), EmailError> {
        if local.is_empty() || local.len() > MAX_LOCAL_LENGTH {
            return Err(EmailError::BadLocalLength);
        }
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err(EmailError::BadLocalDots);
        }
        // RFC 5322 atom characters plus the interior dot.
        for c in local.chars() {
            let allowed = c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '.' | '!'
                        | '#'
                        | '$'
                        | '%'
                        | '&'
                        | '\''
                        | '*'
                        | '+'
                        | '-'
                        | '/'
                        | '='
                        | '?'
                        | '^'
                        | '_'
                        | '`'
                        | '{'
                        | '|'
                        | '}'
                        | '~'
                );
            if !allowed {
                return Err(EmailError::InvalidLocalChar(c));
            }
        }
        Ok(())
    }

    fn check_domain(domain: &str) -> Result<(), EmailError> {
        if domain.is_empty() || domain.len() > MAX_DOMAIN_LENGTH {
            return Err(EmailError::BadDomainLength);
        }
        if !domain.contains('.') {
            return Err(EmailError::MissingTld);
        }
        for label in domain.split('.') {
            if label.is_empty()
                || label.len() > MAX_LABEL_LENGTH
                || label.starts_with('-')
                || label.ends_with('-')
            {
                return Err(EmailError::BadLabel(label.to_string()));
            }
            for c in label.chars() {
                if !c.is_ascii_alphanumeric() && c != '-' {
                    return Err(EmailError::InvalidDomainChar(c));
                }
            }
        }
        Ok(())
    }

    /// Returns the full normalized address.
    pub fn as_str(&self) -> &str {
        &self.email
    }

    /// Returns the part before the `@`.
    pub fn local_part(&self) -> &str {
        &self.email[..self.at]
    }

    /// Returns the part after the `@`.
    pub fn domain(&self) -> &str {
        &self.email[self.at + 1..]
    }

    /// Consumes the value and returns the underlying string.
    pub fn into_string(self) -> String {
        self.email
    }
}

impl fmt::Display for ValidatedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.email)
    }
}

impl AsRef<str> for ValidatedEmail {
    fn as_ref(&self) -> &str {
        &self.email
    }
}

impl FromStr for ValidatedEmail {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatedEmail::new(s)
    }
}

impl TryFrom<String> for ValidatedEmail {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ValidatedEmail::new(&value)
    }
}

impl From<ValidatedEmail> for String {
    fn from(email: ValidatedEmail) -> String {
        email.email
    }
}
