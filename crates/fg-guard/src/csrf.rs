//! CSRF token helpers for form submissions.
//!
//! The site stores a token in the visitor's session and echoes it back
//! with the contact form; the handler compares the two before
//! accepting the submission.

use rand::RngCore;
use subtle::ConstantTimeEq;

/// Length of a token in hex characters (32 random bytes).
pub const CSRF_TOKEN_LENGTH: usize = 64;

/// Generates a new CSRF token.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Validates a submitted token against the session's token.
///
/// Uses constant-time comparison to prevent timing attacks. Tokens of
/// the wrong length are rejected outright.
pub fn validate_csrf_token(submitted: &str, expected: &str) -> bool {
    if submitted.len() != CSRF_TOKEN_LENGTH || expected.len() != CSRF_TOKEN_LENGTH {
        return false;
    }
    submitted.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Picks the submitted token out of form data or the `X-CSRF-Token`
/// header; the form field wins.
pub fn extract_csrf_from_form_or_header<'a>(
    form_token: Option<&'a str>,
    header_token: Option<&'a str>,
) -> Option<&'a str> {
    form_token.or(header_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_lowercase_hex() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();

        assert_eq!(a.len(), CSRF_TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
        assert_ne!(a, b);
    }

    #[test]
    fn matching_tokens_validate() {
        let token = generate_csrf_token();
        assert!(validate_csrf_token(&token, &token));
    }

    #[test]
    fn mismatched_or_short_tokens_fail() {
        let token = generate_csrf_token();
        let other = generate_csrf_token();

        assert!(!validate_csrf_token(&token, &other));
        assert!(!validate_csrf_token("short", &token));
        assert!(!validate_csrf_token(&token, ""));
    }

    #[test]
    fn form_token_wins_over_header() {
        assert_eq!(
            extract_csrf_from_form_or_header(Some("form"), Some("header")),
            Some("form")
        );
        assert_eq!(
            extract_csrf_from_form_or_header(None, Some("header")),
            Some("header")
        );
        assert_eq!(extract_csrf_from_form_or_header(None, None), None);
    }
}
