//! URL validation.
//!
//! Links submitted through the site (e.g. a portfolio reference in a
//! project request) must be absolute URLs with an allowed scheme.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Schemes accepted unless the caller widens the set.
const DEFAULT_SCHEMES: &[&str] = &["http", "https"];

/// Errors that can occur during URL validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("url is empty")]
    Empty,

    #[error("url is not a valid absolute url: {0}")]
    Unparseable(String),

    #[error("url scheme '{0}' is not allowed")]
    DisallowedScheme(String),

    #[error("url has no host")]
    MissingHost,
}

/// A validated absolute URL with an allowed scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl ValidatedUrl {
    /// Validates `input` against the default `http`/`https` schemes.
    pub fn new(input: &str) -> Result<Self, UrlError> {
        Self::with_schemes(input, DEFAULT_SCHEMES)
    }

    /// Validates `input` against a caller-supplied scheme allow-list.
    pub fn with_schemes(input: &str, schemes: &[&str]) -> Result<Self, UrlError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(UrlError::Empty);
        }

        let url = Url::parse(input).map_err(|e| UrlError::Unparseable(e.to_string()))?;

        if !schemes.contains(&url.scheme()) {
            return Err(UrlError::DisallowedScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self(url))
    }

    /// Returns the normalized URL string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the scheme.
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns the host.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Consumes the value and returns the parsed URL.
    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ValidatedUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ValidatedUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidatedUrl::new(s)
    }
}
