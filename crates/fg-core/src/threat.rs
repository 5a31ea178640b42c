//! Injection heuristics for untrusted form input.
//!
//! These patterns flag input that *looks like* an injection attempt so
//! it can be rejected early and counted. They are a coarse anomaly
//! flag, not a security boundary: sanitization plus output encoding
//! and parameterized queries downstream are the actual defenses.
//! False negatives are acceptable; false positives are possible (a
//! message containing the bare word "drop" will match) and tolerated.

use metrics::counter;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on a compiled pattern, to keep configured patterns from
/// ballooning the regex program.
const MAX_COMPILED_PATTERN_SIZE: usize = 1 << 20;

/// The categories of suspicious input the heuristics recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    SqlInjection,
    XssAttempt,
    PathTraversal,
    CommandInjection,
}

impl ThreatKind {
    /// All kinds, in scan order.
    pub const ALL: [ThreatKind; 4] = [
        ThreatKind::SqlInjection,
        ThreatKind::XssAttempt,
        ThreatKind::PathTraversal,
        ThreatKind::CommandInjection,
    ];

    /// Stable identifier used in config keys and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatKind::SqlInjection => "sql_injection",
            ThreatKind::XssAttempt => "xss_attempt",
            ThreatKind::PathTraversal => "path_traversal",
            ThreatKind::CommandInjection => "command_injection",
        }
    }

    fn default_pattern(&self) -> &'static str {
        match self {
            ThreatKind::SqlInjection => {
                r"(?i)(union|select|insert|delete|drop|create|alter|exec|execute|script|javascript|onload|onerror)"
            }
            ThreatKind::XssAttempt => {
                r"(?i)(<script|<iframe|<object|<embed|javascript:|data:text/html)"
            }
            ThreatKind::PathTraversal => r"(?i)(\.\.|/etc/|/bin/|/usr/|/var/|/tmp/)",
            ThreatKind::CommandInjection => r"(;|\||&|`|\$\(|\$\{)",
        }
    }
}

impl std::fmt::Display for ThreatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreatKind::SqlInjection => write!(f, "SQL injection"),
            ThreatKind::XssAttempt => write!(f, "script injection"),
            ThreatKind::PathTraversal => write!(f, "path traversal"),
            ThreatKind::CommandInjection => write!(f, "command injection"),
        }
    }
}

/// Errors from the ReDoS screen applied to configured patterns.
///
/// Rust's regex engine runs in linear time, so catastrophic
/// backtracking is not a live risk here; the screen keeps configured
/// patterns portable to engines where it is, and bounds their size.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegexValidationError {
    #[error("pattern contains a nested quantifier prone to catastrophic backtracking: {0}")]
    NestedQuantifier(String),
}

/// Errors that can occur while building a pattern set.
#[derive(Error, Debug)]
pub enum ThreatPatternError {
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("unsafe pattern: {0}")]
    UnsafePattern(#[from] RegexValidationError),
}

/// Checks a pattern for quantified groups that are themselves
/// quantified (`(a+)+`, `(a*)*`, ...), the classic backtracking shape.
pub fn validate_regex_safe(pattern: &str) -> Result<(), RegexValidationError> {
    let chars: Vec<char> = pattern.chars().collect();
    for i in 1..chars.len() {
        if chars[i - 1] != ')' {
            continue;
        }
        let quantified_group = i >= 2 && matches!(chars[i - 2], '+' | '*' | '?' | '}');
        let outer_quantifier = matches!(chars[i], '+' | '*' | '{');
        if quantified_group && outer_quantifier {
            return Err(RegexValidationError::NestedQuantifier(pattern.to_string()));
        }
    }
    Ok(())
}

/// Compiles a caller-supplied pattern with the size limit and the
/// ReDoS screen applied.
pub fn compile_checked(pattern: &str) -> Result<Regex, ThreatPatternError> {
    validate_regex_safe(pattern)?;
    RegexBuilder::new(pattern)
        .size_limit(MAX_COMPILED_PATTERN_SIZE)
        .build()
        .map_err(|e| ThreatPatternError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// A compiled set of injection heuristics.
pub struct ThreatPatterns {
    patterns: Vec<(ThreatKind, Regex)>,
}

impl ThreatPatterns {
    /// Builds the default set.
    pub fn new() -> Self {
        let patterns = ThreatKind::ALL
            .iter()
            .map(|kind| {
                // Compile-time constants; a failure here is a build defect.
                let re = Regex::new(kind.default_pattern()).expect("invalid default threat pattern");
                (*kind, re)
            })
            .collect();
        Self { patterns }
    }

    /// Builds the default set extended with additional per-kind
    /// patterns, each vetted before compilation.
    pub fn with_additional(
        additional: &[(ThreatKind, String)],
    ) -> Result<Self, ThreatPatternError> {
        let mut set = Self::new();
        for (kind, pattern) in additional {
            let re = compile_checked(pattern)?;
            set.patterns.push((*kind, re));
        }
        Ok(set)
    }

    /// Returns every kind that matches `input`, in scan order, each
    /// kind at most once.
    pub fn scan(&self, input: &str) -> Vec<ThreatKind> {
        let mut found = Vec::new();
        for (kind, re) in &self.patterns {
            if !found.contains(kind) && re.is_match(input) {
                found.push(*kind);
            }
        }
        if !found.is_empty() {
            for kind in &found {
                counter!("formgate_threats_flagged_total", "kind" => kind.as_str()).increment(1);
            }
            tracing::warn!(kinds = ?found, "suspicious input flagged");
        }
        found
    }

    /// Checks `input` against a single kind.
    pub fn matches(&self, kind: ThreatKind, input: &str) -> bool {
        self.patterns
            .iter()
            .any(|(k, re)| *k == kind && re.is_match(input))
    }
}

impl Default for ThreatPatterns {
    fn default() -> Self {
        Self::new()
    }
}
