//! YAML security configuration.
//!
//! Deployment knobs for the submission pipeline live in a
//! `security.yaml` file: rate-limit windows, form length bounds, and
//! additional threat patterns. `${VAR}` references are substituted
//! from the environment at load time, and every configured pattern is
//! compiled and vetted before the configuration is accepted, so a bad
//! deploy fails at startup instead of on the first submission.

use std::env;
use std::path::Path;
use std::time::Duration;

use fg_core::threat::{compile_checked, ThreatPatternError, ThreatPatterns};
use fg_core::{Alphabet, ContactFormBounds, ContactFormValidator, Sanitizer, TextBounds, ThreatKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid threat pattern: {0}")]
    Pattern(#[from] ThreatPatternError),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Top-level security configuration.
///
/// Every section has defaults matching the site's shipped policy, so a
/// partial file (or no file at all) is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// General per-client request budget.
    pub rate_limit: RateLimitSettings,
    /// Stricter budget for contact-form submissions.
    pub contact_form_rate_limit: RateLimitSettings,
    /// Contact-form field bounds.
    pub form_bounds: FormBoundsConfig,
    /// Additional threat patterns, appended to the built-in set.
    pub threat_patterns: ThreatPatternConfig,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitSettings {
                max_submissions: 100,
                window_secs: 900,
            },
            contact_form_rate_limit: RateLimitSettings {
                max_submissions: 5,
                window_secs: 3600,
            },
            form_bounds: FormBoundsConfig::default(),
            threat_patterns: ThreatPatternConfig::default(),
        }
    }
}

/// A per-client budget: `max_submissions` attempts per window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateLimitSettings {
    pub max_submissions: u32,
    pub window_secs: u64,
}

impl RateLimitSettings {
    /// The window as a `Duration`, ready for the limiter.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Length bounds for each contact-form field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FormBoundsConfig {
    pub name_min: usize,
    pub name_max: usize,
    pub email_min: usize,
    pub email_max: usize,
    pub subject_min: usize,
    pub subject_max: usize,
    pub message_min: usize,
    pub message_max: usize,
}

impl Default for FormBoundsConfig {
    fn default() -> Self {
        Self {
            name_min: 2,
            name_max: 50,
            email_min: 5,
            email_max: 100,
            subject_min: 5,
            subject_max: 100,
            message_min: 10,
            message_max: 1000,
        }
    }
}

impl FormBoundsConfig {
    fn to_bounds(self) -> ContactFormBounds {
        ContactFormBounds {
            name: TextBounds::new(self.name_min, self.name_max).with_alphabet(Alphabet::Letters),
            email_min: self.email_min,
            email_max: self.email_max,
            subject: TextBounds::new(self.subject_min, self.subject_max),
            message: TextBounds::new(self.message_min, self.message_max),
        }
    }
}

/// Additional threat patterns by kind, appended to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatPatternConfig {
    pub sql_injection: Vec<String>,
    pub xss_attempt: Vec<String>,
    pub path_traversal: Vec<String>,
    pub command_injection: Vec<String>,
}

impl ThreatPatternConfig {
    fn entries(&self) -> Vec<(ThreatKind, String)> {
        let mut entries = Vec::new();
        for (kind, patterns) in [
            (ThreatKind::SqlInjection, &self.sql_injection),
            (ThreatKind::XssAttempt, &self.xss_attempt),
            (ThreatKind::PathTraversal, &self.path_traversal),
            (ThreatKind::CommandInjection, &self.command_injection),
        ] {
            for pattern in patterns {
                entries.push((kind, pattern.clone()));
            }
        }
        entries
    }

    /// Compiles the built-in patterns plus the configured extras.
    pub fn to_patterns(&self) -> Result<ThreatPatterns, ConfigError> {
        Ok(ThreatPatterns::with_additional(&self.entries())?)
    }
}

impl SecurityConfig {
    /// Builds the contact-form validator this configuration describes.
    pub fn contact_validator(&self) -> Result<ContactFormValidator, ConfigError> {
        let threats = self.threat_patterns.to_patterns()?;
        Ok(ContactFormValidator::with_parts(
            Sanitizer::new(),
            threats,
            self.form_bounds.to_bounds(),
        ))
    }
}

/// Substitutes `${VAR_NAME}` references with environment values.
fn substitute_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("invalid env var regex");
    let mut result = input.to_string();
    let mut missing = Vec::new();

    for cap in re.captures_iter(input) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        match env::var(var_name) {
            Ok(value) => result = result.replace(full_match, &value),
            Err(_) => missing.push(var_name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ConfigError::EnvVarNotFound(missing.join(", ")));
    }

    Ok(result)
}

/// Loads and validates the security configuration from a YAML file.
pub fn load_security_config(path: &Path) -> Result<SecurityConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let content = substitute_env_vars(&content)?;
    let config: SecurityConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Rejects configurations the limiter or validator would have to
/// silently clamp.
fn validate_config(config: &SecurityConfig) -> Result<(), ConfigError> {
    for (name, settings) in [
        ("rate_limit", &config.rate_limit),
        ("contact_form_rate_limit", &config.contact_form_rate_limit),
    ] {
        if settings.max_submissions == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "{name}.max_submissions must be > 0"
            )));
        }
        if settings.window_secs == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "{name}.window_secs must be > 0"
            )));
        }
    }

    let b = &config.form_bounds;
    for (name, min, max) in [
        ("name", b.name_min, b.name_max),
        ("email", b.email_min, b.email_max),
        ("subject", b.subject_min, b.subject_max),
        ("message", b.message_min, b.message_max),
    ] {
        if min > max {
            return Err(ConfigError::InvalidValue(format!(
                "form_bounds.{name}: min ({min}) exceeds max ({max})"
            )));
        }
    }

    // Compile every configured pattern now rather than on first use.
    for (_, pattern) in config.threat_patterns.entries() {
        compile_checked(&pattern)?;
    }

    Ok(())
}
