//! Contact-form validation.
//!
//! Composes the sanitizer, the threat scan, and the per-field rules
//! into a single check over a contact submission. Rate limiting is
//! deliberately not part of this: the submission handler checks its
//! per-client budget once per attempt, independent of field validity.

use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::sanitize::Sanitizer;
use crate::threat::ThreatPatterns;
use crate::validation::{
    Alphabet, FieldError, FieldKind, FieldReport, FieldValidator, TextBounds,
};

/// A raw contact-form submission, as received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// Per-field length bounds for the contact form.
///
/// Defaults match the site's form schema: name 2-50 (letters only),
/// email 5-100, subject 5-100, message 10-1000.
#[derive(Debug, Clone, Copy)]
pub struct ContactFormBounds {
    pub name: TextBounds,
    pub email_min: usize,
    pub email_max: usize,
    pub subject: TextBounds,
    pub message: TextBounds,
}

impl Default for ContactFormBounds {
    fn default() -> Self {
        Self {
            name: TextBounds::new(2, 50).with_alphabet(Alphabet::Letters),
            email_min: 5,
            email_max: 100,
            subject: TextBounds::new(5, 100),
            message: TextBounds::new(10, 1000),
        }
    }
}

/// The outcome of validating a whole submission.
///
/// Field reports are produced in form order (name, email, phone,
/// subject, message). `phone` is `None` when the submission carried no
/// phone number, which is valid. `form_valid` is the conjunction of
/// all field results.
#[derive(Debug, Clone)]
pub struct ContactFormReport {
    pub name: FieldReport,
    pub email: FieldReport,
    pub phone: Option<FieldReport>,
    pub subject: FieldReport,
    pub message: FieldReport,
    pub form_valid: bool,
}

impl ContactFormReport {
    /// Flattens the report into `(field name, error)` pairs, in form
    /// order, for rendering a combined error list.
    pub fn field_errors(&self) -> Vec<(&'static str, &FieldError)> {
        let mut out = Vec::new();
        let fields: [(&'static str, Option<&FieldReport>); 5] = [
            ("name", Some(&self.name)),
            ("email", Some(&self.email)),
            ("phone", self.phone.as_ref()),
            ("subject", Some(&self.subject)),
            ("message", Some(&self.message)),
        ];
        for (field, report) in fields {
            if let Some(report) = report {
                for error in &report.errors {
                    out.push((field, error));
                }
            }
        }
        out
    }
}

/// Validates contact submissions.
pub struct ContactFormValidator {
    fields: FieldValidator,
    bounds: ContactFormBounds,
}

impl ContactFormValidator {
    pub fn new() -> Self {
        Self::with_bounds(ContactFormBounds::default())
    }

    pub fn with_bounds(bounds: ContactFormBounds) -> Self {
        Self {
            fields: FieldValidator::new(),
            bounds,
        }
    }

    /// Builds a validator around pre-built parts (e.g. threat patterns
    /// extended from configuration).
    pub fn with_parts(sanitizer: Sanitizer, threats: ThreatPatterns, bounds: ContactFormBounds) -> Self {
        Self {
            fields: FieldValidator::with_parts(sanitizer, threats),
            bounds,
        }
    }

    /// Validates every field and aggregates the result.
    pub fn validate(&self, submission: &ContactSubmission) -> ContactFormReport {
        let name = self
            .fields
            .validate(&submission.name, &FieldKind::FreeText(self.bounds.name));
        let email = self.validate_email(&submission.email);
        let phone = submission
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(|p| self.fields.validate(p, &FieldKind::Phone));
        let subject = self
            .fields
            .validate(&submission.subject, &FieldKind::FreeText(self.bounds.subject));
        let message = self
            .fields
            .validate(&submission.message, &FieldKind::FreeText(self.bounds.message));

        let form_valid = name.valid
            && email.valid
            && phone.as_ref().map_or(true, |p| p.valid)
            && subject.valid
            && message.valid;

        let outcome = if form_valid { "accepted" } else { "rejected" };
        counter!("formgate_submissions_validated_total", "outcome" => outcome).increment(1);
        if !form_valid {
            let failed = [
                (!name.valid, "name"),
                (!email.valid, "email"),
                (!phone.as_ref().map_or(true, |p| p.valid), "phone"),
                (!subject.valid, "subject"),
                (!message.valid, "message"),
            ]
            .iter()
            .filter(|(failed, _)| *failed)
            .map(|(_, field)| *field)
            .collect::<Vec<_>>();
            tracing::debug!(?failed, "contact submission rejected");
            counter!("formgate_fields_failed_total").increment(failed.len() as u64);
        }

        ContactFormReport {
            name,
            email,
            phone,
            subject,
            message,
            form_valid,
        }
    }

    /// Email gets the generic kind check plus the form's own length
    /// policy on the sanitized value.
    fn validate_email(&self, input: &str) -> FieldReport {
        let mut report = self.fields.validate(input, &FieldKind::Email);
        let length = report.sanitized.chars().count();
        if length > 0 {
            if length < self.bounds.email_min {
                report.errors.push(FieldError::TooShort(self.bounds.email_min));
            }
            if length > self.bounds.email_max {
                report.errors.push(FieldError::TooLong(self.bounds.email_max));
            }
            report.valid = report.errors.is_empty();
        }
        report
    }
}

impl Default for ContactFormValidator {
    fn default() -> Self {
        Self::new()
    }
}
