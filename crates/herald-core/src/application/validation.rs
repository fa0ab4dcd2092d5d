//! Structural request validation
//!
//! Validators are pure: no I/O and no ports. Every rule is evaluated so
//! the caller sees all failures at once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Implemented by every request type
pub trait Validate {
    fn validate(&self) -> ValidationResult;
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

/// All failures found in one request; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    failures: Vec<FieldFailure>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `passes` holds
    pub fn check(&mut self, field: &str, passes: bool, message: &str) -> &mut Self {
        if !passes {
            self.add(field, message);
        }
        self
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.failures.push(FieldFailure {
            field: field.to_string(),
            message: message.into(),
        });
        self
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }

    pub fn messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message.as_str()).collect()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationErrors(self.failures))
        }
    }
}

/// Non-empty set of failures returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(Vec<FieldFailure>);

impl ValidationErrors {
    pub fn failures(&self) -> &[FieldFailure] {
        &self.0
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|f| f.message.as_str()).collect()
    }

    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|f| f.field == field)
            .map(|f| f.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", failure.field, failure.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Non-blank text
pub(crate) fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Loose mail address shape check: one `@`, non-empty local part, dotted domain
pub(crate) fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_collects_every_failure() {
        let mut result = ValidationResult::new();
        result
            .check("a", false, "a broken")
            .check("b", true, "b broken")
            .check("c", false, "c broken");

        assert!(!result.is_valid());
        assert_eq!(result.messages(), vec!["a broken", "c broken"]);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationResult::new().into_result().is_ok());

        let mut result = ValidationResult::new();
        result.add("rating", "rating out of range");
        let errors = result.into_result().unwrap_err();
        assert_eq!(errors.for_field("rating"), vec!["rating out of range"]);
        assert_eq!(errors.to_string(), "rating: rating out of range");
    }

    #[test]
    fn test_display_joins_failures() {
        let mut result = ValidationResult::new();
        result.add("title", "title required").add("venue", "venue required");
        let errors = result.into_result().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "title: title required; venue: venue required"
        );
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("ada@example.com"));
        assert!(looks_like_email(" ada@mail.example.org "));
        assert!(!looks_like_email("ada.example.com"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ada@localhost"));
        assert!(!looks_like_email("ada@@example.com"));
        assert!(!looks_like_email("ada lovelace@example.com"));
        assert!(!looks_like_email("ada@example."));
    }

    #[test]
    fn test_present() {
        assert!(present("x"));
        assert!(!present("  "));
    }
}
