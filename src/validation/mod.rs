//! Field-level validation
//!
//! Every write is checked against an explicit rule table before any store
//! access. Rules for one field are evaluated in order and stop at the first
//! failure; all fields are always evaluated so the caller gets the complete
//! error set in one round trip.

pub mod rules;

use serde::Serialize;
use std::fmt;

pub use rules::{Predicate, Rule, CONTACT_RULES, DEPARTMENT_RULES, ENROLLEE_RULES, ORGANIZATION_RULES};

/// Read access to the raw values of a submitted field set
pub trait FieldSource {
    /// Value of `field`, or `None` when the caller did not supply it
    fn field(&self, field: &str) -> Option<&str>;
}

/// Whether absent required fields are an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full field set, required fields must be present
    Create,
    /// Partial field set, absent fields are left unchanged
    Update,
}

/// A single field-format violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every violation found in one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Merge errors from a nested record, prefixing their field names
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.errors {
            self.push(format!("{}.{}", prefix, error.field), error.message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether `field` has at least one violation
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Evaluates a rule table against a field set
#[derive(Debug, Clone, Copy)]
pub struct ValidationGate {
    rules: &'static [Rule],
}

impl ValidationGate {
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn enrollee() -> Self {
        Self::new(ENROLLEE_RULES)
    }

    pub fn department() -> Self {
        Self::new(DEPARTMENT_RULES)
    }

    pub fn organization() -> Self {
        Self::new(ORGANIZATION_RULES)
    }

    pub fn contact() -> Self {
        Self::new(CONTACT_RULES)
    }

    /// Collect every violation in `source`
    pub fn evaluate(&self, source: &impl FieldSource, mode: Mode) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let mut failed: Vec<&'static str> = Vec::new();

        for rule in self.rules {
            if failed.contains(&rule.field) {
                continue;
            }

            let value = source.field(rule.field);
            if !rule.predicate.accepts(value, mode) {
                errors.push(rule.field, rule.message);
                failed.push(rule.field);
            }
        }

        errors
    }

    /// Like [`evaluate`](Self::evaluate) but as a `Result`
    pub fn check(&self, source: &impl FieldSource, mode: Mode) -> Result<(), ValidationErrors> {
        self.evaluate(source, mode).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fields(HashMap<&'static str, &'static str>);

    impl FieldSource for Fields {
        fn field(&self, field: &str) -> Option<&str> {
            self.0.get(field).copied()
        }
    }

    fn fields(pairs: &[(&'static str, &'static str)]) -> Fields {
        Fields(pairs.iter().copied().collect())
    }

    #[test]
    fn test_collects_errors_across_fields() {
        let source = fields(&[
            ("name", "R2D2"),
            ("roll_code", "CS-001"),
            ("email", "not-an-email"),
            ("phone", "12345"),
            ("category", "General"),
        ]);

        let errors = ValidationGate::enrollee().evaluate(&source, Mode::Create);
        assert_eq!(errors.len(), 3);
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("phone"));
    }

    #[test]
    fn test_stops_at_first_failure_per_field() {
        // blank phone fails presence and would fail the digit rule as well
        let source = fields(&[
            ("name", "Asha Rao"),
            ("roll_code", "CS-001"),
            ("email", "asha@example.com"),
            ("phone", ""),
            ("category", "General"),
        ]);

        let errors = ValidationGate::enrollee().evaluate(&source, Mode::Create);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "phone");
    }

    #[test]
    fn test_update_mode_skips_absent_fields() {
        let source = fields(&[("email", "asha@example.com")]);
        assert!(ValidationGate::enrollee().check(&source, Mode::Update).is_ok());
        assert!(ValidationGate::enrollee().check(&source, Mode::Create).is_err());
    }

    #[test]
    fn test_update_mode_still_rejects_blank_values() {
        let source = fields(&[("name", "  ")]);
        let errors = ValidationGate::enrollee().evaluate(&source, Mode::Update);
        assert!(errors.has("name"));
    }

    #[test]
    fn test_prefixed_errors_and_display() {
        let mut errors = ValidationErrors::new();
        errors.extend_prefixed("contacts[1]", ValidationErrors::single("email", "invalid email"));
        assert!(errors.has("contacts[1].email"));
        assert_eq!(errors.to_string(), "contacts[1].email: invalid email");
    }
}
