//! Field-level validation reports.
//!
//! Validators collect every violated field before failing so callers can
//! render one message per input instead of stopping at the first problem.

use std::fmt;

use serde_json::{Value, json};

use super::Error;

/// A single violated input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldViolation {
    /// Wire name of the offending field, e.g. `meterNumber`.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Stable machine-readable reason, e.g. `too_short`.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    fn to_json(&self) -> Value {
        json!({
            "field": self.field,
            "code": self.code,
            "message": self.message,
        })
    }
}

/// Ordered collection of violations gathered by a validator.
///
/// # Examples
/// ```
/// use complaint_desk::domain::FieldViolations;
///
/// let mut violations = FieldViolations::default();
/// violations.push("title", "required", "Title is required");
/// violations.push("address", "required", "Address / location is required");
///
/// let error = violations.into_result().unwrap_err();
/// assert!(error.contains("address"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldViolations(Vec<FieldViolation>);

impl FieldViolations {
    /// Record a violation.
    pub fn push(&mut self, field: &'static str, code: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            code,
            message: message.into(),
        });
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` was recorded at least once.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|violation| violation.field == field)
    }

    /// Field names in recording order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|violation| violation.field).collect()
    }

    /// Iterate over the recorded violations.
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// `Ok(())` when empty, otherwise the collection itself as the error.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "no validation errors"),
            [single] => write!(f, "{}", single.message),
            _ => write!(f, "invalid fields: {}", self.fields().join(", ")),
        }
    }
}

impl std::error::Error for FieldViolations {}

impl From<FieldViolations> for Error {
    fn from(value: FieldViolations) -> Self {
        let fields: Vec<Value> = value.iter().map(FieldViolation::to_json).collect();
        Error::invalid_request(value.to_string()).with_details(json!({ "fields": fields }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn empty_collection_is_ok() {
        assert!(FieldViolations::default().into_result().is_ok());
    }

    #[rstest]
    fn single_violation_uses_its_message() {
        let mut violations = FieldViolations::default();
        violations.push("title", "too_short", "Title must be at least 5 characters");
        assert_eq!(violations.to_string(), "Title must be at least 5 characters");
    }

    #[rstest]
    fn conversion_lists_every_field() {
        let mut violations = FieldViolations::default();
        violations.push("title", "required", "Title is required");
        violations.push("phoneNumber", "required", "Phone number is required for follow-up");

        let error = Error::from(violations);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "invalid fields: title, phoneNumber");
        let fields = error
            .details()
            .and_then(|details| details.get("fields"))
            .and_then(Value::as_array)
            .expect("fields array");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1]["field"], "phoneNumber");
        assert_eq!(fields[1]["code"], "required");
    }
}
