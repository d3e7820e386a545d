//! Request-schema validation contract.
//!
//! A [`Validator`] turns an untrusted JSON payload into a typed value or a set
//! of per-field errors. Errors collect under the offending field name, or
//! under [`NON_FIELD_ERRORS`] when the payload as a whole is unusable.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use super::Error;

/// Key used for errors that concern the whole payload.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Machine-readable reason a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// The field was absent.
    Required,
    /// The field was present but `null`.
    Null,
    /// The field was empty once trimmed.
    Blank,
    /// The value had the wrong type or shape.
    Invalid,
    /// The value exceeded the allowed length.
    MaxLength,
}

/// A single rejected constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    code: FieldErrorCode,
    message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Reason code.
    #[must_use]
    pub fn code(&self) -> FieldErrorCode {
        self.code
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Errors keyed by field name, in stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<FieldError>>);

impl ValidationErrors {
    /// Start an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common single-error case.
    pub fn single(field: impl Into<String>, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.add(field, error);
        errors
    }

    /// Record an error against `field`.
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.entry(field.into()).or_default().push(error);
    }

    /// Errors recorded for `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> &[FieldError] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::invalid_request("request validation failed")
            .with_details(json!({ "fields": errors }))
    }
}

/// A validatable schema producing `Output` from a JSON payload.
pub trait Validator {
    /// Typed value produced on success.
    type Output;

    /// Validate `input`, returning every field error found.
    fn validate(&self, input: &Value) -> Result<Self::Output, ValidationErrors>;
}

/// Human-readable JSON type name used in shape errors.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
