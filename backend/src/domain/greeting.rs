//! Greeting input schema shared by the hello endpoints.

use std::fmt;

use serde_json::Value;

use super::validation::{
    FieldError, FieldErrorCode, NON_FIELD_ERRORS, ValidationErrors, Validator, json_type_name,
};

/// Maximum length of a greeting name, counted after trimming.
pub const GREETING_NAME_MAX: usize = 10;

const NAME_FIELD: &str = "name";

/// Validated name to greet.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`GREETING_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingName(String);

impl GreetingName {
    /// Borrow the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The greeting sent back to the caller.
    ///
    /// # Examples
    /// ```
    /// use profiles_api::domain::{HelloValidator, Validator};
    /// use serde_json::json;
    ///
    /// let name = HelloValidator.validate(&json!({ "name": "Sam" })).unwrap();
    /// assert_eq!(name.greeting(), "Hello Sam");
    /// ```
    #[must_use]
    pub fn greeting(&self) -> String {
        format!("Hello {}", self.0)
    }
}

impl fmt::Display for GreetingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema with a single required `name` string field.
///
/// Numbers are accepted and read as their decimal text; booleans, arrays and
/// objects are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelloValidator;

impl Validator for HelloValidator {
    type Output = GreetingName;

    fn validate(&self, input: &Value) -> Result<Self::Output, ValidationErrors> {
        let Value::Object(fields) = input else {
            return Err(ValidationErrors::single(
                NON_FIELD_ERRORS,
                FieldError::new(
                    FieldErrorCode::Invalid,
                    format!(
                        "Invalid data. Expected a dictionary, but got {}.",
                        json_type_name(input)
                    ),
                ),
            ));
        };

        let raw = match fields.get(NAME_FIELD) {
            None => return Err(name_error(FieldErrorCode::Required, "This field is required.")),
            Some(Value::Null) => {
                return Err(name_error(FieldErrorCode::Null, "This field may not be null."));
            }
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(_) => return Err(name_error(FieldErrorCode::Invalid, "Not a valid string.")),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(name_error(FieldErrorCode::Blank, "This field may not be blank."));
        }
        if trimmed.chars().count() > GREETING_NAME_MAX {
            return Err(name_error(
                FieldErrorCode::MaxLength,
                format!("Ensure this field has no more than {GREETING_NAME_MAX} characters."),
            ));
        }
        Ok(GreetingName(trimmed.to_owned()))
    }
}

fn name_error(code: FieldErrorCode, message: impl Into<String>) -> ValidationErrors {
    ValidationErrors::single(NAME_FIELD, FieldError::new(code, message))
}
