//! Login identifier for user profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum stored length of an email address.
pub const EMAIL_MAX: usize = 255;

/// Reasons an email address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Nothing left after trimming whitespace.
    #[error("user must have a non-empty email address")]
    Empty,
    /// No `@` separating a local part from a domain.
    #[error("email address must contain a local part and a domain separated by '@'")]
    MissingDomain,
    /// Longer than [`EMAIL_MAX`] characters.
    #[error("email address must be at most {max} characters")]
    TooLong {
        /// Configured maximum.
        max: usize,
    },
}

/// Normalised email address.
///
/// ## Invariants
/// - Surrounding whitespace is removed.
/// - The domain (text after the last `@`) is lowercase; the local part keeps
///   the caller's casing.
///
/// # Examples
/// ```
/// use profiles_api::domain::Email;
///
/// let email = Email::new("Ada.Lovelace@EXAMPLE.com").unwrap();
/// assert_eq!(email.as_ref(), "Ada.Lovelace@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        let Some((local, domain)) = trimmed.rsplit_once('@') else {
            return Err(EmailValidationError::MissingDomain);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(EmailValidationError::MissingDomain);
        }
        let normalised = format!("{local}@{}", domain.to_lowercase());
        if normalised.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a@EXAMPLE.com", "a@example.com")]
    #[case("  Bob@Example.ORG ", "Bob@example.org")]
    #[case("first@second@MAIL.test", "first@second@mail.test")]
    fn lowercases_only_the_domain(#[case] raw: &str, #[case] expected: &str) {
        let email = Email::new(raw).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    fn differently_cased_domains_compare_equal() {
        let upper = Email::new("a@EXAMPLE.com").expect("valid email");
        let lower = Email::new("a@example.com").expect("valid email");
        assert_eq!(upper, lower);
    }

    #[rstest]
    #[case("", EmailValidationError::Empty)]
    #[case("   ", EmailValidationError::Empty)]
    #[case("no-at-sign", EmailValidationError::MissingDomain)]
    #[case("@example.com", EmailValidationError::MissingDomain)]
    #[case("user@", EmailValidationError::MissingDomain)]
    fn rejects_malformed_addresses(#[case] raw: &str, #[case] expected: EmailValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_addresses() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            Email::new(raw),
            Err(EmailValidationError::TooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn deserialising_normalises() {
        let email: Email = serde_json::from_str("\"x@Y.Z\"").expect("decodes");
        assert_eq!(email.as_str(), "x@y.z");
    }
}
