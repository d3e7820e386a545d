//! User profile aggregate.
//!
//! A profile is identified to people by its [`Email`] and to storage by a
//! [`UserId`]. Construction goes through [`User::new`], which applies the
//! defaults every fresh profile starts with; privileged profiles are derived
//! with [`User::into_superuser`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Email, PasswordHash};

/// Maximum length of a profile's display name.
pub const USER_NAME_MAX: usize = 255;

/// Validation errors for user profile components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Display name was blank.
    #[error("name must not be empty")]
    EmptyName,
    /// Display name exceeded [`USER_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Configured maximum.
        max: usize,
    },
}

/// Storage identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable label for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate a display name. Surrounding whitespace is kept.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A user profile record.
///
/// ## Invariants
/// - `email` is normalised and unique across stored profiles.
/// - `password` holds a derived hash; `None` marks the profile as unable to
///   authenticate.
/// - Fresh profiles are active and staff, but not superusers.
///
/// Flags are public so callers can assign them before persisting through
/// `UserProfileManager::save`.
///
/// # Examples
/// ```
/// use profiles_api::domain::{Email, User, UserName};
///
/// let user = User::new(
///     Email::new("ada@Example.com").unwrap(),
///     UserName::new("Ada").unwrap(),
/// );
/// assert!(user.is_active && user.is_staff && !user.is_superuser);
/// assert_eq!(user.to_string(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: UserName,
    password: Option<PasswordHash>,
    /// Whether the profile may authenticate.
    pub is_active: bool,
    /// Staff marker; defaults to true for every profile.
    pub is_staff: bool,
    /// Unrestricted administrative marker.
    pub is_superuser: bool,
}

impl User {
    /// Build a fresh profile with a random identifier and default flags.
    #[must_use]
    pub fn new(email: Email, name: UserName) -> Self {
        Self::with_id(UserId::random(), email, name)
    }

    /// Build a fresh profile with a caller-chosen identifier.
    #[must_use]
    pub fn with_id(id: UserId, email: Email, name: UserName) -> Self {
        Self {
            id,
            email,
            name,
            password: None,
            is_active: true,
            is_staff: true,
            is_superuser: false,
        }
    }

    /// Raise every privilege flag.
    #[must_use]
    pub fn into_superuser(mut self) -> Self {
        self.is_superuser = true;
        self.is_staff = true;
        self.is_active = true;
        self
    }

    /// Attach the stored password hash (or clear it).
    #[must_use]
    pub fn with_password_hash(mut self, password: Option<PasswordHash>) -> Self {
        self.password = password;
        self
    }

    /// Replace the stored password hash in place.
    pub fn set_password_hash(&mut self, password: Option<PasswordHash>) {
        self.password = password;
    }

    /// Storage identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised login identifier.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Rename the profile.
    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
    }

    /// Full name shown in administrative listings.
    #[must_use]
    pub fn full_name(&self) -> &str {
        self.name.as_ref()
    }

    /// Short name shown in greetings.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.as_ref()
    }

    /// Stored password hash, if any.
    #[must_use]
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password.as_ref()
    }

    /// Whether a password has been set.
    #[must_use]
    pub fn has_usable_password(&self) -> bool {
        self.password.is_some()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.email, f)
    }
}

#[cfg(test)]
mod tests;
