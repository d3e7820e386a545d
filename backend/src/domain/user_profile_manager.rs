//! Creation, persistence, and email-based authentication of user profiles.
//!
//! The manager owns the rules (email normalisation, privilege defaults,
//! password hashing) and delegates storage to a [`UserRepository`] and
//! hashing to a [`PasswordHasher`].

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use super::ports::{PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository};
use super::{
    Email, EmailValidationError, Error, Password, PasswordHash, User, UserId, UserName,
    UserValidationError,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Application service for user profiles.
#[derive(Clone)]
pub struct UserProfileManager {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserProfileManager {
    /// Build a manager over the given adapters.
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create and persist a regular profile.
    ///
    /// Without a password the profile exists but cannot authenticate until
    /// [`UserProfileManager::set_password`] and [`UserProfileManager::save`]
    /// give it one.
    ///
    /// # Errors
    /// - `invalid_request` when `email` is blank or malformed, or `name` is
    ///   invalid.
    /// - `conflict` when the normalised email is already registered.
    /// - `service_unavailable`/`internal_error` for storage or hashing
    ///   failures.
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password: Option<&Password>,
    ) -> Result<User, Error> {
        let user = self.build_user(email, name, password)?;
        self.insert(&user).await?;
        info!(user_id = %user.id(), email = %user.email(), "created user profile");
        Ok(user)
    }

    /// Create and persist a superuser.
    ///
    /// The profile is written once with every privilege flag already raised,
    /// so a failed write leaves nothing behind.
    ///
    /// # Errors
    /// As for [`UserProfileManager::create_user`].
    pub async fn create_superuser(
        &self,
        email: &str,
        name: &str,
        password: &Password,
    ) -> Result<User, Error> {
        let user = self.build_user(email, name, Some(password))?.into_superuser();
        self.insert(&user).await?;
        info!(user_id = %user.id(), email = %user.email(), "created superuser profile");
        Ok(user)
    }

    /// Load a stored profile by id.
    ///
    /// # Errors
    /// `not_found` when no profile has this id; `service_unavailable` or
    /// `internal_error` for storage failures.
    pub async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} does not exist")))
    }

    /// Persist field changes made to an existing profile.
    ///
    /// # Errors
    /// `not_found` when the profile was never stored, `conflict` when its
    /// email now collides with another profile.
    pub async fn save(&self, user: &User) -> Result<(), Error> {
        self.repository
            .update(user)
            .await
            .map_err(map_persistence_error)?;
        debug!(user_id = %user.id(), "saved user profile");
        Ok(())
    }

    /// Replace the profile's password hash in memory; call
    /// [`UserProfileManager::save`] to persist it. `None` leaves the profile
    /// without a usable password.
    ///
    /// # Errors
    /// `internal_error` when hashing fails.
    pub fn set_password(&self, user: &mut User, password: Option<&Password>) -> Result<(), Error> {
        let hash = self.hash_optional(password)?;
        user.set_password_hash(hash);
        Ok(())
    }

    /// Authenticate by email and password.
    ///
    /// Unknown emails, wrong passwords, inactive profiles and profiles
    /// without a password all fail with the same `unauthorized` error.
    ///
    /// # Errors
    /// `unauthorized` on any credential mismatch; `service_unavailable` or
    /// `internal_error` for storage or hash-format failures.
    pub async fn authenticate(&self, email: &str, password: &Password) -> Result<User, Error> {
        let Ok(email) = Email::new(email) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let Some(user) = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(map_persistence_error)?
        else {
            // Keep the response time close to the known-email path.
            let _ = self.hasher.hash(password);
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let Some(hash) = user.password_hash() else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let verified = self
            .hasher
            .verify(password, hash)
            .map_err(map_hash_error)?;
        if !verified || !user.is_active {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(user)
    }

    fn build_user(
        &self,
        email: &str,
        name: &str,
        password: Option<&Password>,
    ) -> Result<User, Error> {
        let email = Email::new(email).map_err(map_email_error)?;
        let name = UserName::new(name).map_err(map_name_error)?;
        let hash = self.hash_optional(password)?;
        Ok(User::new(email, name).with_password_hash(hash))
    }

    fn hash_optional(&self, password: Option<&Password>) -> Result<Option<PasswordHash>, Error> {
        password
            .map(|plain| self.hasher.hash(plain))
            .transpose()
            .map_err(map_hash_error)
    }

    async fn insert(&self, user: &User) -> Result<(), Error> {
        self.repository
            .insert(user)
            .await
            .map_err(map_persistence_error)
    }
}

fn field_error(message: String, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn map_email_error(err: EmailValidationError) -> Error {
    let code = match err {
        EmailValidationError::Empty => "empty_email",
        EmailValidationError::MissingDomain => "invalid_email",
        EmailValidationError::TooLong { .. } => "email_too_long",
    };
    field_error(err.to_string(), "email", code)
}

fn map_name_error(err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyName => "empty_name",
        UserValidationError::NameTooLong { .. } => "name_too_long",
        UserValidationError::InvalidId => "invalid_id",
    };
    field_error(err.to_string(), "name", code)
}

fn map_hash_error(err: PasswordHashError) -> Error {
    Error::internal(err.to_string())
}

fn map_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("a user with email {email} already exists"))
                .with_details(json!({ "field": "email", "code": "duplicate_email" }))
        }
        UserPersistenceError::Missing { id } => Error::not_found(format!("user {id} does not exist")),
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}
