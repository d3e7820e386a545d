//! Driven port for storing user profiles.
//!
//! Adapters own atomicity: each call is a single-row write or read and must
//! enforce email uniqueness themselves (unique index, map lookup, ...).

use async_trait::async_trait;

use crate::domain::{Email, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "user repository query failed: {message}",
        /// Another profile already uses this email.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
        /// An update targeted a profile that is not stored.
        Missing { id: String } => "user {id} does not exist",
    }
}

/// Persistence capability for [`User`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new profile.
    ///
    /// # Errors
    /// [`UserPersistenceError::DuplicateEmail`] when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite the stored fields of an existing profile.
    ///
    /// # Errors
    /// [`UserPersistenceError::Missing`] when no profile has this id;
    /// [`UserPersistenceError::DuplicateEmail`] when the new email is taken.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a profile by storage identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a profile by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;
}
