//! Domain ports: the traits adapters implement so the domain never imports
//! Diesel, Argon2, or actix types.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
