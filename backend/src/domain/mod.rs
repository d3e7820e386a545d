//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed profile model and the greeting input
//! schema used by the HTTP adapters, independent of actix, Diesel, or
//! Argon2. Adapters depend on this module; it depends on none of them.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - TraceId: per-request correlation identifier.
//! - Email, User, UserId, UserName: the profile model.
//! - Password, PasswordHash: credential wrappers.
//! - UserProfileManager: profile creation and authentication service.
//! - HelloValidator, GreetingName, Validator, ValidationErrors: request
//!   validation.

pub mod email;
pub mod error;
pub mod greeting;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_profile_manager;
pub mod validation;

pub use self::email::{EMAIL_MAX, Email, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::greeting::{GREETING_NAME_MAX, GreetingName, HelloValidator};
pub use self::password::{Password, PasswordHash};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USER_NAME_MAX, User, UserId, UserName, UserValidationError};
pub use self::user_profile_manager::UserProfileManager;
pub use self::validation::{
    FieldError, FieldErrorCode, NON_FIELD_ERRORS, ValidationErrors, Validator,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use profiles_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
