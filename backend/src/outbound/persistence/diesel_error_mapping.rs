//! Diesel and pool failures translated into `UserPersistenceError`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::Email;
use crate::domain::ports::UserPersistenceError;

use super::pool::PoolError;

pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map read failures; no constraint can fire on a read.
pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    log_diesel_error(&error);
    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Unique index over `user_profiles.email`, named in the initial migration.
const EMAIL_UNIQUE_CONSTRAINT: &str = "user_profiles_email_key";

/// Map write failures. Only a violation of the email index is a duplicate
/// email; any other unique violation (a primary-key clash) is a query error.
pub(super) fn map_write_error(error: DieselError, email: &Email) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        log_diesel_error(&error);
        return if info.constraint_name() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            UserPersistenceError::duplicate_email(email.as_str())
        } else {
            UserPersistenceError::query("duplicate key")
        };
    }
    map_diesel_error(error)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("user_profiles")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn violation_of(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(StubInfo {
                message: "stub failure",
                constraint,
            }),
        )
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        violation_of(kind, None)
    }

    fn email() -> Email {
        Email::new("ada@example.com").expect("email")
    }

    #[rstest]
    fn email_index_violation_is_duplicate_email() {
        let error = violation_of(
            DatabaseErrorKind::UniqueViolation,
            Some(EMAIL_UNIQUE_CONSTRAINT),
        );
        let err = map_write_error(error, &email());
        assert_eq!(err, UserPersistenceError::duplicate_email("ada@example.com"));
    }

    #[rstest]
    #[case(Some("user_profiles_pkey"))]
    #[case(None)]
    fn other_unique_violations_are_query_errors(#[case] constraint: Option<&'static str>) {
        let error = violation_of(DatabaseErrorKind::UniqueViolation, constraint);
        let err = map_write_error(error, &email());
        assert_eq!(err, UserPersistenceError::query("duplicate key"));
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), UserPersistenceError::connection("database connection error"))]
    #[case(database_error(DatabaseErrorKind::CheckViolation), UserPersistenceError::query("database error"))]
    #[case(DieselError::NotFound, UserPersistenceError::query("record not found"))]
    fn other_failures_map_to_connection_or_query(
        #[case] error: DieselError,
        #[case] expected: UserPersistenceError,
    ) {
        assert_eq!(map_write_error(error, &email()), expected);
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }
}
