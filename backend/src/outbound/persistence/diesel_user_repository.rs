//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Email uniqueness is enforced by the `user_profiles_email_key` index, so
//! each write is a single statement and either lands whole or not at all.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, User, UserId, UserName};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_write_error};
use super::models::{NewUserProfileRow, UserProfileRow, UserProfileUpdate};
use super::pool::DbPool;
use super::schema::user_profiles;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Rebuild the aggregate; stored values that no longer validate surface as
/// query errors rather than panics.
fn row_to_user(row: UserProfileRow) -> Result<User, UserPersistenceError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let name = UserName::new(row.name)
        .map_err(|err| UserPersistenceError::query(format!("stored name invalid: {err}")))?;
    let mut user = User::with_id(UserId::from_uuid(row.id), email, name)
        .with_password_hash(row.password.map(PasswordHash::from_encoded));
    user.is_active = row.is_active;
    user.is_staff = row.is_staff;
    user.is_superuser = row.is_superuser;
    Ok(user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(user_profiles::table)
            .values(NewUserProfileRow::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email()))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(user_profiles::table.find(*user.id().as_uuid()))
            .set(UserProfileUpdate::from(user))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email()))?;
        if affected == 0 {
            return Err(UserPersistenceError::missing(user.id().to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserProfileRow> = user_profiles::table
            .find(*id.as_uuid())
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserProfileRow> = user_profiles::table
            .filter(user_profiles::email.eq(email.as_str()))
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(email: &str, password: Option<&str>) -> UserProfileRow {
        UserProfileRow {
            id: Uuid::nil(),
            email: email.to_owned(),
            name: "Ada".to_owned(),
            password: password.map(str::to_owned),
            is_active: false,
            is_staff: true,
            is_superuser: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[rstest]
    fn rows_rebuild_users_with_stored_flags() {
        let user = row_to_user(row("ada@example.com", Some("$argon2id$x"))).expect("valid row");

        assert_eq!(user.id(), &UserId::from_uuid(Uuid::nil()));
        assert!(!user.is_active);
        assert!(user.is_superuser);
        assert!(user.has_usable_password());
    }

    #[rstest]
    fn rows_with_invalid_email_are_query_errors() {
        let err = row_to_user(row("not-an-email", None)).expect_err("invalid row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn insert_rows_borrow_the_aggregate() {
        let user = row_to_user(row("ada@example.com", None)).expect("valid row");
        let insert = NewUserProfileRow::from(&user);

        assert_eq!(insert.email, "ada@example.com");
        assert_eq!(insert.password, None);
        assert!(insert.is_superuser);
    }
}
