//! In-process `UserRepository` for tests and database-less runs.
//!
//! Records live in a map guarded by a single lock, so a uniqueness check
//! and the write it guards happen atomically, mirroring the unique index on
//! the PostgreSQL table.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserId};

/// Map-backed user repository.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.users
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().len(), |users| users.len())
    }

    /// Whether no profile is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

fn email_taken(users: &HashMap<UserId, User>, candidate: &User) -> bool {
    users
        .values()
        .any(|stored| stored.id() != candidate.id() && stored.email() == candidate.email())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.contains_key(user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already stored",
                user.id()
            )));
        }
        if email_taken(&users, user) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_str()));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(poisoned)?;
        if !users.contains_key(user.id()) {
            return Err(UserPersistenceError::missing(user.id().to_string()));
        }
        if email_taken(&users, user) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_str()));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserName;
    use rstest::{fixture, rstest};

    fn user(email: &str) -> User {
        User::new(
            Email::new(email).expect("email"),
            UserName::new("Ada").expect("name"),
        )
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_users_are_found_by_id_and_email(repo: InMemoryUserRepository) {
        let stored = user("ada@example.com");
        repo.insert(&stored).await.expect("insert");

        let by_id = repo.find_by_id(stored.id()).await.expect("lookup");
        let by_email = repo.find_by_email(stored.email()).await.expect("lookup");

        assert_eq!(by_id.as_ref(), Some(&stored));
        assert_eq!(by_email.as_ref(), Some(&stored));
        assert_eq!(repo.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn equivalent_domains_collide(repo: InMemoryUserRepository) {
        repo.insert(&user("ada@EXAMPLE.com")).await.expect("insert");

        let err = repo
            .insert(&user("ada@example.COM"))
            .await
            .expect_err("duplicate");

        assert_eq!(err, UserPersistenceError::duplicate_email("ada@example.com"));
        assert_eq!(repo.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_requires_an_existing_profile(repo: InMemoryUserRepository) {
        let err = repo
            .update(&user("ghost@example.com"))
            .await
            .expect_err("missing");
        assert!(matches!(err, UserPersistenceError::Missing { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_rejects_email_taken_by_another_profile(repo: InMemoryUserRepository) {
        let ada = user("ada@example.com");
        let bob = user("bob@example.com");
        repo.insert(&ada).await.expect("insert");
        repo.insert(&bob).await.expect("insert");

        let renamed = User::with_id(
            *bob.id(),
            ada.email().clone(),
            UserName::new("Bob").expect("name"),
        );
        let err = repo.update(&renamed).await.expect_err("duplicate");

        assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
    }
}
