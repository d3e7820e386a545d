//! Internal Diesel row structs for the `user_profiles` table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::User;

use super::schema::user_profiles;

/// Row read from `user_profiles`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserProfileRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    #[expect(dead_code, reason = "selected for parity with the table; not mapped")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "selected for parity with the table; not mapped")]
    pub updated_at: DateTime<Utc>,
}

/// New row; timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub(crate) struct NewUserProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password: Option<&'a str>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl<'a> From<&'a User> for NewUserProfileRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().as_str(),
            name: user.name().as_ref(),
            password: user.password_hash().map(|hash| hash.as_str()),
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
        }
    }
}

/// Changeset written by `save`. `password` is always written so clearing it
/// sets the column to null.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: Option<&'a str>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl<'a> From<&'a User> for UserProfileUpdate<'a> {
    fn from(user: &'a User) -> Self {
        let row = NewUserProfileRow::from(user);
        Self {
            email: row.email,
            name: row.name,
            password: row.password,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        }
    }
}
