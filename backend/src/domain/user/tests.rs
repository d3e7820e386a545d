//! Tests for the user profile aggregate.

use super::*;
use rstest::{fixture, rstest};

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn email() -> Email {
    Email::new("ada@Example.com").expect("valid email")
}

#[fixture]
fn name() -> UserName {
    UserName::new("Ada Lovelace").expect("valid name")
}

#[fixture]
fn user(email: Email, name: UserName) -> User {
    User::new(email, name)
}

#[rstest]
fn fresh_profiles_use_default_flags(user: User) {
    assert!(user.is_active);
    assert!(user.is_staff);
    assert!(!user.is_superuser);
    assert!(!user.has_usable_password());
}

#[rstest]
fn superuser_raises_every_flag(user: User) {
    let mut inactive = user;
    inactive.is_active = false;
    inactive.is_staff = false;

    let promoted = inactive.into_superuser();
    assert!(promoted.is_superuser);
    assert!(promoted.is_staff);
    assert!(promoted.is_active);
}

#[rstest]
fn renders_as_normalised_email(user: User) {
    assert_eq!(user.to_string(), "ada@example.com");
}

#[rstest]
fn full_and_short_names_are_the_display_name(user: User) {
    assert_eq!(user.full_name(), "Ada Lovelace");
    assert_eq!(user.short_name(), "Ada Lovelace");
}

#[rstest]
fn password_hash_can_be_set_and_cleared(user: User) {
    let mut user = user.with_password_hash(Some(PasswordHash::from_encoded("$argon2id$stub")));
    assert!(user.has_usable_password());
    user.set_password_hash(None);
    assert!(user.password_hash().is_none());
}

#[rstest]
fn with_id_keeps_the_supplied_identifier(email: Email, name: UserName) {
    let id = UserId::new(VALID_ID).expect("valid id");
    let user = User::with_id(id, email, name);
    assert_eq!(user.id().to_string(), VALID_ID);
}

#[rstest]
#[case("")]
#[case("not-a-uuid")]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
fn user_id_rejects_malformed_values(#[case] raw: &str) {
    assert_eq!(UserId::new(raw), Err(UserValidationError::InvalidId));
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn user_name_rejects_blank_values(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserName::new(raw), Err(expected));
}

#[rstest]
fn user_name_accepts_the_maximum_length() {
    let raw = "n".repeat(USER_NAME_MAX);
    assert!(UserName::new(raw).is_ok());
}

#[rstest]
fn user_name_rejects_overlong_values() {
    let raw = "n".repeat(USER_NAME_MAX + 1);
    assert_eq!(
        UserName::new(raw),
        Err(UserValidationError::NameTooLong {
            max: USER_NAME_MAX
        })
    );
}
