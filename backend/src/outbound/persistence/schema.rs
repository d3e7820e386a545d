//! Diesel table definitions. Keep in step with `backend/migrations`.

diesel::table! {
    /// User profiles; `email` carries a unique index.
    user_profiles (id) {
        /// Surrogate key (UUID v4).
        id -> Uuid,
        /// Normalised login identifier.
        email -> Varchar,
        /// Display name.
        name -> Varchar,
        /// PHC-encoded hash; null when no password is set.
        password -> Nullable<Varchar>,
        /// Whether the profile may authenticate.
        is_active -> Bool,
        /// Staff marker.
        is_staff -> Bool,
        /// Superuser marker.
        is_superuser -> Bool,
        /// Insert timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp (maintained by trigger).
        updated_at -> Timestamptz,
    }
}
