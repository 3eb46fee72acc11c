//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes a table, regenerate this file with `diesel print-schema` or update
//! it by hand.

diesel::table! {
    /// Registered accounts.
    ///
    /// Case-insensitive uniqueness of `username` and `email` is enforced by
    /// expression indexes on `lower(...)`, which Diesel does not model.
    users (id) {
        /// Random hex identifier assigned at sign-up.
        id -> Text,
        /// Username as entered, after trimming.
        username -> Text,
        /// Name shown to other users; defaults to the username.
        display_name -> Text,
        /// Email address as entered, after trimming.
        email -> Text,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Server-side sign-in sessions.
    sessions (id) {
        /// Random hex token carried by the session cookie.
        id -> Text,
        /// Owning account; rows cascade when the account is deleted.
        user_id -> Text,
        /// Instant after which the session is no longer honoured.
        expires_at -> Timestamptz,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(sessions -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(sessions, users);
