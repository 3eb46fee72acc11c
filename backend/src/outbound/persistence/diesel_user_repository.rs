//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Case-insensitive lookups compare `lower(column)` with `lower($1)`, which
//! lets PostgreSQL use the `users_*_lower_idx` expression indexes. Those same
//! indexes reject a second account whose username or email differs only in
//! case; the violation is reported as the matching duplicate error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserLookup, UserLookupField, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, PasswordHash, UserId, UserRecord, Username};

use super::diesel_basic_error_mapping::{
    log_diesel_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`.
    fn lower(value: Text) -> Text;
}

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

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

/// Map Diesel errors, singling out the case-insensitive unique indexes.
fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        log_diesel_error(&error);
        return classify_unique_violation(info.as_ref());
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Decide which uniqueness rule a violation broke.
///
/// PostgreSQL reports the index name as the constraint; drivers that omit it
/// still name the index in the message. A primary-key clash matches neither
/// and is reported as a query failure.
fn classify_unique_violation(
    info: &(dyn DatabaseErrorInformation + Send + Sync),
) -> UserPersistenceError {
    let hint = info.constraint_name().unwrap_or_else(|| info.message());
    if hint.contains("username") {
        UserPersistenceError::duplicate_username()
    } else if hint.contains("email") {
        UserPersistenceError::duplicate_email()
    } else {
        UserPersistenceError::query("duplicate key")
    }
}

fn corrupted(column: &str, err: impl std::fmt::Display) -> UserPersistenceError {
    UserPersistenceError::query(format!("corrupted {column} in database: {err}"))
}

/// Convert a database row into a domain record.
fn row_to_record(row: UserRow) -> Result<UserRecord, UserPersistenceError> {
    let id = UserId::new(&row.id).map_err(|err| corrupted("user id", err))?;
    let username = Username::new(&row.username).map_err(|err| corrupted("username", err))?;
    let display_name =
        DisplayName::new(row.display_name).map_err(|err| corrupted("display name", err))?;
    let email = EmailAddress::new(&row.email).map_err(|err| corrupted("email", err))?;
    let password_hash =
        PasswordHash::new(row.password_hash).map_err(|err| corrupted("password hash", err))?;

    Ok(UserRecord::from_parts(
        id,
        username,
        display_name,
        email,
        password_hash,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_first(
        &self,
        lookup: &UserLookup,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let value = lookup.value();
        let query = users::table.select(UserRow::as_select()).into_boxed();
        let query = match lookup.field() {
            UserLookupField::Username => query.filter(lower(users::username).eq(lower(value))),
            UserLookupField::Email => query.filter(lower(users::email).eq(lower(value))),
        };

        let row = query
            .order(users::created_at.asc())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn create(&self, record: &UserRecord) -> Result<UserRecord, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: record.id().as_ref(),
            username: record.username().as_ref(),
            display_name: record.display_name().as_ref(),
            email: record.email().as_ref(),
            password_hash: record.password_hash().as_str(),
        };

        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_record(row)
    }
}
