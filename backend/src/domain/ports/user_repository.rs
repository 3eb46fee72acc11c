//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, UserRecord, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Insert rejected because the username is taken, ignoring case.
        DuplicateUsername => "username is already registered",
        /// Insert rejected because the email is taken, ignoring case.
        DuplicateEmail => "email is already registered",
    }
}

/// Column a [`UserLookup`] matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookupField {
    Username,
    Email,
}

/// Exact match against one user column, ignoring case.
///
/// Case-insensitivity is fixed: the `lower(...)` unique indexes are what make
/// a username or email "taken", so lookups compare the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLookup {
    field: UserLookupField,
    value: String,
}

impl UserLookup {
    #[must_use]
    pub fn username(username: &Username) -> Self {
        Self {
            field: UserLookupField::Username,
            value: username.as_ref().to_owned(),
        }
    }

    #[must_use]
    pub fn email(email: &EmailAddress) -> Self {
        Self {
            field: UserLookupField::Email,
            value: email.as_ref().to_owned(),
        }
    }

    pub const fn field(&self) -> UserLookupField {
        self.field
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Whether `candidate` satisfies this lookup.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.to_lowercase() == self.value.to_lowercase()
    }
}

/// Store for user accounts.
///
/// Implementations must enforce case-insensitive uniqueness of usernames and
/// emails on `create`; that constraint is the final word when sign-ups race.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return the first user matching `lookup`, if any.
    async fn find_first(
        &self,
        lookup: &UserLookup,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Persist a new user in a single write.
    async fn create(&self, record: &UserRecord) -> Result<UserRecord, UserPersistenceError>;
}
