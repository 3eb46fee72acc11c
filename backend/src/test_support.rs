//! In-memory port adapters shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so the
//! suites under `backend/tests/` can drive the real service without
//! PostgreSQL.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    SessionIssuer, SessionIssuerError, UserLookup, UserLookupField, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Session, SessionCookie, SessionCookieSettings, SessionId, UserId, UserRecord};
use crate::outbound::hashing::Argon2PasswordHasher;
use crate::outbound::persistence::session_expiry;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// User store enforcing the same case-insensitive uniqueness as the
/// `lower(...)` indexes.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with `records`, bypassing uniqueness checks.
    pub fn with_users(records: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: Mutex::new(records.into_iter().collect()),
        }
    }

    /// Snapshot of stored records in insertion order.
    pub fn users(&self) -> Vec<UserRecord> {
        lock(&self.users).clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_first(
        &self,
        lookup: &UserLookup,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        // Let concurrent sign-ups interleave between lookup and insert.
        tokio::task::yield_now().await;
        let users = lock(&self.users);
        let found = users.iter().find(|user| {
            let candidate = match lookup.field() {
                UserLookupField::Username => user.username().as_ref(),
                UserLookupField::Email => user.email().as_ref(),
            };
            lookup.matches(candidate)
        });
        Ok(found.cloned())
    }

    async fn create(&self, record: &UserRecord) -> Result<UserRecord, UserPersistenceError> {
        let mut users = lock(&self.users);
        let username = UserLookup::username(record.username());
        let email = UserLookup::email(record.email());
        if users
            .iter()
            .any(|user| username.matches(user.username().as_ref()))
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        if users.iter().any(|user| email.matches(user.email().as_ref())) {
            return Err(UserPersistenceError::duplicate_email());
        }
        if users.iter().any(|user| user.id() == record.id()) {
            return Err(UserPersistenceError::query("duplicate key"));
        }
        users.push(record.clone());
        Ok(record.clone())
    }
}

/// Session issuer that records every session it opens.
pub struct RecordingSessionIssuer {
    settings: SessionCookieSettings,
    sessions: Mutex<Vec<Session>>,
    cookies_issued: Mutex<usize>,
    fail: bool,
}

impl RecordingSessionIssuer {
    pub fn new(settings: SessionCookieSettings) -> Self {
        Self {
            settings,
            sessions: Mutex::new(Vec::new()),
            cookies_issued: Mutex::new(0),
            fail: false,
        }
    }

    /// Issuer whose `create_session` always fails.
    pub fn failing(settings: SessionCookieSettings) -> Self {
        Self {
            fail: true,
            ..Self::new(settings)
        }
    }

    pub fn sessions(&self) -> Vec<Session> {
        lock(&self.sessions).clone()
    }

    pub fn cookies_issued(&self) -> usize {
        *lock(&self.cookies_issued)
    }
}

#[async_trait]
impl SessionIssuer for RecordingSessionIssuer {
    async fn create_session(&self, user_id: &UserId) -> Result<Session, SessionIssuerError> {
        if self.fail {
            return Err(SessionIssuerError::connection("session store offline"));
        }
        let session = Session::new(
            SessionId::random(),
            user_id.clone(),
            session_expiry(Utc::now(), self.settings.ttl),
        );
        lock(&self.sessions).push(session.clone());
        Ok(session)
    }

    fn create_session_cookie(&self, session_id: &SessionId) -> SessionCookie {
        *lock(&self.cookies_issued) += 1;
        self.settings.cookie_for(session_id)
    }
}

/// Argon2id hasher with the smallest accepted costs, for quick tests.
pub fn fast_password_hasher() -> Argon2PasswordHasher {
    match Argon2PasswordHasher::with_params(1024, 1, 1) {
        Ok(hasher) => hasher,
        Err(err) => panic!("minimal argon2 parameters rejected: {err}"),
    }
}
