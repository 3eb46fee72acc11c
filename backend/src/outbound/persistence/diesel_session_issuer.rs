//! PostgreSQL-backed `SessionIssuer`.
//!
//! Each call inserts one row into `sessions` with a fresh random id. The cookie
//! that carries it is shaped by the deployment's [`SessionCookieSettings`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{SessionIssuer, SessionIssuerError};
use crate::domain::{Session, SessionCookie, SessionCookieSettings, SessionId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewSessionRow, SessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::sessions;

/// Diesel-backed implementation of the `SessionIssuer` port.
#[derive(Clone)]
pub struct DieselSessionIssuer {
    pool: DbPool,
    settings: SessionCookieSettings,
    clock: Arc<dyn Clock>,
}

impl DieselSessionIssuer {
    pub fn new(pool: DbPool, settings: SessionCookieSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            settings,
            clock,
        }
    }
}

fn map_pool_error(error: PoolError) -> SessionIssuerError {
    map_basic_pool_error(error, SessionIssuerError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SessionIssuerError {
    map_basic_diesel_error(
        error,
        SessionIssuerError::query,
        SessionIssuerError::connection,
    )
}

/// `now + ttl`, saturating at the latest representable instant.
pub fn session_expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn row_to_session(row: SessionRow) -> Result<Session, SessionIssuerError> {
    let user_id = UserId::new(&row.user_id).map_err(|err| {
        SessionIssuerError::query(format!("corrupted session owner in database: {err}"))
    })?;
    Ok(Session::new(
        SessionId::from_stored(row.id),
        user_id,
        row.expires_at,
    ))
}

#[async_trait]
impl SessionIssuer for DieselSessionIssuer {
    async fn create_session(&self, user_id: &UserId) -> Result<Session, SessionIssuerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let session_id = SessionId::random();
        let expires_at = session_expiry(self.clock.utc(), self.settings.ttl);
        let new_row = NewSessionRow {
            id: session_id.as_ref(),
            user_id: user_id.as_ref(),
            expires_at,
        };

        let row = diesel::insert_into(sessions::table)
            .values(&new_row)
            .returning(SessionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(user_id = %user_id, %expires_at, "session created");
        row_to_session(row)
    }

    fn create_session_cookie(&self, session_id: &SessionId) -> SessionCookie {
        self.settings.cookie_for(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn expiry_adds_ttl() {
        let expiry = session_expiry(noon(), Duration::from_secs(30 * 24 * 60 * 60));
        assert_eq!(
            expiry,
            Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0)
                .single()
                .expect("valid timestamp")
        );
    }

    #[rstest]
    fn expiry_saturates_on_overflow() {
        assert_eq!(
            session_expiry(noon(), Duration::MAX),
            DateTime::<Utc>::MAX_UTC
        );
    }

    #[rstest]
    fn stored_rows_become_sessions() {
        let row = SessionRow {
            id: "abc123".to_owned(),
            user_id: "0a1b2c3d4e5f60718293".to_owned(),
            expires_at: noon(),
        };

        let session = row_to_session(row).expect("valid row");
        assert_eq!(session.id().as_ref(), "abc123");
        assert_eq!(session.user_id().as_ref(), "0a1b2c3d4e5f60718293");
        assert_eq!(session.expires_at(), noon());
    }

    #[rstest]
    fn pool_errors_are_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::build("bad url")),
            SessionIssuerError::connection("bad url")
        );
    }
}
