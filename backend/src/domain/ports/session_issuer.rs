//! Port for creating sign-in sessions and the cookies that carry them.
use async_trait::async_trait;

use crate::domain::{Session, SessionCookie, SessionId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session issuer adapters.
    pub enum SessionIssuerError {
        /// Session store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Session could not be written.
        Query { message: String } => "session store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Create and persist a session for `user_id`.
    async fn create_session(&self, user_id: &UserId) -> Result<Session, SessionIssuerError>;

    /// Describe the cookie that carries `session_id` to the client.
    fn create_session_cookie(&self, session_id: &SessionId) -> SessionCookie;
}
