//! Session identity and the cookie descriptor handed back to clients.
//!
//! The session issuer owns [`Session`] records. The sign-up service only
//! forwards the [`SessionCookie`] it is given, so every attribute here reaches
//! the response exactly as the issuer built it.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;

use super::user::UserId;

/// Bytes of OS entropy behind a freshly generated [`SessionId`].
pub const SESSION_ID_ENTROPY_BYTES: usize = 20;

/// Default cookie name for sign-in sessions.
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "auth_session";

/// Opaque session identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0_u8; SESSION_ID_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap an identifier loaded from storage.
    #[must_use]
    pub fn from_stored(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

// Session ids are bearer secrets.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(<redacted>)")
    }
}

/// Server-side session bound to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(id: SessionId, user_id: UserId, expires_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            expires_at,
        }
    }

    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// `SameSite` policy carried by a session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// Attributes attached to the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSitePolicy,
    /// `Max-Age` in whole seconds.
    pub max_age_secs: Option<i64>,
}

/// Cookie descriptor produced by the session issuer.
///
/// # Examples
/// ```
/// use signup::domain::{CookieAttributes, SameSitePolicy, SessionCookie};
///
/// let cookie = SessionCookie::new(
///     "auth_session",
///     "abc123",
///     CookieAttributes {
///         path: "/".into(),
///         http_only: true,
///         secure: true,
///         same_site: SameSitePolicy::Lax,
///         max_age_secs: Some(3600),
///     },
/// );
/// assert_eq!(cookie.name(), "auth_session");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    name: String,
    value: String,
    attributes: CookieAttributes,
}

impl SessionCookie {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        attributes: CookieAttributes,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub const fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Deployment settings the session issuer applies to every cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieSettings {
    pub name: String,
    pub secure: bool,
    pub same_site: SameSitePolicy,
    /// Lifetime of the session row and the cookie `Max-Age`.
    pub ttl: Duration,
}

impl SessionCookieSettings {
    /// Build the cookie for `session_id` using these settings.
    ///
    /// `Max-Age` saturates at `i64::MAX` seconds.
    #[must_use]
    pub fn cookie_for(&self, session_id: &SessionId) -> SessionCookie {
        SessionCookie::new(
            self.name.clone(),
            session_id.as_ref(),
            CookieAttributes {
                path: "/".to_owned(),
                http_only: true,
                secure: self.secure,
                same_site: self.same_site,
                max_age_secs: Some(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
            },
        )
    }
}

impl Default for SessionCookieSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_COOKIE_NAME.to_owned(),
            secure: true,
            same_site: SameSitePolicy::Lax,
            ttl: Duration::from_secs(30 * 24 * 60 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn random_session_ids_are_hex_encoded_entropy() {
        let id = SessionId::random();
        assert_eq!(id.as_ref().len(), SESSION_ID_ENTROPY_BYTES * 2);
        assert!(id.as_ref().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, SessionId::random());
    }

    #[rstest]
    fn session_id_debug_is_redacted() {
        let id = SessionId::from_stored("secret-session");
        assert!(!format!("{id:?}").contains("secret-session"));
    }

    #[rstest]
    #[case(SameSitePolicy::Strict, false)]
    #[case(SameSitePolicy::Lax, true)]
    fn cookie_reflects_settings(#[case] same_site: SameSitePolicy, #[case] secure: bool) {
        let settings = SessionCookieSettings {
            name: "sid".to_owned(),
            secure,
            same_site,
            ttl: Duration::from_secs(90),
        };
        let id = SessionId::from_stored("abc");

        let cookie = settings.cookie_for(&id);

        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(
            cookie.attributes(),
            &CookieAttributes {
                path: "/".to_owned(),
                http_only: true,
                secure,
                same_site,
                max_age_secs: Some(90),
            }
        );
    }

    #[rstest]
    fn default_settings_use_thirty_day_lax_secure_cookie() {
        let settings = SessionCookieSettings::default();
        assert_eq!(settings.name, DEFAULT_SESSION_COOKIE_NAME);
        assert!(settings.secure);
        assert_eq!(settings.same_site, SameSitePolicy::Lax);
        assert_eq!(settings.ttl, Duration::from_secs(2_592_000));
    }
}
