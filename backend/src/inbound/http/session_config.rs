//! Session cookie configuration parsing and validation.
//!
//! Cookie settings come from the environment and are validated once at
//! start-up. Debug builds fall back to safe defaults with a warning; release
//! builds insist on explicit `Secure` and `SameSite` toggles.

use std::time::Duration;

use mockable::Env;
use tracing::warn;

use crate::domain::session::DEFAULT_SESSION_COOKIE_NAME;
use crate::domain::{SameSitePolicy, SessionCookieSettings};

const COOKIE_NAME_ENV: &str = "SESSION_COOKIE_NAME";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const TTL_DAYS_ENV: &str = "SESSION_TTL_DAYS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const COOKIE_NAME_EXPECTED: &str = "a non-empty RFC 6265 token";
const TTL_EXPECTED: &str = "a whole number of days between 1 and 3650";
const DEFAULT_TTL_DAYS: u64 = 30;
const MAX_TTL_DAYS: u64 = 3650;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use signup::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
}

/// Build cookie settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use signup::domain::SameSitePolicy;
/// use signup::inbound::http::session_config::{
///     session_cookie_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_COOKIE_SECURE" => Some("1".to_string()),
///     "SESSION_SAMESITE" => Some("Strict".to_string()),
///     _ => None,
/// });
///
/// let settings = session_cookie_settings_from_env(&env, BuildMode::Release)
///     .expect("valid settings");
/// assert!(settings.secure);
/// assert_eq!(settings.same_site, SameSitePolicy::Strict);
/// ```
///
/// # Errors
///
/// Returns [`SessionConfigError`] when a value is invalid, or when a release
/// build is missing a required toggle.
pub fn session_cookie_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionCookieSettings, SessionConfigError> {
    let name = cookie_name_from_env(env)?;
    let secure = cookie_secure_from_env(env, mode)?;
    let same_site = same_site_from_env(env, mode, secure)?;
    let ttl = ttl_from_env(env)?;

    Ok(SessionCookieSettings {
        name,
        secure,
        same_site,
        ttl,
    })
}

fn cookie_name_from_env<E: Env>(env: &E) -> Result<String, SessionConfigError> {
    let Some(value) = env.string(COOKIE_NAME_ENV) else {
        return Ok(DEFAULT_SESSION_COOKIE_NAME.to_owned());
    };
    if is_cookie_token(&value) {
        Ok(value)
    } else {
        Err(SessionConfigError::InvalidEnv {
            name: COOKIE_NAME_ENV,
            value,
            expected: COOKIE_NAME_EXPECTED,
        })
    }
}

fn cookie_secure_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, SessionConfigError> {
    match env.string(COOKIE_SECURE_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(flag) => Ok(flag),
            None if mode.is_debug() => {
                warn!(value = %value, "invalid SESSION_COOKIE_SECURE; defaulting to secure");
                Ok(true)
            }
            None => Err(SessionConfigError::InvalidEnv {
                name: COOKIE_SECURE_ENV,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
        None if mode.is_debug() => {
            warn!("SESSION_COOKIE_SECURE not set; defaulting to secure");
            Ok(true)
        }
        None => Err(SessionConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV,
        }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSitePolicy, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSitePolicy::Lax
    } else {
        SameSitePolicy::Strict
    };

    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE not set; using default");
            return Ok(default_same_site);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSitePolicy::Lax),
        "strict" => Ok(SameSitePolicy::Strict),
        "none" if cookie_secure => Ok(SameSitePolicy::None),
        "none" if mode.is_debug() => {
            warn!(
                "{}",
                concat!(
                    "SESSION_SAMESITE=None with SESSION_COOKIE_SECURE=0; ",
                    "browsers may reject the session cookie"
                )
            );
            Ok(SameSitePolicy::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid SESSION_SAMESITE, using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn ttl_from_env<E: Env>(env: &E) -> Result<Duration, SessionConfigError> {
    let Some(value) = env.string(TTL_DAYS_ENV) else {
        return Ok(Duration::from_secs(DEFAULT_TTL_DAYS * SECONDS_PER_DAY));
    };
    match value.trim().parse::<u64>() {
        Ok(days) if (1..=MAX_TTL_DAYS).contains(&days) => {
            Ok(Duration::from_secs(days * SECONDS_PER_DAY))
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: TTL_DAYS_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

/// RFC 6265 `cookie-name`: visible ASCII minus separators.
fn is_cookie_token(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')'
                        | b'<'
                        | b'>'
                        | b'@'
                        | b','
                        | b';'
                        | b':'
                        | b'\\'
                        | b'"'
                        | b'/'
                        | b'['
                        | b']'
                        | b'?'
                        | b'='
                        | b'{'
                        | b'}'
                )
        })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
