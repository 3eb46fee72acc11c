//! Driving port for the sign-up use-case.
//!
//! Inbound adapters call this port with raw form fields and translate the
//! returned [`SignUpOutcome`] into their transport. Handler tests substitute a
//! mock so they run without persistence or hashing.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::SignUpOutcome;

/// Raw, unvalidated sign-up fields as received from a client.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: Zeroizing<String>,
}

impl SignUpRequest {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Domain use-case port for account creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignUpCommand: Send + Sync {
    /// Register a new account and open its first session.
    ///
    /// Never fails at the type level: every failure is a variant of
    /// [`SignUpOutcome`].
    async fn sign_up(&self, request: SignUpRequest) -> SignUpOutcome;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn debug_output_hides_password() {
        let request = SignUpRequest::new("bob1", "bob@x.com", "longenough");
        let rendered = format!("{request:?}");
        assert!(rendered.contains("bob1"));
        assert!(!rendered.contains("longenough"));
    }
}
