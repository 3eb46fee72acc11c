//! Credential validation for sign-up and login payloads.
//!
//! Raw strings from inbound adapters are trimmed and checked here before any
//! hashing or store access happens. Failures carry user-facing messages so the
//! HTTP layer never has to invent its own wording.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError, Username};

/// Minimum password length, counted in characters after trimming.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Credential field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Email,
    Username,
    Password,
}

impl CredentialField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
            Self::Password => "password",
        }
    }
}

/// Rule a credential field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialIssueKind {
    /// Blank once trimmed.
    Required,
    /// Username contains characters outside `[A-Za-z0-9_-]`.
    InvalidCharacters,
    /// Email does not match the address grammar.
    InvalidEmail,
    /// Password shorter than [`PASSWORD_MIN_LENGTH`].
    TooShort,
}

/// A single `(field, message)` validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialIssue {
    field: CredentialField,
    kind: CredentialIssueKind,
}

impl CredentialIssue {
    /// Construct an issue for `field`.
    #[must_use]
    pub const fn new(field: CredentialField, kind: CredentialIssueKind) -> Self {
        Self { field, kind }
    }

    pub const fn field(&self) -> CredentialField {
        self.field
    }

    pub const fn kind(&self) -> CredentialIssueKind {
        self.kind
    }

    /// Machine-readable code for the broken rule.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self.kind {
            CredentialIssueKind::Required => "required",
            CredentialIssueKind::InvalidCharacters => "invalid_characters",
            CredentialIssueKind::InvalidEmail => "invalid_email",
            CredentialIssueKind::TooShort => "too_short",
        }
    }

    /// User-facing message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match (self.field, self.kind) {
            (CredentialField::Email, CredentialIssueKind::Required) => "Email is required",
            (CredentialField::Email, _) => "Invalid email address",
            (CredentialField::Username, CredentialIssueKind::Required) => "Username is required",
            (CredentialField::Username, _) => "Only letters, numbers, _ and - allowed",
            (CredentialField::Password, _) => "Password must be at least 8 characters",
        }
    }
}

impl fmt::Display for CredentialIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Validation failure listing every broken field in declaration order
/// (email, username, password). Never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{first}")]
pub struct CredentialsValidationError {
    first: CredentialIssue,
    rest: Vec<CredentialIssue>,
}

impl CredentialsValidationError {
    fn new<const N: usize>(first: CredentialIssue, rest: [Option<CredentialIssue>; N]) -> Self {
        Self {
            first,
            rest: rest.into_iter().flatten().collect(),
        }
    }

    /// The issue reported to the caller.
    #[must_use]
    pub const fn first(&self) -> &CredentialIssue {
        &self.first
    }

    /// All issues, first one included.
    pub fn issues(&self) -> impl Iterator<Item = &CredentialIssue> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

/// Plain-text password held in memory that is wiped on drop.
///
/// Never persisted; only a [`crate::domain::PasswordHash`] derived from it is.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    fn trimmed(raw: &str) -> Self {
        Self(Zeroizing::new(raw.trim().to_owned()))
    }

    fn meets_minimum_length(&self) -> bool {
        // Unicode scalar values, so astral characters count once.
        self.0.chars().count() >= PASSWORD_MIN_LENGTH
    }

    /// The secret, for hashing adapters only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated sign-up credentials.
///
/// ## Invariants
/// - `username` matches `^[A-Za-z0-9_-]+$` after trimming.
/// - `email` is a syntactically valid address after trimming.
/// - `password` has at least [`PASSWORD_MIN_LENGTH`] characters after trimming.
///
/// # Examples
/// ```
/// use signup::domain::SignUpCredentials;
///
/// let creds = SignUpCredentials::try_from_parts(" bob1 ", "bob@x.com", "longenough").unwrap();
/// assert_eq!(creds.username().as_ref(), "bob1");
///
/// let err = SignUpCredentials::try_from_parts("bob!", "bob@x.com", "longenough").unwrap_err();
/// assert_eq!(err.first().message(), "Only letters, numbers, _ and - allowed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpCredentials {
    username: Username,
    email: EmailAddress,
    password: Password,
}

impl SignUpCredentials {
    /// Validate raw sign-up fields.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email);
        let username = Username::new(username);
        let password = Password::trimmed(password);
        let password_issue = (!password.meets_minimum_length()).then_some(CredentialIssue::new(
            CredentialField::Password,
            CredentialIssueKind::TooShort,
        ));

        match (email, username, password_issue) {
            (Ok(email), Ok(username), None) => Ok(Self {
                username,
                email,
                password,
            }),
            (Err(email_err), username, password_issue) => Err(CredentialsValidationError::new(
                email_issue(&email_err),
                [username.err().map(|err| username_issue(&err)), password_issue],
            )),
            (Ok(_), Err(username_err), password_issue) => Err(CredentialsValidationError::new(
                username_issue(&username_err),
                [password_issue],
            )),
            (Ok(_), Ok(_), Some(password_issue)) => {
                Err(CredentialsValidationError::new(password_issue, []))
            }
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Validated login credentials.
///
/// Login has no endpoint in this service yet; the type pins the validation
/// rules shared with the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Password,
}

impl LoginCredentials {
    /// Validate raw login fields. Usernames are only required to be present.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        let username_issue = normalized.is_empty().then_some(CredentialIssue::new(
            CredentialField::Username,
            CredentialIssueKind::Required,
        ));
        let password = Password::trimmed(password);
        let password_issue = (!password.meets_minimum_length()).then_some(CredentialIssue::new(
            CredentialField::Password,
            CredentialIssueKind::TooShort,
        ));

        match (username_issue, password_issue) {
            (None, None) => Ok(Self {
                username: normalized.to_owned(),
                password,
            }),
            (Some(first), password_issue) => {
                Err(CredentialsValidationError::new(first, [password_issue]))
            }
            (None, Some(first)) => Err(CredentialsValidationError::new(first, [])),
        }
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

fn email_issue(err: &UserValidationError) -> CredentialIssue {
    let kind = match err {
        UserValidationError::EmptyEmail => CredentialIssueKind::Required,
        _ => CredentialIssueKind::InvalidEmail,
    };
    CredentialIssue::new(CredentialField::Email, kind)
}

fn username_issue(err: &UserValidationError) -> CredentialIssue {
    let kind = match err {
        UserValidationError::EmptyUsername => CredentialIssueKind::Required,
        _ => CredentialIssueKind::InvalidCharacters,
    };
    CredentialIssue::new(CredentialField::Username, kind)
}

#[cfg(test)]
mod tests;
