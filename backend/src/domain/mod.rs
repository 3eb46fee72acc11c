//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed sign-up model and the service that
//! drives it, independent of HTTP and SQL. Adapters depend on this module;
//! it depends on neither.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - SignUpCredentials / LoginCredentials: validated form input.
//! - UserRecord and its value types: the persisted account.
//! - Session / SessionCookie: what the session issuer hands back.
//! - SignUpService / SignUpOutcome: the sign-up use-case.

pub mod credentials;
pub mod error;
pub mod ports;
pub mod session;
pub mod sign_up;
pub mod trace_id;
pub mod user;

pub use self::credentials::{
    CredentialField, CredentialIssue, CredentialIssueKind, CredentialsValidationError,
    LoginCredentials, PASSWORD_MIN_LENGTH, Password, SignUpCredentials,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::session::{
    CookieAttributes, SameSitePolicy, Session, SessionCookie, SessionCookieSettings, SessionId,
};
pub use self::sign_up::{
    EMAIL_TAKEN_MESSAGE, SIGN_UP_REDIRECT_LOCATION, SignUpConflict, SignUpOutcome,
    SignUpRedirect, SignUpService, UNEXPECTED_FAILURE_MESSAGE, USERNAME_TAKEN_MESSAGE,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, EmailAddress, PasswordHash, UserId, UserRecord, UserValidationError, Username,
};
