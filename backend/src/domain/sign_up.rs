//! Sign-up orchestration.
//!
//! [`SignUpService`] validates the raw form, hashes the password, checks that
//! neither the username nor the email is taken, creates the account and opens
//! its first session. Every result, success included, is a [`SignUpOutcome`]
//! variant; nothing is signalled through panics or control-flow errors.
//!
//! A session failure after the account row is written leaves the account in
//! place. The client sees the generic failure and can sign in later.

use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::domain::ports::{
    PasswordHasher, SessionIssuer, SignUpCommand, SignUpRequest, UserLookup, UserPersistenceError,
    UserRepository,
};
use crate::domain::{CredentialIssue, SessionCookie, SignUpCredentials, UserId, UserRecord};

/// Where the client is sent after a successful sign-up.
pub const SIGN_UP_REDIRECT_LOCATION: &str = "/";
/// Shown when the username is already registered, ignoring case.
pub const USERNAME_TAKEN_MESSAGE: &str =
    "Username is already taken. Please choose a different one.";
/// Shown when the email is already registered, ignoring case.
pub const EMAIL_TAKEN_MESSAGE: &str = "User with this email already exists. Please log in.";
/// Shown for any failure the client cannot act on.
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Something went wrong! Please try again.";

/// Which uniqueness rule a sign-up broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpConflict {
    UsernameTaken,
    EmailTaken,
}

impl SignUpConflict {
    /// User-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UsernameTaken => USERNAME_TAKEN_MESSAGE,
            Self::EmailTaken => EMAIL_TAKEN_MESSAGE,
        }
    }
}

/// Redirect signal returned on success, carrying the session cookie to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRedirect {
    location: &'static str,
    session_cookie: SessionCookie,
}

impl SignUpRedirect {
    pub(crate) fn new(session_cookie: SessionCookie) -> Self {
        Self {
            location: SIGN_UP_REDIRECT_LOCATION,
            session_cookie,
        }
    }

    pub const fn location(&self) -> &'static str {
        self.location
    }

    /// Cookie exactly as the session issuer produced it.
    pub const fn session_cookie(&self) -> &SessionCookie {
        &self.session_cookie
    }
}

/// Result of a sign-up attempt.
///
/// # Examples
/// ```
/// use signup::domain::{SignUpConflict, SignUpOutcome};
///
/// let outcome = SignUpOutcome::ConflictFailure(SignUpConflict::EmailTaken);
/// assert_eq!(
///     outcome.error_message(),
///     Some("User with this email already exists. Please log in.")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// A field failed validation; nothing was hashed or stored.
    ValidationFailure(CredentialIssue),
    /// The username or email is already registered; nothing was stored.
    ConflictFailure(SignUpConflict),
    /// A collaborator failed. Details were logged, not returned.
    UnexpectedFailure,
    /// Account and session created.
    Success(SignUpRedirect),
}

impl SignUpOutcome {
    /// User-facing error text, `None` on success.
    #[must_use]
    pub const fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::ValidationFailure(issue) => Some(issue.message()),
            Self::ConflictFailure(conflict) => Some(conflict.message()),
            Self::UnexpectedFailure => Some(UNEXPECTED_FAILURE_MESSAGE),
            Self::Success(_) => None,
        }
    }
}

enum SignUpFailure {
    Conflict(SignUpConflict),
    Unexpected,
}

fn unexpected(stage: &'static str, err: &impl Display) -> SignUpFailure {
    error!(stage, error = %err, "sign-up failed unexpectedly");
    SignUpFailure::Unexpected
}

fn map_create_error(err: UserPersistenceError) -> SignUpFailure {
    match err {
        UserPersistenceError::DuplicateUsername => {
            debug!("username claimed by a concurrent sign-up");
            SignUpFailure::Conflict(SignUpConflict::UsernameTaken)
        }
        UserPersistenceError::DuplicateEmail => {
            debug!("email claimed by a concurrent sign-up");
            SignUpFailure::Conflict(SignUpConflict::EmailTaken)
        }
        other => unexpected("create_user", &other),
    }
}

/// Sign-up service implementing [`SignUpCommand`].
#[derive(Clone)]
pub struct SignUpService<U, S, H> {
    users: Arc<U>,
    sessions: Arc<S>,
    hasher: Arc<H>,
}

impl<U, S, H> SignUpService<U, S, H> {
    /// Create a new service from its collaborators.
    pub const fn new(users: Arc<U>, sessions: Arc<S>, hasher: Arc<H>) -> Self {
        Self {
            users,
            sessions,
            hasher,
        }
    }
}

impl<U, S, H> SignUpService<U, S, H>
where
    U: UserRepository,
    S: SessionIssuer,
    H: PasswordHasher,
{
    #[instrument(
        name = "sign_up.register",
        skip_all,
        fields(username = %credentials.username())
    )]
    async fn register(
        &self,
        credentials: &SignUpCredentials,
    ) -> Result<SignUpRedirect, SignUpFailure> {
        let password_hash = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(|err| unexpected("hash_password", &err))?;
        let user_id = UserId::random();

        let username_lookup = UserLookup::username(credentials.username());
        let email_lookup = UserLookup::email(credentials.email());
        let (by_username, by_email) = tokio::join!(
            self.users.find_first(&username_lookup),
            self.users.find_first(&email_lookup),
        );
        let by_username = by_username.map_err(|err| unexpected("find_by_username", &err))?;
        let by_email = by_email.map_err(|err| unexpected("find_by_email", &err))?;

        if by_username.is_some() {
            debug!("username already registered");
            return Err(SignUpFailure::Conflict(SignUpConflict::UsernameTaken));
        }
        if by_email.is_some() {
            debug!("email already registered");
            return Err(SignUpFailure::Conflict(SignUpConflict::EmailTaken));
        }

        let record = UserRecord::new(
            user_id,
            credentials.username().clone(),
            credentials.email().clone(),
            password_hash,
        );
        let created = self.users.create(&record).await.map_err(map_create_error)?;

        let session = self
            .sessions
            .create_session(created.id())
            .await
            .map_err(|err| unexpected("create_session", &err))?;
        let session_cookie = self.sessions.create_session_cookie(session.id());

        info!(user_id = %created.id(), "user signed up");
        Ok(SignUpRedirect::new(session_cookie))
    }
}

#[async_trait]
impl<U, S, H> SignUpCommand for SignUpService<U, S, H>
where
    U: UserRepository,
    S: SessionIssuer,
    H: PasswordHasher,
{
    async fn sign_up(&self, request: SignUpRequest) -> SignUpOutcome {
        let credentials = match SignUpCredentials::try_from_parts(
            &request.username,
            &request.email,
            &request.password,
        ) {
            Ok(credentials) => credentials,
            Err(err) => {
                debug!(
                    field = err.first().field().as_str(),
                    code = err.first().code(),
                    "sign-up rejected by validation"
                );
                return SignUpOutcome::ValidationFailure(*err.first());
            }
        };

        match self.register(&credentials).await {
            Ok(redirect) => SignUpOutcome::Success(redirect),
            Err(SignUpFailure::Conflict(conflict)) => SignUpOutcome::ConflictFailure(conflict),
            Err(SignUpFailure::Unexpected) => SignUpOutcome::UnexpectedFailure,
        }
    }
}
