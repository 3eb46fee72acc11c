//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `SessionIssuer`, `PasswordHasher`) describe
//! what the sign-up service needs from infrastructure. `SignUpCommand` is the
//! driving port inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod password_hasher;
mod session_issuer;
mod sign_up_command;
mod user_repository;

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use session_issuer::MockSessionIssuer;
pub use session_issuer::{SessionIssuer, SessionIssuerError};
#[cfg(test)]
pub use sign_up_command::MockSignUpCommand;
pub use sign_up_command::{SignUpCommand, SignUpRequest};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserLookup, UserLookupField, UserPersistenceError, UserRepository};
