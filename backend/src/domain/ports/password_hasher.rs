//! Port for one-way password hashing.
use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum PasswordHashError {
        /// Hashing parameters were rejected by the algorithm.
        Parameters { message: String } => "invalid password hashing parameters: {message}",
        /// The hashing computation itself failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Derives a storable hash from a plain-text password.
///
/// Implementations are CPU and memory heavy; they should run off the async
/// executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;
}
