//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Parameters follow the OWASP minimum for Argon2id: 19 MiB memory, two
//! passes, one lane. Hashes are stored as PHC strings so the parameters travel
//! with every hash.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, Version};
use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

const MEMORY_COST_KIB: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;
const OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Argon2id password hasher that runs on the blocking thread pool.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Build a hasher with the production parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Parameters`] if the parameter set is
    /// rejected by the `argon2` crate.
    pub fn new() -> Result<Self, PasswordHashError> {
        Self::with_params(MEMORY_COST_KIB, TIME_COST, PARALLELISM)
    }

    /// Build a hasher with custom cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Parameters`] for out-of-range costs.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(OUTPUT_LEN))
            .map_err(|err| PasswordHashError::parameters(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<String, PasswordHashError> {
    let mut salt_bytes = [0_u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hashing(err.to_string()))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let argon2 = self.argon2.clone();
        let secret = Zeroizing::new(password.expose().to_owned());

        let encoded = tokio::task::spawn_blocking(move || hash_blocking(&argon2, &secret))
            .await
            .map_err(|err| PasswordHashError::hashing(format!("hashing task failed: {err}")))??;

        PasswordHash::new(encoded).map_err(|err| PasswordHashError::hashing(err.to_string()))
    }
}
