use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
use async_trait::async_trait;
use tokio::task;
use tracing::{error, instrument};

use crate::shared::AppError;

/// Trait for one-way password hashing
///
/// Abstracted so the concrete primitive is swappable without touching the
/// auth flow. Implementations must salt per call and compare in constant
/// time.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password, embedding a fresh random salt
    async fn hash(&self, plaintext: &str) -> Result<String, AppError>;

    /// Checks a plaintext against a stored hash. A malformed stored hash
    /// verifies false; this never errors outward.
    async fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id implementation with the crate's default cost parameters
///
/// Hashing is deliberately slow, so both operations run on the blocking
/// thread pool and never stall the request executor. Verification is
/// constant-time inside the argon2 crate.
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[instrument(skip(self, plaintext))]
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let plaintext = plaintext.to_owned();

        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| {
                    error!(error = %e, "Password hashing failed");
                    AppError::Internal
                })
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed to complete");
            AppError::Internal
        })?
    }

    #[instrument(skip(self, plaintext, hash))]
    async fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        task::spawn_blocking(move || {
            // A stored hash that no longer parses (truncation, corruption)
            // counts as a mismatch rather than an error
            let parsed = match PasswordHash::new(&hash) {
                Ok(parsed) => parsed,
                Err(_) => return false,
            };

            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .await
        .unwrap_or(false)
    }
}
