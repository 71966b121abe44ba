//! One-way SKU obscuring.
//!
//! A SKU is stored only as an Argon2id PHC string with a random per-record
//! salt. The plaintext cannot be recovered; it can only be checked.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkuError {
    #[error("sku hashing failed: {0}")]
    Hash(String),
}

/// Salted hash of a SKU, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedSku(String);

impl HashedSku {
    /// Hash a plaintext SKU with a freshly generated salt.
    ///
    /// CPU and memory heavy; async callers should run this on a blocking pool.
    pub fn hash(raw: &str) -> Result<Self, SkuError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| SkuError::Hash(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a value read back from storage without re-hashing it.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Check a plaintext SKU against this hash. A malformed stored hash never matches.
    pub fn verify(&self, raw: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
