//! Credential hashing and verification.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the salt and cost parameters travel with the digest and a verifier
//! built with different parameters still verifies older digests.

use crate::config::CredentialConfig;
use crate::{LifelineError, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

/// One-way, salted credential hashing.
pub trait CredentialVerifier: Send + Sync {
    /// Hash `plaintext` with a fresh random salt.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Check `plaintext` against `digest`.
    ///
    /// Never fails: a malformed digest or a backend error is a mismatch.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id verifier.
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    /// Build a verifier from configuration.
    pub fn new(config: &CredentialConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| LifelineError::Config(format!("argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Verifier {
    /// OWASP-recommended Argon2id parameters.
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let mut salt = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt).map_err(hashing_fault)?;

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(hashing_fault)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("unparseable credential digest: {}", e);
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hashing failures come from the backend or its parameters, never from
/// the password itself.
fn hashing_fault(err: argon2::password_hash::Error) -> LifelineError {
    LifelineError::Config(format!("argon2 hashing: {}", err))
}
