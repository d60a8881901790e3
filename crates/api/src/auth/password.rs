//! Argon2id password hashing and verification.
//!
//! Every hash uses the Argon2id variant with a fixed work factor and a
//! cryptographically random salt generated via [`OsRng`]. The PHC string
//! format is used for storage so the algorithm, parameters, and salt travel
//! with the hash. Verification reads the parameters back out of the stored
//! string, so hashes minted under an older work factor keep verifying.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2 memory cost in KiB (19 MiB).
pub const MEMORY_COST_KIB: u32 = 19_456;
/// Argon2 iteration count.
pub const TIME_COST: u32 = 2;
/// Argon2 degree of parallelism.
pub const PARALLELISM: u32 = 1;

/// Failure modes of [`hash_password`] and [`verify_password`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// The hasher itself failed, or the stored hash could not be parsed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The password does not reproduce the stored hash.
    #[error("password does not match")]
    Mismatch,
}

impl PasswordError {
    /// `true` for server-side faults, `false` for a plain wrong password.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Hashing(_))
    }
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string. The empty string is hashed like any
/// other input; rejecting it is the caller's job.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(())` on a match and [`PasswordError::Mismatch`] otherwise. The
/// digest comparison is the constant-time one built into `password-hash`.
pub fn verify_password(hash: &str, password: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::Hashing(format!("stored hash is not a PHC string: {e}")))?;

    match hasher()?.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(PasswordError::Mismatch),
        Err(e) => Err(PasswordError::Hashing(e.to_string())),
    }
}

/// Hash checked when a login names an unknown email. `None` only if the
/// hasher itself is broken, in which case every login fails anyway.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("chirpy-dummy-password").ok());

/// Spend one verification's worth of Argon2 work without a stored hash.
///
/// Called on the unknown-email login path so it costs the same as a wrong
/// password.
pub fn verify_dummy(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(hash, password);
    }
}
