//! Admin credential hashing
//!
//! The configured credential is an Argon2id PHC string. Verification takes the
//! algorithm parameters from the stored hash, so hashes produced with cheaper
//! parameters (tests) verify with those same parameters.

use argon2::{
    password_hash::{self, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Password hashing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The stored hash is not a parsable Argon2 PHC string
    #[error("credential hash is not a valid Argon2 PHC string")]
    InvalidHash,

    /// Argon2 parameters were rejected
    #[error("invalid Argon2 parameters")]
    InvalidParams,

    /// Hashing failed
    #[error("failed to hash password")]
    Hashing,
}

/// Check that a stored hash parses and names an Argon2 variant
pub fn validate_hash(stored_hash: &str) -> Result<(), PasswordError> {
    parse_hash(stored_hash).map(|_| ())
}

/// Verify `password` against a stored PHC hash
///
/// A wrong password is `Ok(false)`; an unusable hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let parsed = parse_hash(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(_) => Err(PasswordError::InvalidHash),
    }
}

fn parse_hash(stored_hash: &str) -> Result<PasswordHash<'_>, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidHash)?;
    // Other PHC algorithms (scrypt, pbkdf2) parse fine but can never verify here
    Algorithm::try_from(parsed.algorithm).map_err(|_| PasswordError::InvalidHash)?;
    Ok(parsed)
}

/// Hash a password with the default Argon2id parameters
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with(password, Params::default())
}

/// Hash a password with explicit Argon2id parameters
pub fn hash_password_with(password: &str, params: Params) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hashing)
}

/// Cheap parameters for tests and local fixtures
pub fn fast_params() -> Result<Params, PasswordError> {
    Params::new(1024, 1, 1, None).map_err(|_| PasswordError::InvalidParams)
}
