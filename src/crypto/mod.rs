//! Cryptography module
//!
//! This module provides the primitives behind the admin gate: HMAC-SHA256
//! request signing and Argon2id credential hashing.

pub mod hmac;
pub mod password;

// Re-export commonly used types and functions
pub use self::hmac::{constant_time_eq, sign, verify, HmacSigner, SignedPayload, SigningError, SIGNATURE_HEADER};
pub use self::password::{hash_password, hash_password_with, verify_password, PasswordError};
