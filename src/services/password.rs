//! Password digests
//!
//! New digests are Argon2 PHC strings. Accounts created before that still
//! carry an unsalted hex SHA-256 digest; those keep verifying through
//! [`legacy_digest`] until they are rehashed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Unsalted hex SHA-256 of `plaintext`, the format of pre-Argon2 digests
pub fn legacy_digest(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hash a password using Argon2
pub fn hash_password(plaintext: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `supplied` against a stored digest of either format
pub fn verify_password(stored: &str, supplied: &str) -> AppResult<bool> {
    if stored.starts_with('$') {
        let parsed_hash = PasswordHash::new(stored)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        return Ok(Argon2::default()
            .verify_password(supplied.as_bytes(), &parsed_hash)
            .is_ok());
    }

    if is_legacy_digest(stored) {
        return Ok(legacy_digest(supplied).eq_ignore_ascii_case(stored));
    }

    tracing::warn!("Stored password digest has an unknown format");
    Ok(false)
}
