//! Password hashing for operator accounts.
//!
//! Argon2id with a random per-hash salt, stored as a PHC string. Used only
//! to gate entry to the CLI; there is no role or permission model.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{Result, ShowroomError};

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(ShowroomError::Validation(
            "Password must not be empty".to_string(),
        ));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ShowroomError::Storage(format!("Password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
///
/// A wrong password is `Ok(false)`; only an unreadable stored hash is an
/// error.
pub fn verify_password(stored: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| ShowroomError::Storage(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
