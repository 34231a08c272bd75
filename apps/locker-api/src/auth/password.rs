//! Argon2 password hashing.
//!
//! Both functions are CPU-bound; handlers call them through
//! `tokio::task::spawn_blocking`.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::ApiError;

/// Hash a password for storage (PHC string format).
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash checked when the username does not exist, so unknown users cost as
/// much as wrong passwords.
///
/// Built once at startup by `prepare_dummy_hash`.
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password("locker-dummy-password").unwrap_or_default())
}

/// Whether the dummy hash has been built.
pub fn dummy_hash_ready() -> bool {
    DUMMY_HASH.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("locker-dummy-password-x", dummy_hash()));
    }
}
