use crate::constants::{BCRYPT_HASH_LENGTH, BCRYPT_PREFIXES, USERNAME_REGEX};
use crate::core_auth::error::AuthError;
use bcrypt::{hash, verify};
use log::error;
use regex::Regex;
use std::sync::LazyLock;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_REGEX).expect("USERNAME_REGEX is a valid pattern"));

pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    hash(password, cost).map_err(|e| AuthError::Hash(e.to_string()))
}

/// Compares a plaintext password against a stored bcrypt hash. A malformed
/// hash never verifies.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(password, hashed_password).unwrap_or_else(|e| {
        error!("Password check failed: {}", e);
        false
    })
}

pub fn is_valid_bcrypt_hash(hashed_password: &str) -> bool {
    hashed_password.len() == BCRYPT_HASH_LENGTH
        && BCRYPT_PREFIXES
            .iter()
            .any(|prefix| hashed_password.starts_with(prefix))
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_PATTERN.is_match(username)
}
