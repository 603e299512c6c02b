//! Credential hashing (Argon2id).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use familycabin_core::{DomainError, DomainResult};

/// Hash a plaintext credential into a salted PHC string.
pub fn hash_password(plaintext: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| DomainError::infrastructure(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext credential against a stored PHC string.
///
/// Returns `false` for both a wrong password and an undecodable stored hash;
/// callers map either to one generic authentication failure.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
