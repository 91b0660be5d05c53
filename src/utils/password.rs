use argon2::{
    Argon2,
    password_hash::{PasswordHasher, PasswordVerifier, phc::PasswordHash},
};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::{AppError, AppResult};

/// Length of generated one-time passwords, excluding the leading symbol
const ONE_TIME_PASSWORD_LEN: usize = 11;

/// Hash a password using Argon2id
///
/// # Example
/// ```ignore
/// let hashed = hash_password("@Abc12345")?;
/// ```
pub fn hash_password(password: &str) -> AppResult<String> {
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes())
        .map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to hash password: {e}"),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
///
/// A malformed stored hash is an internal error, a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Stored password hash is malformed: {e}"),
    })?;
    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Random initial password handed to a new account
pub fn generate_one_time_password() -> String {
    let tail: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ONE_TIME_PASSWORD_LEN)
        .map(char::from)
        .collect();
    format!("@{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("@Abc12345").expect("Failed to hash password");

        assert!(!hash.is_empty());
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("@Abc12345").expect("Failed to hash password");

        assert!(verify_password("@Abc12345", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password("@Abc12345").unwrap();
        let hash2 = hash_password("@Abc12345").unwrap();

        // Different salts
        assert_ne!(hash1, hash2);
        assert!(verify_password("@Abc12345", &hash1).unwrap());
        assert!(verify_password("@Abc12345", &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        let result = verify_password("x", "not-a-phc-string");
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_one_time_password_shape() {
        let otp = generate_one_time_password();
        assert_eq!(otp.len(), ONE_TIME_PASSWORD_LEN + 1);
        assert!(otp.starts_with('@'));
        assert!(otp[1..].chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(otp, generate_one_time_password());
    }
}
