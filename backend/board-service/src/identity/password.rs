/// Password hashing and verification using Argon2id
use super::error::{AuthError, AuthErrorCode};
use super::validators::{validate_password, MIN_PASSWORD_LEN};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Hash a password using Argon2id with a random per-password salt
///
/// ## Errors
///
/// - `auth/weak-password` when shorter than the provider minimum
/// - `auth/internal-error` when hashing fails
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if !validate_password(password) {
        return Err(AuthError::new(
            AuthErrorCode::WeakPassword,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its PHC-formatted hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
