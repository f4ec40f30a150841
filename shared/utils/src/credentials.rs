//! Password hashing and bearer token minting.
//!
//! Passwords are stored as Argon2id PHC strings. Bearer tokens are 32 random
//! bytes, handed to the client once as URL-safe base64; only their SHA-256
//! is persisted.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::Engine;
use rand::Rng;

use crate::error::{BankdocError, BankdocResult};
use crate::fingerprint::fingerprint;

const TOKEN_BYTES: usize = 32;

pub fn hash_password(password: &str) -> BankdocResult<String> {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| BankdocError::internal(format!("Failed to encode salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BankdocError::internal(format!("Failed to hash password: {}", e)))
}

/// `false` for a wrong password; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> BankdocResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| BankdocError::internal(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// A freshly minted bearer token and the digest that gets stored.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub secret: String,
    pub token_hash: String,
}

pub fn issue_token() -> IssuedToken {
    let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().gen();
    let secret = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
    let token_hash = hash_token(&secret);
    IssuedToken { secret, token_hash }
}

pub fn hash_token(secret: &str) -> String {
    fingerprint(secret.as_bytes()).into_string()
}
