//! Security utilities for password and token handling.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hashes a bearer token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let hash = Sha256::digest(token.as_bytes());
    hex::encode(hash)
}

/// Generates a fresh bearer token and its storable digest.
///
/// The raw token is shown to the client exactly once; only the digest
/// is persisted.
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let raw = format!("wtk_{}", hex::encode(bytes));
    let digest = hash_token(&raw);
    (raw, digest)
}

/// Verifies a bearer token against a stored digest in constant time.
pub fn verify_token(input: &str, stored_hash: &str) -> bool {
    let input_hash = hash_token(input);
    input_hash.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a password with a random per-user salt.
///
/// Stored as `{salt}${digest}` so verification can recover the salt.
pub fn hash_password(password: &str) -> String {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);
    format!("{salt}${}", password_digest(&salt, password))
}

/// Verifies a password against a stored salted digest in constant time.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    let input_digest = password_digest(salt, password);
    input_digest.as_bytes().ct_eq(digest.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        let (raw, digest) = generate_token();

        assert!(raw.starts_with("wtk_"));
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token(&raw));
    }

    #[test]
    fn test_token_verification() {
        let (raw, digest) = generate_token();

        assert!(verify_token(&raw, &digest));
        assert!(!verify_token("wtk_wrong", &digest));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let stored = hash_password("correct horse battery staple");

        assert!(verify_password("correct horse battery staple", &stored));
        assert!(!verify_password("wrong password", &stored));
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("same password");
        let b = hash_password("same password");
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_rejected() {
        assert!(!verify_password("anything", "no-dollar-separator"));
    }
}
