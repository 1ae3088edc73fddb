//! Credential hashing - one-way password hash with verify.
//!
//! The orchestrator only depends on [`CredentialHasher`]; Argon2 is the
//! default primitive.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};

use crate::error::{DomainError, DomainResult};

/// One-way password hash and verification.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plain text password into a self-describing hash string.
    fn hash(&self, plain_text: &str) -> DomainResult<String>;

    /// Check a plain text password against a stored hash.
    ///
    /// A malformed stored hash never matches.
    fn verify(&self, plain_text: &str, hash: &str) -> bool;
}

/// Argon2id hasher producing PHC-format strings.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

impl Argon2Hasher {
    /// Hasher with the recommended default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(Params::new(1024, 1, 1, None).unwrap())
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("SecurePassword123!").unwrap();

        assert!(hasher.verify("SecurePassword123!", &hash));
        assert!(!hasher.verify("WrongPassword123", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = fast_hasher();
        let first = hasher.hash("SamePassword123").unwrap();
        let second = hasher.hash("SamePassword123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("SamePassword123", &first));
        assert!(hasher.verify("SamePassword123", &second));
    }

    #[test]
    fn test_hash_never_contains_plain_text() {
        let hasher = fast_hasher();
        let hash = hasher.hash("password123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("password123"));
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let hasher = fast_hasher();
        assert!(!hasher.verify("password123", "not-a-phc-string"));
        assert!(!hasher.verify("password123", ""));
    }

    #[test]
    fn test_default_hasher_verifies_its_own_hash() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("12345678").unwrap();
        assert!(hasher.verify("12345678", &hash));
    }
}
