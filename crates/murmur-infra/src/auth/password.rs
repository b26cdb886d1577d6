//! Argon2 password hashing implementation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use murmur_core::ports::{AuthError, PasswordService};

/// Argon2-based password service. Digests carry their own salt and
/// parameters, so verification needs no extra state.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_password() {
        let service = Argon2PasswordService::new();
        let digest = service.hash("correct horse battery").unwrap();

        assert!(service.verify("correct horse battery", &digest).unwrap());
        assert!(!service.verify("incorrect horse", &digest).unwrap());
    }

    #[test]
    fn digests_are_salted() {
        let service = Argon2PasswordService::new();
        let a = service.hash("same-password").unwrap();
        let b = service.hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_digest_is_an_error_not_a_mismatch() {
        let service = Argon2PasswordService::new();
        assert!(service.verify("anything", "not-a-phc-string").is_err());
    }
}
