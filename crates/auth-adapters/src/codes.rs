//! Confirmation codes: random alphanumeric, stored only as an Argon2 hash.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::distr::Alphanumeric;
use rand::Rng;

use domains::{AppError, CodeIssuer, IssuedCode, Result};

pub const DEFAULT_CODE_LENGTH: usize = 24;

pub struct ConfirmationCodes {
    length: usize,
}

impl ConfirmationCodes {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for ConfirmationCodes {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeIssuer for ConfirmationCodes {
    fn issue(&self) -> Result<IssuedCode> {
        let code: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect();
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(code.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("code hashing failed: {e}")))?
            .to_string();
        Ok(IssuedCode { code, hash })
    }

    fn verify(&self, code: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(code.as_bytes(), &parsed)
            .is_ok()
    }
}
