use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{info, warn};

use crate::{backend::StorageBackend, models::Account, Error, Result};

/// Shortest password we accept
pub const MIN_PASSWORD_LEN: usize = 8;

/// Password policy: at least [`MIN_PASSWORD_LEN`] characters and one uppercase letter
pub fn validate_password(password: &str) -> Result<()> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());

    if long_enough && has_upper {
        Ok(())
    } else {
        Err(Error::WeakPassword {
            min_len: MIN_PASSWORD_LEN,
        })
    }
}

/// Hash a password using Argon2id with a fresh random salt. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
///
/// `Ok(false)` on mismatch, `Err` only if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Account creation and credential checks on top of any storage backend
pub struct CredentialStore<'a, B: StorageBackend + ?Sized> {
    backend: &'a mut B,
}

impl<'a, B: StorageBackend + ?Sized> CredentialStore<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self { backend }
    }

    /// Create an account
    ///
    /// Checks run in a fixed order: empty email, taken email, confirmation
    /// mismatch, then password strength.
    pub fn register(&mut self, email: &str, password: &str, confirm: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(Error::InvalidEmail);
        }
        if self.backend.find_account(email)?.is_some() {
            return Err(Error::DuplicateAccount);
        }
        if password != confirm {
            return Err(Error::PasswordMismatch);
        }
        validate_password(password)?;

        let account = Account {
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };

        // The backend has the final say in case someone registered in between
        if !self.backend.insert_account(&account)? {
            return Err(Error::DuplicateAccount);
        }

        info!("Created account {}", email);
        Ok(())
    }

    /// Check an email/password pair against the stored hash
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Account> {
        let Some(account) = self.backend.find_account(email)? else {
            warn!("Login attempt for unknown account");
            return Err(Error::InvalidCredentials);
        };

        if verify_password(password, &account.password_hash)? {
            Ok(account)
        } else {
            warn!("Wrong password for {}", email);
            Err(Error::InvalidCredentials)
        }
    }
}
