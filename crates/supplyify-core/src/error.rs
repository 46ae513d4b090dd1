use thiserror::Error;

/// All the ways things can go wrong in Supplyify
///
/// The first block is user-facing: the presentation layer shows these as
/// messages and carries on. The rest are infrastructure failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Email already in use")]
    DuplicateAccount,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min_len} characters and include 1 uppercase letter")]
    WeakPassword { min_len: usize },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email must not be empty")]
    InvalidEmail,

    #[error("Session expired or unknown. Please log in again")]
    InvalidSession,

    #[error("Supply item not found: {0}")]
    NotFound(String),

    #[error("No estimate available: {0}")]
    NoEstimate(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Storage operation failed: {0}")]
    StorageError(String),

    #[error("Password hashing failed: {0}")]
    HashError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by what the user typed, as opposed to a broken
    /// database or config file
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateAccount
                | Error::PasswordMismatch
                | Error::WeakPassword { .. }
                | Error::InvalidCredentials
                | Error::InvalidEmail
                | Error::InvalidSession
                | Error::NotFound(_)
                | Error::NoEstimate(_)
                | Error::InvalidQuantity(_)
        )
    }
}
