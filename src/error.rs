use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptError>;

#[derive(Debug, Error)]
pub enum CryptError {
    #[error("Invalid configuration: {0}")]
    ConfigValidation(String),

    #[error("Character set '{0}' is not supported")]
    UnsupportedCharset(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Unable to initialize cipher: {0}")]
    CipherInit(String),

    /// Wrong password and corrupted data are deliberately indistinguishable.
    #[error("Decryption failed: data is corrupted or the password is wrong")]
    CipherOperation,

    #[error("Malformed encrypted data: {0}")]
    Format(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("I/O error on '{}': {}", .path.display(), .source)]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input and output are the same file: '{}'", .0.display())]
    SameFile(PathBuf),

    #[error("Password does not meet the policy: {0}")]
    WeakPassword(String),

    #[error("The two entered passwords do not match")]
    PasswordMismatch,

    #[error("Operation cancelled by the user")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CryptError {
    /// Wrap an I/O error with the path it happened on.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CryptError::File {
            path: path.into(),
            source,
        }
    }
}
