//! aes256 - password-based AES-CBC encryption for strings and files
//!
//! This crate provides:
//! - A validated cryptographic profile loaded from JSON
//! - Deterministic salts derived from a user identifier
//! - PBKDF2-HMAC-SHA256 key derivation
//! - AES-CBC encryption of strings (base64 payload) and files (streamed),
//!   with the random IV stored in front of the ciphertext
//!
//! The output carries no authentication tag, so tampering cannot be told
//! apart from a wrong password.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod password;
pub mod transform;

pub use config::Config;
pub use error::{CryptError, Result};
pub use transform::{Credentials, FileOutcome, FileTransform, StringTransform};
