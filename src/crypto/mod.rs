//! Cryptographic building blocks for aes256
//!
//! This module provides:
//! - Character set codecs used for salts and text payloads
//! - The identifier salter
//! - PBKDF2-HMAC-SHA256 key derivation
//! - An incremental AES-CBC cipher pipeline
//! - Secure memory handling with automatic zeroing

mod charset;
mod kdf;
mod pipeline;
mod salter;
mod secure_bytes;

pub use charset::Charset;
pub use kdf::{KeyAlgorithm, KeyDeriver, KeyMaterial};
pub use pipeline::{generate_iv, CipherHandle, CipherPipeline, BLOCK_LEN, IV_LEN};
pub use salter::Salter;
pub use secure_bytes::SecureBytes;
