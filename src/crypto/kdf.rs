//! PBKDF2-HMAC-SHA256 key derivation
//!
//! Stretches the password with the salter's output into raw AES key
//! material. The salt is public and reproducible from the user identifier;
//! the password is the only secret input.

use hmac::Hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::debug;

use super::SecureBytes;
use crate::config::{Config, SUPPORTED_KDF, SUPPORTED_KEY_ALGORITHM, SUPPORTED_KEY_LENGTHS};
use crate::error::{CryptError, Result};

/// Symmetric key algorithm the material is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Aes,
}

impl KeyAlgorithm {
    /// Parse a profile key algorithm name
    pub fn from_name(name: &str) -> Option<Self> {
        (name == SUPPORTED_KEY_ALGORITHM).then_some(KeyAlgorithm::Aes)
    }
}

/// Derived key bytes, tagged with the algorithm they belong to
pub struct KeyMaterial {
    key: SecureBytes,
    algorithm: KeyAlgorithm,
}

impl KeyMaterial {
    /// Wrap raw key bytes
    pub fn new(key: SecureBytes, algorithm: KeyAlgorithm) -> Self {
        Self { key, algorithm }
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Algorithm the key is meant for
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Key length in bits
    pub fn len_bits(&self) -> usize {
        self.key.len() * 8
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &self.algorithm)
            .field("bits", &self.len_bits())
            .finish()
    }
}

/// Derives AES keys from a password and a salt
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    iterations: u32,
    key_length_bits: u32,
    kdf_algorithm: String,
    key_algorithm: String,
}

impl KeyDeriver {
    /// Deriver using the profile's KDF parameters
    pub fn new(config: &Config) -> Self {
        Self {
            iterations: config.kdf_iterations(),
            key_length_bits: config.key_length_bits(),
            kdf_algorithm: config.kdf_algorithm().to_string(),
            key_algorithm: config.key_algorithm().to_string(),
        }
    }

    /// Derive `key_length_bits / 8` bytes of key material
    pub fn derive_key(&self, password: &SecretString, salt: &str) -> Result<KeyMaterial> {
        if self.kdf_algorithm != SUPPORTED_KDF {
            return Err(CryptError::KeyDerivation(format!(
                "key derivation function '{}' is not available",
                self.kdf_algorithm
            )));
        }

        let algorithm = KeyAlgorithm::from_name(&self.key_algorithm).ok_or_else(|| {
            CryptError::KeyDerivation(format!(
                "key algorithm '{}' is not available",
                self.key_algorithm
            ))
        })?;

        if self.iterations == 0 {
            return Err(CryptError::KeyDerivation("iterations must be at least 1".into()));
        }

        if !SUPPORTED_KEY_LENGTHS.contains(&self.key_length_bits) {
            return Err(CryptError::KeyDerivation(format!(
                "invalid key length: {} bits",
                self.key_length_bits
            )));
        }

        let mut key_bytes = vec![0u8; (self.key_length_bits / 8) as usize];
        pbkdf2::pbkdf2::<Hmac<Sha256>>(
            password.expose_secret().as_bytes(),
            salt.as_bytes(),
            self.iterations,
            &mut key_bytes,
        )
        .map_err(|e| CryptError::KeyDerivation(format!("PBKDF2 failed: {}", e)))?;

        debug!(
            iterations = self.iterations,
            bits = self.key_length_bits,
            "key derived"
        );

        Ok(KeyMaterial::new(SecureBytes::new(key_bytes), algorithm))
    }
}
