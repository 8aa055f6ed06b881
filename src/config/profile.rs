//! Cryptographic profile structures
//!
//! `ConfigFile` mirrors the JSON document as written by users. It is only
//! turned into a [`Config`] after validation, and the transforms accept
//! nothing but a `Config`, so an unvalidated profile can never reach the
//! cipher.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CryptError, Result};

/// Character set accepted for cipher text handling
pub const SUPPORTED_TEXT_CHARSET: &str = "UTF-8";

/// The only cipher transform this tool has been tested with
pub const SUPPORTED_CIPHER_INSTANCE: &str = "AES/CBC/PKCS5Padding";

/// The only key derivation function this tool has been tested with
pub const SUPPORTED_KDF: &str = "PBKDF2WithHmacSHA256";

/// The only symmetric key algorithm this tool has been tested with
pub const SUPPORTED_KEY_ALGORITHM: &str = "AES";

/// Key lengths AES accepts, in bits
pub const SUPPORTED_KEY_LENGTHS: [u32; 3] = [128, 192, 256];

/// The `cipher` block of the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CipherSection {
    pub character_set: String,
    pub instance: String,
}

/// The `salter` block of the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SalterSection {
    pub character_set: String,
    pub iterations: u32,
}

/// The profile exactly as read from disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    #[serde(default)]
    pub cipher: Option<CipherSection>,
    #[serde(default)]
    pub salter: Option<SalterSection>,
    #[serde(default)]
    pub password_minimum_length: usize,
    #[serde(default)]
    pub pbe_key_spec_iterations: u32,
    #[serde(default)]
    pub pbe_key_spec_key_length: u32,
    #[serde(default)]
    pub secret_key_factory_instance: String,
    #[serde(default)]
    pub secret_key_spec_algorithm: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            cipher: Some(CipherSection {
                character_set: SUPPORTED_TEXT_CHARSET.to_string(),
                instance: SUPPORTED_CIPHER_INSTANCE.to_string(),
            }),
            salter: Some(SalterSection {
                character_set: "UTF-8".to_string(),
                iterations: 3,
            }),
            password_minimum_length: 12,
            pbe_key_spec_iterations: 65536,
            pbe_key_spec_key_length: 256,
            secret_key_factory_instance: SUPPORTED_KDF.to_string(),
            secret_key_spec_algorithm: SUPPORTED_KEY_ALGORITHM.to_string(),
        }
    }
}

impl ConfigFile {
    /// Parse a profile from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the profile against the parameter combinations this tool
    /// supports. Pure: nothing is mutated, and the answer never changes.
    pub fn validate(&self) -> Result<()> {
        let cipher = self
            .cipher
            .as_ref()
            .ok_or_else(|| CryptError::ConfigValidation("the cipher block is missing".into()))?;

        if cipher.character_set != SUPPORTED_TEXT_CHARSET {
            return Err(CryptError::ConfigValidation(format!(
                "cipher character set must be {}, got '{}'",
                SUPPORTED_TEXT_CHARSET, cipher.character_set
            )));
        }

        if cipher.instance != SUPPORTED_CIPHER_INSTANCE {
            return Err(CryptError::ConfigValidation(format!(
                "cipher instance must be {}, got '{}'",
                SUPPORTED_CIPHER_INSTANCE, cipher.instance
            )));
        }

        if !SUPPORTED_KEY_LENGTHS.contains(&self.pbe_key_spec_key_length) {
            return Err(CryptError::ConfigValidation(format!(
                "key length must be one of {:?} bits, got {}",
                SUPPORTED_KEY_LENGTHS, self.pbe_key_spec_key_length
            )));
        }

        if self.secret_key_spec_algorithm != SUPPORTED_KEY_ALGORITHM {
            return Err(CryptError::ConfigValidation(format!(
                "secret key algorithm must be {}, got '{}'",
                SUPPORTED_KEY_ALGORITHM, self.secret_key_spec_algorithm
            )));
        }

        if self.secret_key_factory_instance != SUPPORTED_KDF {
            return Err(CryptError::ConfigValidation(format!(
                "secret key factory must be {}, got '{}'",
                SUPPORTED_KDF, self.secret_key_factory_instance
            )));
        }

        if self.salter.is_none() {
            return Err(CryptError::ConfigValidation("the salter block is missing".into()));
        }

        Ok(())
    }

    /// Validate and freeze the profile
    pub fn into_config(self) -> Result<Config> {
        self.validate()?;

        // validate() guarantees both blocks are present
        let (Some(cipher), Some(salter)) = (self.cipher, self.salter) else {
            return Err(CryptError::ConfigValidation("incomplete profile".into()));
        };

        let config = Config {
            cipher_transform: cipher.instance,
            text_charset: cipher.character_set,
            salt_charset: salter.character_set,
            salt_iterations: salter.iterations,
            kdf_iterations: self.pbe_key_spec_iterations,
            key_length_bits: self.pbe_key_spec_key_length,
            kdf_algorithm: self.secret_key_factory_instance,
            key_algorithm: self.secret_key_spec_algorithm,
            password_minimum_length: self.password_minimum_length,
        };
        config.log_crypto_settings();

        Ok(config)
    }
}

/// A validated, read-only cryptographic profile
///
/// Only obtainable through [`ConfigFile::into_config`]. Cheap to share by
/// reference across any number of transform calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    cipher_transform: String,
    text_charset: String,
    salt_charset: String,
    salt_iterations: u32,
    kdf_iterations: u32,
    key_length_bits: u32,
    kdf_algorithm: String,
    key_algorithm: String,
    password_minimum_length: usize,
}

impl Config {
    /// Cipher transformation, e.g. `AES/CBC/PKCS5Padding`
    pub fn cipher_transform(&self) -> &str {
        &self.cipher_transform
    }

    /// Charset for string plaintexts
    pub fn text_charset(&self) -> &str {
        &self.text_charset
    }

    /// Charset the salter encodes identifiers with
    pub fn salt_charset(&self) -> &str {
        &self.salt_charset
    }

    /// Number of base64 rounds in the salt
    pub fn salt_iterations(&self) -> u32 {
        self.salt_iterations
    }

    /// PBKDF2 iteration count
    pub fn kdf_iterations(&self) -> u32 {
        self.kdf_iterations
    }

    /// Derived key length in bits
    pub fn key_length_bits(&self) -> u32 {
        self.key_length_bits
    }

    /// Secret key factory name
    pub fn kdf_algorithm(&self) -> &str {
        &self.kdf_algorithm
    }

    /// Algorithm the derived key is tagged with
    pub fn key_algorithm(&self) -> &str {
        &self.key_algorithm
    }

    /// Minimum length for new passwords
    pub fn password_minimum_length(&self) -> usize {
        self.password_minimum_length
    }

    fn log_crypto_settings(&self) {
        debug!(
            cipher = %self.cipher_transform,
            text_charset = %self.text_charset,
            salt_charset = %self.salt_charset,
            salt_iterations = self.salt_iterations,
            kdf = %self.kdf_algorithm,
            kdf_iterations = self.kdf_iterations,
            key_bits = self.key_length_bits,
            key_algorithm = %self.key_algorithm,
            "crypto settings"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rejected(file: ConfigFile) {
        match file.validate() {
            Err(CryptError::ConfigValidation(_)) => {}
            other => panic!("expected ConfigValidation, got {:?}", other),
        }
    }

    #[test]
    fn test_default_profile_is_valid() {
        let config = ConfigFile::default().into_config().unwrap();

        assert_eq!(config.cipher_transform(), "AES/CBC/PKCS5Padding");
        assert_eq!(config.key_length_bits(), 256);
        assert_eq!(config.salt_iterations(), 3);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let file = ConfigFile::default();

        assert!(file.validate().is_ok());
        assert!(file.validate().is_ok());
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn test_missing_cipher_rejected() {
        assert_rejected(ConfigFile {
            cipher: None,
            ..ConfigFile::default()
        });
    }

    #[test]
    fn test_cipher_charset_rejected() {
        let mut file = ConfigFile::default();
        file.cipher.as_mut().unwrap().character_set = "UTF-16".into();
        assert_rejected(file);
    }

    #[test]
    fn test_cipher_instance_rejected() {
        let mut file = ConfigFile::default();
        file.cipher.as_mut().unwrap().instance = "AES/EBC".into();
        assert_rejected(file);
    }

    #[test]
    fn test_key_length_rejected() {
        assert_rejected(ConfigFile {
            pbe_key_spec_key_length: 193,
            ..ConfigFile::default()
        });
    }

    #[test]
    fn test_other_key_lengths_accepted() {
        for bits in [128, 192] {
            let file = ConfigFile {
                pbe_key_spec_key_length: bits,
                ..ConfigFile::default()
            };
            assert!(file.validate().is_ok());
        }
    }

    #[test]
    fn test_key_algorithm_rejected() {
        assert_rejected(ConfigFile {
            secret_key_spec_algorithm: "EAS".into(),
            ..ConfigFile::default()
        });
    }

    #[test]
    fn test_key_factory_rejected() {
        assert_rejected(ConfigFile {
            secret_key_factory_instance: "PBKDF2WithHmacSHA1".into(),
            ..ConfigFile::default()
        });
    }

    #[test]
    fn test_missing_salter_rejected() {
        assert_rejected(ConfigFile {
            salter: None,
            ..ConfigFile::default()
        });
    }

    #[test]
    fn test_parse_kebab_case_json() {
        let json = r#"{
            "cipher": { "character-set": "UTF-8", "instance": "AES/CBC/PKCS5Padding" },
            "salter": { "character-set": "UTF-16", "iterations": 5 },
            "password-minimum-length": 14,
            "pbe-key-spec-iterations": 1000,
            "pbe-key-spec-key-length": 192,
            "secret-key-factory-instance": "PBKDF2WithHmacSHA256",
            "secret-key-spec-algorithm": "AES"
        }"#;

        let config = ConfigFile::from_json(json).unwrap().into_config().unwrap();

        assert_eq!(config.salt_charset(), "UTF-16");
        assert_eq!(config.salt_iterations(), 5);
        assert_eq!(config.kdf_iterations(), 1000);
        assert_eq!(config.key_length_bits(), 192);
        assert_eq!(config.password_minimum_length(), 14);
    }

    #[test]
    fn test_parse_without_salter_fails_validation() {
        let json = r#"{
            "cipher": { "character-set": "UTF-8", "instance": "AES/CBC/PKCS5Padding" },
            "pbe-key-spec-key-length": 256,
            "secret-key-factory-instance": "PBKDF2WithHmacSHA256",
            "secret-key-spec-algorithm": "AES"
        }"#;

        let file = ConfigFile::from_json(json).unwrap();
        assert_rejected(file);
    }
}
