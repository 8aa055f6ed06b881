//! Deterministic salt derivation from a user identifier
//!
//! The identifier is encoded with the configured character set and then
//! base64-encoded `iterations` times, each round re-encoding the previous
//! round's text. Output must stay bit-identical to data encrypted earlier,
//! so none of this may change without breaking old ciphertext.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use super::Charset;
use crate::config::{CharacterSets, Config};
use crate::error::{CryptError, Result};

/// Derives the public salt from a user identifier
#[derive(Debug, Clone)]
pub struct Salter {
    charset: Charset,
    iterations: u32,
}

impl Salter {
    /// Build a salter from the profile, checking its charset against `supported`
    pub fn new(config: &Config, supported: &CharacterSets) -> Result<Self> {
        Self::with_params(config.salt_charset(), config.salt_iterations(), supported)
    }

    /// Build a salter from an explicit charset name and iteration count
    pub fn with_params(charset: &str, iterations: u32, supported: &CharacterSets) -> Result<Self> {
        let charset = supported.resolve(charset)?;

        if iterations == 0 {
            return Err(CryptError::ConfigValidation(
                "salter iterations must be at least 1".into(),
            ));
        }

        Ok(Self { charset, iterations })
    }

    /// Derive the salt for `identifier`. Characters the charset cannot
    /// represent are encoded as `?`, so every identifier yields a salt.
    pub fn get_salt(&self, identifier: &str) -> String {
        let mut current = identifier.to_string();

        for _ in 0..self.iterations {
            current = STANDARD.encode(self.charset.encode_lossy(&current));
        }

        debug!(
            charset = %self.charset,
            iterations = self.iterations,
            salt_len = current.len(),
            "salt derived"
        );

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salter(iterations: u32) -> Salter {
        Salter::with_params("UTF-8", iterations, &CharacterSets::default()).unwrap()
    }

    #[test]
    fn test_reference_vector_short() {
        assert_eq!(
            salter(3).get_salt("jonathanp62@gmail.com"),
            "WVcwNWRWbFlVbTlaVnpWM1RtcEtRVm95TVdoaFYzZDFXVEk1ZEE9PQ=="
        );
    }

    #[test]
    fn test_reference_vector_long() {
        assert_eq!(
            salter(3).get_salt("jonathanmartinparker@somedomain.com"),
            "WVcwNWRWbFlVbTlaVnpWMFdWaEtNR0ZYTlhkWldFcHlXbGhLUVdNeU9YUmFWMUoyWWxkR2NHSnBOV3BpTWpBOQ=="
        );
    }

    #[test]
    fn test_deterministic() {
        let s = salter(3);
        assert_eq!(s.get_salt("user@example.com"), s.get_salt("user@example.com"));
    }

    #[test]
    fn test_iterations_change_output() {
        let id = "user@example.com";
        assert_ne!(salter(2).get_salt(id), salter(3).get_salt(id));
        assert_eq!(salter(1).get_salt(id), STANDARD.encode(id));
    }

    #[test]
    fn test_charset_changes_output() {
        let utf16 = Salter::with_params("utf-16", 1, &CharacterSets::default()).unwrap();
        assert_eq!(utf16.get_salt("A"), STANDARD.encode([0xFEu8, 0xFF, 0x00, 0x41]));
    }

    #[test]
    fn test_unmappable_identifier_characters_become_question_marks() {
        let ascii = Salter::with_params("US-ASCII", 1, &CharacterSets::default()).unwrap();
        assert_eq!(ascii.get_salt("josé"), "am9zPw==");

        let latin1 = Salter::with_params("ISO-8859-1", 1, &CharacterSets::default()).unwrap();
        assert_eq!(latin1.get_salt("Zoë€"), "Wm/rPw==");
    }

    #[test]
    fn test_unsupported_charset() {
        let result = Salter::with_params("Not-Supported", 3, &CharacterSets::default());
        assert!(matches!(result, Err(CryptError::UnsupportedCharset(_))));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = Salter::with_params("UTF-8", 0, &CharacterSets::default());
        assert!(result.is_err());
    }
}
