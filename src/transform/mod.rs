//! End-to-end encryption of strings and files
//!
//! Both shapes share the same key schedule: identifier -> salt -> PBKDF2
//! key, then a fresh IV per encryption. The IV is stored in front of the
//! ciphertext, so only the password, identifier and profile are needed to
//! decrypt.

mod file;
mod string;

pub use file::{FileOutcome, FileTransform, DEFAULT_CHUNK_SIZE};
pub use string::StringTransform;

use secrecy::SecretString;
use tracing::debug;

use crate::config::{CharacterSets, Config};
use crate::crypto::{KeyDeriver, KeyMaterial, Salter};
use crate::error::Result;

/// Per-call secret input
///
/// The password is dropped, and therefore wiped, as soon as the key has
/// been derived.
pub struct Credentials {
    password: SecretString,
    identifier: String,
}

impl Credentials {
    /// Credentials from a plain password
    pub fn new(password: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            password: SecretString::new(password.into()),
            identifier: identifier.into(),
        }
    }

    /// Credentials from an already protected password
    pub fn from_secret(password: SecretString, identifier: impl Into<String>) -> Self {
        Self {
            password,
            identifier: identifier.into(),
        }
    }

    /// User identifier the salt is derived from
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Run salter and key deriver, consuming the credentials
fn derive_key(
    config: &Config,
    charsets: &CharacterSets,
    credentials: Credentials,
) -> Result<KeyMaterial> {
    let Credentials {
        password,
        identifier,
    } = credentials;

    let salt = Salter::new(config, charsets)?.get_salt(&identifier);
    let key = KeyDeriver::new(config).derive_key(&password, &salt)?;
    drop(password);

    debug!(bits = key.len_bits(), "key schedule complete");
    Ok(key)
}
