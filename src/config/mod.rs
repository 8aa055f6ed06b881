//! Configuration management for aes256
//!
//! Handles:
//! - The JSON cryptographic profile and its validation
//! - The character set whitelist used by the salter

mod charsets;
mod profile;
mod storage;

pub use charsets::CharacterSets;
pub use profile::{
    CipherSection, Config, ConfigFile, SalterSection, SUPPORTED_CIPHER_INSTANCE, SUPPORTED_KDF,
    SUPPORTED_KEY_ALGORITHM, SUPPORTED_KEY_LENGTHS, SUPPORTED_TEXT_CHARSET,
};
pub use storage::{
    default_config_json, get_local_config_path, get_user_config_path, load_config,
    read_config_file, resolve_config_path,
};
