//! Locating and reading the JSON profile
//!
//! Lookup order:
//! 1. an explicit path (`--config` or `AES256_CONFIG`)
//! 2. `config/config.json` under the working directory
//! 3. `aes256/config.json` under the platform config directory

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CryptError, Result};

use super::{Config, ConfigFile};

const APP_DIR: &str = "aes256";
const CONFIG_FILE: &str = "config.json";
const LOCAL_CONFIG_DIR: &str = "config";

/// Path of the per-user profile, if the platform has a config directory
pub fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// Path of the profile next to the working directory
pub fn get_local_config_path() -> PathBuf {
    Path::new(LOCAL_CONFIG_DIR).join(CONFIG_FILE)
}

/// Pick the profile to load. Returns `None` when nothing exists on disk.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = get_local_config_path();
    if local.exists() {
        return Some(local);
    }

    get_user_config_path().filter(|p| p.exists())
}

/// Read and parse a profile without validating it
pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let text = fs::read_to_string(path).map_err(|e| CryptError::file(path, e))?;
    ConfigFile::from_json(&text)
}

/// Load and validate the profile
///
/// Falls back to the built-in reference profile when no file is found and
/// no explicit path was requested.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match resolve_config_path(explicit) {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            read_config_file(&path)?.into_config()
        }
        None => {
            debug!("no configuration file found, using the reference profile");
            ConfigFile::default().into_config()
        }
    }
}

/// Render the reference profile as pretty JSON
pub fn default_config_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&ConfigFile::default())?)
}
