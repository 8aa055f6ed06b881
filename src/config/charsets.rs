//! Whitelist of character sets the salter may be configured with

use crate::crypto::Charset;
use crate::error::{CryptError, Result};

/// An immutable list of character set names
///
/// Handed to the salter at construction time instead of living in a
/// global, so tests can narrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSets {
    names: Vec<String>,
}

impl CharacterSets {
    /// Build a whitelist from any list of names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` is whitelisted, ignoring case and `_`/`-` differences
    pub fn contains(&self, name: &str) -> bool {
        let wanted = normalize(name);
        self.names.iter().any(|n| normalize(n) == wanted)
    }

    /// Resolve a whitelisted name to its codec
    pub fn resolve(&self, name: &str) -> Result<Charset> {
        if !self.contains(name) {
            return Err(CryptError::UnsupportedCharset(name.to_string()));
        }
        Charset::from_name(name).ok_or_else(|| CryptError::UnsupportedCharset(name.to_string()))
    }

    /// Whitelisted names in their configured spelling
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for CharacterSets {
    fn default() -> Self {
        Self::new([
            "ISO-8859-1",
            "US-ASCII",
            "UTF-8",
            "UTF-16",
            "UTF-16BE",
            "UTF-16LE",
        ])
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_matches_case_insensitively() {
        let sets = CharacterSets::default();

        assert!(sets.contains("utf-8"));
        assert!(sets.contains("Utf-16Be"));
        assert!(sets.contains("US_ASCII"));
        assert!(!sets.contains("Not-Supported"));
    }

    #[test]
    fn test_narrowed_list_rejects_known_codec() {
        let sets = CharacterSets::new(["UTF-8"]);

        assert_eq!(sets.resolve("utf-8").unwrap(), Charset::Utf8);
        assert!(matches!(
            sets.resolve("UTF-16"),
            Err(CryptError::UnsupportedCharset(name)) if name == "UTF-16"
        ));
    }
}
