//! Text <-> byte conversion for the supported character sets

use std::fmt;

use crate::error::{CryptError, Result};

/// A character set known to the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Iso8859_1,
    UsAscii,
    Utf8,
    /// Big-endian with a leading byte order mark on encode
    Utf16,
    Utf16Be,
    Utf16Le,
}

const BOM_BE: [u8; 2] = [0xFE, 0xFF];
const BOM_LE: [u8; 2] = [0xFF, 0xFE];
const REPLACEMENT: u8 = b'?';

impl Charset {
    /// Look up a charset by name (case-insensitive, `_` and `-` are equivalent)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace('_', "-");
        match normalized.as_str() {
            "ISO-8859-1" => Some(Charset::Iso8859_1),
            "US-ASCII" => Some(Charset::UsAscii),
            "UTF-8" => Some(Charset::Utf8),
            "UTF-16" => Some(Charset::Utf16),
            "UTF-16BE" => Some(Charset::Utf16Be),
            "UTF-16LE" => Some(Charset::Utf16Le),
            _ => None,
        }
    }

    /// Canonical name of the charset
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Iso8859_1 => "ISO-8859-1",
            Charset::UsAscii => "US-ASCII",
            Charset::Utf8 => "UTF-8",
            Charset::Utf16 => "UTF-16",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
        }
    }

    /// Encode `text`, failing on characters the charset cannot represent
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        if let Some(max) = self.single_byte_max() {
            if let Some(c) = text.chars().find(|&c| c as u32 > max) {
                return Err(CryptError::Encoding(format!(
                    "character U+{:04X} cannot be encoded as {}",
                    c as u32,
                    self.name()
                )));
            }
        }
        Ok(self.encode_lossy(text))
    }

    /// Encode `text`, writing `?` for every character the charset cannot
    /// represent. Salts depend on this exact replacement.
    pub fn encode_lossy(&self, text: &str) -> Vec<u8> {
        if let Some(max) = self.single_byte_max() {
            return text
                .chars()
                .map(|c| if c as u32 <= max { c as u8 } else { REPLACEMENT })
                .collect();
        }

        match self {
            Charset::Utf16 => {
                let mut out = BOM_BE.to_vec();
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                out
            }
            Charset::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Charset::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            _ => text.as_bytes().to_vec(),
        }
    }

    /// Decode `bytes`, failing on malformed input
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| CryptError::Encoding(format!("invalid UTF-8: {}", e))),
            Charset::Iso8859_1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Charset::UsAscii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(CryptError::Encoding(format!(
                        "non-ASCII byte at offset {}",
                        pos
                    )));
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
            Charset::Utf16 => {
                if bytes.starts_with(&BOM_LE) {
                    decode_utf16(&bytes[2..], u16::from_le_bytes)
                } else if bytes.starts_with(&BOM_BE) {
                    decode_utf16(&bytes[2..], u16::from_be_bytes)
                } else {
                    decode_utf16(bytes, u16::from_be_bytes)
                }
            }
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
        }
    }

    fn single_byte_max(&self) -> Option<u32> {
        match self {
            Charset::Iso8859_1 => Some(0xFF),
            Charset::UsAscii => Some(0x7F),
            _ => None,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(CryptError::Encoding("odd number of bytes for UTF-16".into()));
    }

    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| CryptError::Encoding(format!("invalid UTF-16: {}", e)))
}
