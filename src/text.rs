//! Latin-1 text conversion
//!
//! Fonts address exactly 256 code points, so every string is converted to
//! Latin-1 bytes once, at the API boundary. Characters above U+00FF are
//! handled by an explicit policy instead of being silently truncated.

use serde::{Deserialize, Serialize};

/// What to do with characters that have no Latin-1 code point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappablePolicy {
    /// Substitute the configured replacement byte
    #[default]
    Replace,
    /// Keep only the low byte of the code point
    Truncate,
}

/// Convert a string to Latin-1 code points.
///
/// `replacement` is used for unmappable characters under `Replace`.
pub fn to_latin1(text: &str, policy: UnmappablePolicy, replacement: u8) -> Vec<u8> {
    text.chars()
        .map(|ch| match u8::try_from(u32::from(ch)) {
            Ok(byte) => byte,
            Err(_) => match policy {
                UnmappablePolicy::Replace => replacement,
                UnmappablePolicy::Truncate => (u32::from(ch) & 0xFF) as u8,
            },
        })
        .collect()
}

/// Latin-1 byte for a replacement character, falling back to '?'
pub fn replacement_byte(ch: char) -> u8 {
    u8::try_from(u32::from(ch)).unwrap_or(b'?')
}

/// Decode Latin-1 bytes back into a string (for display)
pub fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
