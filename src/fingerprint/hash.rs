//! Content fingerprint tokens.

use std::fmt;

/// Length of a rendered token in hex characters.
pub const TOKEN_LEN: usize = 16;

/// Truncated blake3 digest of an asset's bytes.
///
/// Rendered as 16 lowercase hex characters, so it is URL-safe and stable
/// across process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token([u8; TOKEN_LEN / 2]);

impl Token {
    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; TOKEN_LEN / 2] {
        &self.0
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Parse a rendered token.
    ///
    /// Only the canonical lowercase form is accepted, so a token has exactly
    /// one spelling in URLs.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != TOKEN_LEN || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        let mut bytes = [0u8; TOKEN_LEN / 2];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Fingerprint an asset's full contents.
pub fn hash(bytes: &[u8]) -> Token {
    let digest = blake3::hash(bytes);
    let mut token = [0u8; TOKEN_LEN / 2];
    token.copy_from_slice(&digest.as_bytes()[..TOKEN_LEN / 2]);
    Token(token)
}
