//! Reversible, fixed-width text encodings of 128-bit identifiers.
//!
//! Keys handed to callers are opaque but not secret: the encodings exist to
//! make identifiers shorter and recognizable, never to restrict access.
//!
//! - [`Base36KeyCodec`] - 26 lowercase alphanumerics (two zero-padded 13-digit
//!   halves, most significant half first)
//! - [`Base64UrlKeyCodec`] - 22 characters of unpadded base64url

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;
use uuid::Uuid;

/// Reasons an external key string fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyDecodeError {
    #[error("key must be exactly {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },

    #[error("malformed key: {0}")]
    InvalidLayout(String),
}

/// Bijective mapping between identifiers and their external string form.
pub trait KeyCodec: Send + Sync {
    /// Number of characters in every encoded key.
    fn width(&self) -> usize;

    fn encode(&self, id: Uuid) -> String;

    /// # Errors
    ///
    /// Returns [`KeyDecodeError`] if `value` is not a string produced by
    /// [`KeyCodec::encode`].
    fn decode(&self, value: &str) -> Result<Uuid, KeyDecodeError>;
}

fn check_shape(
    value: &str,
    width: usize,
    allowed: impl Fn(char) -> bool,
) -> Result<(), KeyDecodeError> {
    let actual = value.chars().count();
    if actual != width {
        return Err(KeyDecodeError::InvalidLength {
            expected: width,
            actual,
        });
    }
    match value.chars().enumerate().find(|&(_, c)| !allowed(c)) {
        Some((position, character)) => Err(KeyDecodeError::InvalidCharacter {
            position,
            character,
        }),
        None => Ok(()),
    }
}

const RADIX: u32 = 36;
const HALF_WIDTH: usize = 13;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Zero-padded base-36 codec producing 26-character keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base36KeyCodec;

impl Base36KeyCodec {
    fn push_half(out: &mut String, mut value: u64) {
        let mut digits = [b'0'; HALF_WIDTH];
        for slot in digits.iter_mut().rev() {
            *slot = BASE36_DIGITS[(value % RADIX as u64) as usize];
            value /= RADIX as u64;
        }
        out.extend(digits.iter().map(|&b| b as char));
    }

    fn parse_half(half: &str) -> Result<u64, KeyDecodeError> {
        u64::from_str_radix(half, RADIX)
            .map_err(|_| KeyDecodeError::InvalidLayout(format!("{half:?} exceeds 64 bits")))
    }
}

impl KeyCodec for Base36KeyCodec {
    fn width(&self) -> usize {
        2 * HALF_WIDTH
    }

    fn encode(&self, id: Uuid) -> String {
        let (high, low) = id.as_u64_pair();
        let mut out = String::with_capacity(self.width());
        Self::push_half(&mut out, high);
        Self::push_half(&mut out, low);
        out
    }

    fn decode(&self, value: &str) -> Result<Uuid, KeyDecodeError> {
        check_shape(value, self.width(), |c| {
            c.is_ascii_digit() || c.is_ascii_lowercase()
        })?;
        let (high, low) = value.split_at(HALF_WIDTH);
        Ok(Uuid::from_u64_pair(
            Self::parse_half(high)?,
            Self::parse_half(low)?,
        ))
    }
}

/// Unpadded base64url codec producing 22-character keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64UrlKeyCodec;

impl KeyCodec for Base64UrlKeyCodec {
    fn width(&self) -> usize {
        22
    }

    fn encode(&self, id: Uuid) -> String {
        URL_SAFE_NO_PAD.encode(id.as_bytes())
    }

    fn decode(&self, value: &str) -> Result<Uuid, KeyDecodeError> {
        check_shape(value, self.width(), |c| {
            c.is_ascii_alphanumeric() || c == '-' || c == '_'
        })?;
        // Non-zero trailing bits are rejected here, which keeps the mapping one-to-one.
        let bytes = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| KeyDecodeError::InvalidLayout(e.to_string()))?;
        Uuid::from_slice(&bytes).map_err(|e| KeyDecodeError::InvalidLayout(e.to_string()))
    }
}

/// Selectable external key encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFormat {
    #[default]
    Base36,
    Base64Url,
}

impl KeyFormat {
    pub fn codec(self) -> Arc<dyn KeyCodec> {
        match self {
            KeyFormat::Base36 => Arc::new(Base36KeyCodec),
            KeyFormat::Base64Url => Arc::new(Base64UrlKeyCodec),
        }
    }
}

impl FromStr for KeyFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base36" => Ok(KeyFormat::Base36),
            "base64url" => Ok(KeyFormat::Base64Url),
            other => Err(format!(
                "key format must be 'base36' or 'base64url', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFormat::Base36 => f.write_str("base36"),
            KeyFormat::Base64Url => f.write_str("base64url"),
        }
    }
}
