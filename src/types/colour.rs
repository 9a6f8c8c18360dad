//! RGB colour type and hex parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PostError, Result};

/// An opaque RGB colour.
///
/// Serializes as a `#RRGGBB` string so templates and requests stay
/// human-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Exactly six hex digits are accepted, with one optional leading `#`
    /// and in either case. Shorthand (`#FFF`) and alpha (`#RRGGBBAA`)
    /// forms are rejected.
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PostError::InvalidColorFormat {
                value: s.to_string(),
            });
        }

        Ok(Self::rgb(
            parse_hex_byte(&hex[0..2]),
            parse_hex_byte(&hex[2..4]),
            parse_hex_byte(&hex[4..6]),
        ))
    }

    /// Hex string in `#RRGGBB` form (uppercase).
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// RGBA with the given alpha.
    pub fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<[u8; 3]> for Colour {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl FromStr for Colour {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = PostError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_hex()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Convert a hex string straight to an `(r, g, b)` triple.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8)> {
    let c = Colour::from_hex(hex)?;
    Ok((c.r, c.g, c.b))
}

/// Inverse of [`hex_to_rgb`].
pub fn rgb_to_hex(rgb: (u8, u8, u8)) -> String {
    Colour::from(rgb).to_hex()
}

// Callers validate the digits first.
fn parse_hex_byte(s: &str) -> u8 {
    u8::from_str_radix(s, 16).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_white_and_black() {
        assert_eq!(hex_to_rgb("#FFFFFF").unwrap(), (255, 255, 255));
        assert_eq!(hex_to_rgb("#000000").unwrap(), (0, 0, 0));
    }

    #[test]
    fn test_parse_without_hash_and_lowercase() {
        assert_eq!(Colour::from_hex("0a66c2").unwrap(), Colour::rgb(10, 102, 194));
        assert_eq!(Colour::from_hex("  #0A66C2 ").unwrap(), Colour::rgb(10, 102, 194));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "#", "#FFF", "#FFFFFFFF", "#GGGGGG", "##FFFFFF", "#12345", "#ÿÿÿ"] {
            let err = Colour::from_hex(bad).unwrap_err();
            assert!(
                matches!(err, PostError::InvalidColorFormat { .. }),
                "expected InvalidColorFormat for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_display_round_trip() {
        let c = Colour::rgb(0x8B, 0x00, 0xFF);
        assert_eq!(c.to_string(), "#8B00FF");
        assert_eq!(rgb_to_hex(hex_to_rgb("#b47aea").unwrap()), "#B47AEA");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let c: Colour = serde_json::from_str("\"#FF6B00\"").unwrap();
        assert_eq!(c, Colour::rgb(255, 107, 0));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#FF6B00\"");
        assert!(serde_json::from_str::<Colour>("\"orange\"").is_err());
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(Colour::WHITE.with_alpha(30), [255, 255, 255, 30]);
    }
}
