//! Canvas dimensions: named presets or explicit sizes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PostError, Result};

/// Named sizes for the common social platforms.
pub const PRESETS: [(&str, u32, u32); 7] = [
    ("square", 1080, 1080),
    ("square_large", 1200, 1200),
    ("vertical", 1080, 1350),
    ("story", 1080, 1920),
    ("horizontal", 1200, 630),
    ("linkedin_banner", 1584, 396),
    ("twitter_post", 1200, 675),
];

/// Requested canvas size.
///
/// Parses from a preset name (`square`) or an explicit `WIDTHxHEIGHT`
/// (`1080x1350`). Serializes back to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Dimension {
    Preset(&'static str),
    Custom { width: u32, height: u32 },
}

impl Dimension {
    /// Look up a preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        PRESETS
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(n, _, _)| Dimension::Preset(n))
            .ok_or_else(|| PostError::UnknownDimensionPreset {
                name: name.to_string(),
                help: Some(format!("Available: {}", preset_names().join(", "))),
            })
    }

    pub fn custom(width: u32, height: u32) -> Self {
        Dimension::Custom { width, height }
    }

    /// Resolve to `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        match self {
            Dimension::Preset(name) => PRESETS
                .iter()
                .find(|(n, _, _)| n == name)
                .map(|&(_, w, h)| (w, h))
                .unwrap_or((1080, 1080)),
            Dimension::Custom { width, height } => (*width, *height),
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Preset("square")
    }
}

pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|(n, _, _)| *n).collect()
}

impl FromStr for Dimension {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some((w, h)) = s.split_once(['x', 'X']) {
            if let (Ok(width), Ok(height)) = (w.trim().parse(), h.trim().parse()) {
                return Ok(Dimension::Custom { width, height });
            }
        }
        Dimension::preset(s)
    }
}

impl TryFrom<String> for Dimension {
    type Error = PostError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Dimension::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl From<Dimension> for String {
    fn from(d: Dimension) -> Self {
        d.to_string()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Preset(name) => write!(f, "{}", name),
            Dimension::Custom { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}
