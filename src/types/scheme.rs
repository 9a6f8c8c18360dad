//! Named colour schemes.
//!
//! The built-in catalogue is a static table; lookups hand out `&'static`
//! references and nothing is ever mutated.

use serde::Serialize;

use crate::error::{PostError, Result};

use super::Colour;

/// A named set of brand colours, stored as hex strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    pub name: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

impl ColorScheme {
    pub fn primary_rgb(&self) -> Colour {
        to_rgb(self.primary)
    }

    pub fn secondary_rgb(&self) -> Colour {
        to_rgb(self.secondary)
    }

    pub fn accent_rgb(&self) -> Colour {
        to_rgb(self.accent)
    }

    pub fn text_rgb(&self) -> Colour {
        to_rgb(self.text)
    }

    pub fn background_rgb(&self) -> Colour {
        to_rgb(self.background)
    }
}

// Every entry of SCHEMES is checked by `test_builtin_hex_is_valid`.
fn to_rgb(hex: &str) -> Colour {
    Colour::from_hex(hex).unwrap_or_default()
}

const fn scheme(
    name: &'static str,
    primary: &'static str,
    secondary: &'static str,
    accent: &'static str,
    text: &'static str,
    background: &'static str,
) -> ColorScheme {
    ColorScheme {
        name,
        primary,
        secondary,
        accent,
        text,
        background,
    }
}

/// Built-in schemes in registration order.
static SCHEMES: [ColorScheme; 12] = [
    // Professional
    scheme("professional_dark", "#000000", "#1a1a1a", "#0077B5", "#FFFFFF", "#000000"),
    scheme("professional_blue", "#0A66C2", "#004182", "#70B5F9", "#FFFFFF", "#0A66C2"),
    // Bold
    scheme("bold_red", "#FF0000", "#CC0000", "#FF6B6B", "#FFFFFF", "#000000"),
    scheme("bold_purple", "#8B00FF", "#6200CC", "#B47AEA", "#FFFFFF", "#1a0033"),
    scheme("bold_orange", "#FF6B00", "#CC5500", "#FFA500", "#FFFFFF", "#1a0f00"),
    // Minimal
    scheme("minimal_light", "#FFFFFF", "#F5F5F5", "#333333", "#000000", "#FFFFFF"),
    scheme("minimal_gray", "#2C3E50", "#34495E", "#95A5A6", "#ECF0F1", "#2C3E50"),
    // Gradient
    scheme("gradient_sunset", "#FF416C", "#FF4B2B", "#FFD700", "#FFFFFF", "#1a0000"),
    scheme("gradient_ocean", "#667EEA", "#764BA2", "#A8DADC", "#FFFFFF", "#1a1a2e"),
    scheme("gradient_forest", "#11998E", "#38EF7D", "#CCFF00", "#FFFFFF", "#0d2818"),
    // Corporate
    scheme("corporate_tech", "#1E3A8A", "#3B82F6", "#60A5FA", "#FFFFFF", "#0F172A"),
    scheme("corporate_finance", "#064E3B", "#10B981", "#34D399", "#FFFFFF", "#022C22"),
];

/// All built-in schemes, in registration order.
pub fn all_schemes() -> &'static [ColorScheme] {
    &SCHEMES
}

/// Names of the built-in schemes, in registration order.
pub fn list_schemes() -> Vec<&'static str> {
    SCHEMES.iter().map(|s| s.name).collect()
}

/// Look up a scheme by name.
pub fn get_scheme(name: &str) -> Result<&'static ColorScheme> {
    SCHEMES
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| PostError::SchemeNotFound {
            name: name.to_string(),
            help: Some(format!("Available: {}", list_schemes().join(", "))),
        })
}
