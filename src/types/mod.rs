//! Core domain types.
//!
//! - `Colour` - RGB colour values parsed from hex
//! - `ColorScheme` - the static catalogue of brand palettes
//! - `Dimension` - canvas size presets

mod colour;
mod dimension;
mod scheme;

pub use colour::{hex_to_rgb, rgb_to_hex, Colour};
pub use dimension::{preset_names, Dimension, PRESETS};
pub use scheme::{all_schemes, get_scheme, list_schemes, ColorScheme};
