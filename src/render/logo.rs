//! Logo placement.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::imageops::FilterType;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::Canvas;
use crate::error::PostError;

/// Named anchor for a logo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoAnchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Center,
}

impl LogoAnchor {
    pub const ALL: [LogoAnchor; 7] = [
        LogoAnchor::TopLeft,
        LogoAnchor::TopCenter,
        LogoAnchor::TopRight,
        LogoAnchor::BottomLeft,
        LogoAnchor::BottomCenter,
        LogoAnchor::BottomRight,
        LogoAnchor::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogoAnchor::TopLeft => "top-left",
            LogoAnchor::TopCenter => "top-center",
            LogoAnchor::TopRight => "top-right",
            LogoAnchor::BottomLeft => "bottom-left",
            LogoAnchor::BottomCenter => "bottom-center",
            LogoAnchor::BottomRight => "bottom-right",
            LogoAnchor::Center => "center",
        }
    }

    /// Top-left corner for a logo of `logo` size on a `canvas`-sized image.
    pub fn origin(self, canvas: (u32, u32), logo: (u32, u32), margin: i32) -> (i32, i32) {
        let (cw, ch) = (canvas.0 as i32, canvas.1 as i32);
        let (lw, lh) = (logo.0 as i32, logo.1 as i32);
        let center_x = (cw - lw).div_euclid(2);
        let center_y = (ch - lh).div_euclid(2);
        let right = cw - lw - margin;
        let bottom = ch - lh - margin;

        match self {
            LogoAnchor::TopLeft => (margin, margin),
            LogoAnchor::TopCenter => (center_x, margin),
            LogoAnchor::TopRight => (right, margin),
            LogoAnchor::BottomLeft => (margin, bottom),
            LogoAnchor::BottomCenter => (center_x, bottom),
            LogoAnchor::BottomRight => (right, bottom),
            LogoAnchor::Center => (center_x, center_y),
        }
    }
}

impl FromStr for LogoAnchor {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('_', "-");
        LogoAnchor::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| PostError::InvalidArgument {
                message: format!("unknown logo position '{}'", s),
                help: Some(format!(
                    "Use one of: {}",
                    LogoAnchor::ALL.map(|a| a.as_str()).join(", ")
                )),
            })
    }
}

impl fmt::Display for LogoAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how large to draw a logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoPlacement {
    pub anchor: LogoAnchor,
    /// Bounding box the logo is shrunk to fit, preserving aspect.
    pub max_size: (u32, u32),
    pub margin: i32,
    /// Explicit top-left corner; overrides `anchor`.
    pub position: Option<(i32, i32)>,
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            anchor: LogoAnchor::TopLeft,
            max_size: (200, 200),
            margin: 40,
            position: None,
        }
    }
}

/// Shrink to fit within `max`, keeping aspect ratio. Never enlarges.
pub fn thumbnail(image: RgbaImage, max: (u32, u32)) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= max.0 && h <= max.1 {
        return image;
    }

    let scale = f64::min(max.0 as f64 / w as f64, max.1 as f64 / h as f64);
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max.0.max(1));
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max.1.max(1));
    image::imageops::resize(&image, nw, nh, FilterType::Lanczos3)
}

/// Paste the logo at `path` onto the canvas.
///
/// A missing or undecodable file is logged and leaves the canvas untouched.
pub fn add_logo(canvas: &mut Canvas, path: &Path, placement: &LogoPlacement) {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "logo file not found, skipping");
        return;
    }

    let logo = match image::open(path) {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not load logo, skipping");
            return;
        }
    };

    let logo = thumbnail(logo, placement.max_size);
    let (x, y) = placement.position.unwrap_or_else(|| {
        placement
            .anchor
            .origin((canvas.width(), canvas.height()), logo.dimensions(), placement.margin)
    });

    tracing::debug!(path = %path.display(), x, y, size = ?logo.dimensions(), "placing logo");
    canvas.paste_rgba(&logo, x, y);
}
