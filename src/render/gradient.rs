//! Two-colour gradient fills.

use std::fmt;
use std::str::FromStr;

use image::Rgb;
use serde::{Deserialize, Serialize};

use super::Canvas;
use crate::error::PostError;
use crate::types::Colour;

/// Gradient direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
    /// Top-left to bottom-right.
    Diagonal,
    /// Centre outwards.
    Radial,
}

impl GradientDirection {
    pub const ALL: [GradientDirection; 4] = [
        GradientDirection::Vertical,
        GradientDirection::Horizontal,
        GradientDirection::Diagonal,
        GradientDirection::Radial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GradientDirection::Vertical => "vertical",
            GradientDirection::Horizontal => "horizontal",
            GradientDirection::Diagonal => "diagonal",
            GradientDirection::Radial => "radial",
        }
    }
}

impl FromStr for GradientDirection {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradientDirection::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| PostError::InvalidArgument {
                message: format!("unknown gradient direction '{}'", s),
                help: Some("Use vertical, horizontal, diagonal or radial".to_string()),
            })
    }
}

impl fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpolate each channel and truncate towards zero.
pub fn lerp(start: Colour, end: Colour, ratio: f64) -> [u8; 3] {
    let channel = |s: u8, e: u8| (s as f64 + (e as f64 - s as f64) * ratio) as u8;
    [
        channel(start.r, end.r),
        channel(start.g, end.g),
        channel(start.b, end.b),
    ]
}

/// Distance-from-centre ratio shared by the radial gradient and the
/// vignette. The centre is integer-divided, so odd sizes lean top-left.
pub(crate) struct Radial {
    cx: f64,
    cy: f64,
    max: f64,
}

impl Radial {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let cx = (width / 2) as f64;
        let cy = (height / 2) as f64;
        Self {
            cx,
            cy,
            max: cx.hypot(cy),
        }
    }

    pub(crate) fn ratio(&self, x: u32, y: u32) -> f64 {
        if self.max == 0.0 {
            return 0.0;
        }
        let d = (x as f64 - self.cx).hypot(y as f64 - self.cy);
        (d / self.max).min(1.0)
    }
}

/// Replace the canvas content with a gradient from `start` to `end`.
pub fn apply_gradient(canvas: &mut Canvas, start: Colour, end: Colour, direction: GradientDirection) {
    let (width, height) = (canvas.width(), canvas.height());
    let image = canvas.image_mut();

    match direction {
        GradientDirection::Vertical => {
            for y in 0..height {
                let colour = Rgb(lerp(start, end, y as f64 / height as f64));
                for x in 0..width {
                    image.put_pixel(x, y, colour);
                }
            }
        }
        GradientDirection::Horizontal => {
            let columns: Vec<Rgb<u8>> = (0..width)
                .map(|x| Rgb(lerp(start, end, x as f64 / width as f64)))
                .collect();
            for (x, _, px) in image.enumerate_pixels_mut() {
                *px = columns[x as usize];
            }
        }
        GradientDirection::Diagonal => {
            let span = (width + height) as f64;
            for (x, y, px) in image.enumerate_pixels_mut() {
                *px = Rgb(lerp(start, end, (x + y) as f64 / span));
            }
        }
        GradientDirection::Radial => {
            let radial = Radial::new(width, height);
            for (x, y, px) in image.enumerate_pixels_mut() {
                *px = Rgb(lerp(start, end, radial.ratio(x, y)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Colour = Colour::rgb(255, 0, 0);

    #[test]
    fn test_vertical_endpoints() {
        let mut canvas = Canvas::new(1080, 1080, Colour::WHITE).unwrap();
        apply_gradient(&mut canvas, RED, Colour::BLACK, GradientDirection::Vertical);
        assert_eq!(canvas.pixel(0, 0), [255, 0, 0]);
        // 255 * (1 - 1079/1080) = 0.236, truncated.
        assert_eq!(canvas.pixel(0, 1079), [0, 0, 0]);
        assert_eq!(canvas.pixel(500, 540), [127, 0, 0]);
    }

    #[test]
    fn test_horizontal_is_column_constant() {
        let mut canvas = Canvas::new(10, 4, Colour::WHITE).unwrap();
        apply_gradient(&mut canvas, Colour::BLACK, Colour::WHITE, GradientDirection::Horizontal);
        assert_eq!(canvas.pixel(5, 0), canvas.pixel(5, 3));
        assert_eq!(canvas.pixel(5, 0), [127, 127, 127]);
        assert_eq!(canvas.pixel(0, 2), [0, 0, 0]);
    }

    #[test]
    fn test_diagonal_ratio() {
        let mut canvas = Canvas::new(10, 10, Colour::WHITE).unwrap();
        apply_gradient(&mut canvas, Colour::BLACK, Colour::WHITE, GradientDirection::Diagonal);
        // (5 + 5) / 20 = 0.5
        assert_eq!(canvas.pixel(5, 5), [127, 127, 127]);
        assert_eq!(canvas.pixel(9, 0), canvas.pixel(0, 9));
    }

    #[test]
    fn test_radial_centre_and_corner() {
        let mut canvas = Canvas::new(100, 100, Colour::WHITE).unwrap();
        apply_gradient(&mut canvas, Colour::WHITE, Colour::BLACK, GradientDirection::Radial);
        assert_eq!(canvas.pixel(50, 50), [255, 255, 255]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_radial_single_pixel() {
        let mut canvas = Canvas::new(1, 1, Colour::BLACK).unwrap();
        apply_gradient(&mut canvas, RED, Colour::WHITE, GradientDirection::Radial);
        assert_eq!(canvas.pixel(0, 0), [255, 0, 0]);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("Radial".parse::<GradientDirection>().unwrap(), GradientDirection::Radial);
        assert!(matches!(
            "spiral".parse::<GradientDirection>(),
            Err(PostError::InvalidArgument { .. })
        ));
    }
}
