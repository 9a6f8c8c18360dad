//! The RGB pixel buffer every layer is drawn onto.

use image::{Rgb, RgbImage, RgbaImage};
use tiny_skia::Pixmap;

use crate::error::{PostError, Result};
use crate::types::Colour;
use crate::typography::TextMask;

/// Largest accepted canvas, in pixels (64 megapixels).
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// An opaque RGB canvas. All drawing is clipped to its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    ///
    /// Sizes with a zero side or more than [`MAX_CANVAS_PIXELS`] pixels are
    /// rejected before anything is allocated.
    pub fn new(width: u32, height: u32, background: Colour) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PostError::InvalidArgument {
                message: format!("canvas size {}x{} has a zero dimension", width, height),
                help: Some("Width and height must both be at least 1".to_string()),
            });
        }
        if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
            return Err(PostError::InvalidArgument {
                message: format!("canvas size {}x{} is too large", width, height),
                help: Some(format!("At most {} pixels are allowed", MAX_CANVAS_PIXELS)),
            });
        }
        Ok(Self {
            image: RgbImage::from_pixel(width, height, Rgb(background.to_array())),
        })
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like `RgbImage`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    /// Blend `colour` over the pixel at `(x, y)` with the given alpha.
    /// Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, colour: [u8; 3], alpha: u8) {
        if alpha == 0 || !self.contains(x, y) {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        if alpha == 255 {
            px.0 = colour;
            return;
        }
        let a = alpha as u32;
        for (dst, src) in px.0.iter_mut().zip(colour) {
            *dst = ((src as u32 * a + *dst as u32 * (255 - a) + 127) / 255) as u8;
        }
    }

    /// Blend an RGBA fill over the inclusive rectangle `(x1, y1)-(x2, y2)`.
    pub fn fill_rect_blend(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, rgba: [u8; 4]) {
        let (x1, x2) = (x1.min(x2).max(0), x1.max(x2).min(self.width() as i32 - 1));
        let (y1, y2) = (y1.min(y2).max(0), y1.max(y2).min(self.height() as i32 - 1));
        let colour = [rgba[0], rgba[1], rgba[2]];
        for y in y1..=y2 {
            for x in x1..=x2 {
                self.blend_pixel(x, y, colour, rgba[3]);
            }
        }
    }

    /// Composite a same-sized premultiplied overlay onto the canvas.
    pub fn composite(&mut self, overlay: &Pixmap) {
        if overlay.width() != self.width() || overlay.height() != self.height() {
            tracing::warn!(
                overlay = ?(overlay.width(), overlay.height()),
                canvas = ?(self.width(), self.height()),
                "overlay size does not match canvas, skipping"
            );
            return;
        }

        for (dst, src) in self.image.pixels_mut().zip(overlay.pixels()) {
            let a = src.alpha() as u32;
            if a == 0 {
                continue;
            }
            let inv = 255 - a;
            let premul = [src.red(), src.green(), src.blue()];
            for (d, s) in dst.0.iter_mut().zip(premul) {
                *d = (s as u32 + (*d as u32 * inv + 127) / 255).min(255) as u8;
            }
        }
    }

    /// Paste a straight-alpha RGBA image with its top-left at `(x, y)`,
    /// using its own alpha as the mask. Parts outside the canvas are clipped.
    pub fn paste_rgba(&mut self, image: &RgbaImage, x: i32, y: i32) {
        for (ix, iy, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            self.blend_pixel(x + ix as i32, y + iy as i32, [r, g, b], a);
        }
    }

    /// Blend a glyph coverage mask in `colour` with its top-left at `(x, y)`.
    pub fn blit_mask(&mut self, mask: &TextMask, x: i32, y: i32, colour: Colour) {
        let rgb = colour.to_array();
        for my in 0..mask.height {
            for mx in 0..mask.width {
                let coverage = mask.at(mx, my);
                self.blend_pixel(x + mx as i32, y + my as i32, rgb, coverage);
            }
        }
    }
}
