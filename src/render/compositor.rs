//! The layered drawing pipeline.
//!
//! A [`Compositor`] owns at most one [`Canvas`] and applies drawing
//! operations to it in call order. Every operation returns `&mut Self` so
//! calls chain with `?`:
//!
//! ```ignore
//! let mut post = Compositor::new(typography).with_seed(7);
//! post.create_canvas(&Dimension::default(), Colour::BLACK)?
//!     .apply_gradient(start, end, GradientDirection::Vertical)?
//!     .add_vignette(0.6)?;
//! post.save(Path::new("post.png"), &SaveOptions::default())?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use super::effects::{self, Region};
use super::encode::{self, SaveOptions};
use super::gradient::{self, GradientDirection};
use super::logo::{self, LogoPlacement};
use super::overlay::{self, LinePattern, ShapePattern};
use super::Canvas;
use crate::error::{PostError, Result};
use crate::types::{Colour, Dimension};
use crate::typography::{
    draw_multiline_text, draw_text, draw_text_with_outline, draw_text_with_shadow, Align,
    TextEffect, Typography, BOLD_FONT, REGULAR_FONT,
};

/// A run of text to draw with [`Compositor::add_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSpec {
    pub text: String,
    pub position: (i32, i32),
    pub font: String,
    pub size: u32,
    pub colour: Colour,
    /// Wrap to this width. Without it the text is a single line.
    pub max_width: Option<i32>,
    pub align: Align,
    pub shadow: bool,
    pub outline: bool,
    pub line_spacing: i32,
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: (0, 0),
            font: BOLD_FONT.to_string(),
            size: 70,
            colour: Colour::WHITE,
            max_width: None,
            align: Align::Left,
            shadow: false,
            outline: false,
            line_spacing: 10,
        }
    }
}

impl TextSpec {
    pub fn new(text: impl Into<String>, position: (i32, i32)) -> Self {
        Self {
            text: text.into(),
            position,
            ..Self::default()
        }
    }

    /// Shadow wins over outline when both are set.
    pub fn effect(&self) -> TextEffect {
        if self.shadow {
            TextEffect::shadow()
        } else if self.outline {
            TextEffect::outline()
        } else {
            TextEffect::Plain
        }
    }
}

/// Text drawn over a translucent box with [`Compositor::add_text_box`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxSpec {
    pub text: String,
    pub position: (i32, i32),
    pub size: (i32, i32),
    /// Box fill as RGBA.
    pub background: [u8; 4],
    pub text_colour: Colour,
    pub font: String,
    pub font_size: u32,
    pub padding: i32,
}

impl Default for TextBoxSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: (40, 700),
            size: (1000, 200),
            background: [0, 0, 0, 180],
            text_colour: Colour::WHITE,
            font: REGULAR_FONT.to_string(),
            font_size: 40,
            padding: 20,
        }
    }
}

/// Builds one image by applying drawing operations in order.
pub struct Compositor {
    canvas: Option<Canvas>,
    typography: Arc<Typography>,
    rng: Box<dyn RngCore + Send>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("size", &self.canvas.as_ref().map(|c| (c.width(), c.height())))
            .field("typography", &self.typography)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// A compositor with an OS-seeded random generator.
    pub fn new(typography: Arc<Typography>) -> Self {
        Self {
            canvas: None,
            typography,
            rng: Box::new(StdRng::from_os_rng()),
        }
    }

    /// Use a deterministic generator for shapes and noise.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn typography(&self) -> &Arc<Typography> {
        &self.typography
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn into_canvas(self) -> Option<Canvas> {
        self.canvas
    }

    fn canvas_mut(&mut self) -> Result<&mut Canvas> {
        self.canvas.as_mut().ok_or(PostError::CanvasNotInitialized)
    }

    /// Start a new image, discarding any previous one.
    pub fn create_canvas(&mut self, dimension: &Dimension, background: Colour) -> Result<&mut Self> {
        let (width, height) = dimension.size();
        self.canvas = Some(Canvas::new(width, height, background)?);
        tracing::debug!(%dimension, width, height, %background, "created canvas");
        Ok(self)
    }

    pub fn apply_gradient(
        &mut self,
        start: Colour,
        end: Colour,
        direction: GradientDirection,
    ) -> Result<&mut Self> {
        gradient::apply_gradient(self.canvas_mut()?, start, end, direction);
        Ok(self)
    }

    pub fn add_pattern_lines(&mut self, pattern: &LinePattern) -> Result<&mut Self> {
        overlay::add_pattern_lines(self.canvas_mut()?, pattern)?;
        Ok(self)
    }

    pub fn add_geometric_shapes(&mut self, pattern: &ShapePattern) -> Result<&mut Self> {
        let canvas = self.canvas.as_mut().ok_or(PostError::CanvasNotInitialized)?;
        overlay::add_geometric_shapes(canvas, pattern, self.rng.as_mut())?;
        Ok(self)
    }

    pub fn add_vignette(&mut self, intensity: f64) -> Result<&mut Self> {
        effects::add_vignette(self.canvas_mut()?, intensity);
        Ok(self)
    }

    pub fn add_noise(&mut self, intensity: u8) -> Result<&mut Self> {
        let canvas = self.canvas.as_mut().ok_or(PostError::CanvasNotInitialized)?;
        effects::add_noise(canvas, intensity, self.rng.as_mut());
        Ok(self)
    }

    pub fn add_blur(&mut self, radius: u32, region: Option<Region>) -> Result<&mut Self> {
        effects::add_blur(self.canvas_mut()?, radius, region)?;
        Ok(self)
    }

    /// Paste a logo. A missing or unreadable file is logged and skipped.
    pub fn add_logo(&mut self, path: &Path, placement: &LogoPlacement) -> Result<&mut Self> {
        logo::add_logo(self.canvas_mut()?, path, placement);
        Ok(self)
    }

    pub fn add_text(&mut self, spec: &TextSpec) -> Result<&mut Self> {
        let font = self.typography.get_font(&spec.font, spec.size);
        let canvas = self.canvas.as_mut().ok_or(PostError::CanvasNotInitialized)?;

        match spec.max_width {
            Some(max_width) => {
                draw_multiline_text(
                    canvas,
                    spec.position,
                    &spec.text,
                    &font,
                    spec.colour,
                    max_width,
                    spec.line_spacing,
                    spec.align,
                    spec.effect(),
                );
            }
            None if spec.shadow => draw_text_with_shadow(
                canvas,
                spec.position,
                &spec.text,
                &font,
                spec.colour,
                Colour::BLACK,
                (3, 3),
            ),
            None if spec.outline => draw_text_with_outline(
                canvas,
                spec.position,
                &spec.text,
                &font,
                spec.colour,
                Colour::BLACK,
                2,
            ),
            None => draw_text(canvas, spec.position, &spec.text, &font, spec.colour),
        }
        Ok(self)
    }

    pub fn add_text_box(&mut self, spec: &TextBoxSpec) -> Result<&mut Self> {
        let font = self.typography.get_font(&spec.font, spec.font_size);
        let canvas = self.canvas.as_mut().ok_or(PostError::CanvasNotInitialized)?;

        let (x, y) = spec.position;
        let (w, h) = spec.size;
        canvas.fill_rect_blend(x, y, x + w, y + h, spec.background);

        draw_multiline_text(
            canvas,
            (x + spec.padding, y + spec.padding),
            &spec.text,
            &font,
            spec.text_colour,
            w - 2 * spec.padding,
            10,
            Align::Left,
            TextEffect::Plain,
        );
        Ok(self)
    }

    /// Encode the canvas to `path`; the format follows the extension.
    pub fn save(&self, path: &Path, options: &SaveOptions) -> Result<PathBuf> {
        let canvas = self.canvas.as_ref().ok_or(PostError::NoCanvasToSave)?;
        encode::save(canvas.image(), path, options)
    }

    /// Encode the canvas as PNG in memory.
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        let canvas = self.canvas.as_ref().ok_or(PostError::NoCanvasToSave)?;
        encode::png_bytes(canvas.image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ShapeKind;
    use tempfile::tempdir;

    fn compositor() -> Compositor {
        Compositor::new(Arc::new(Typography::builtin_only())).with_seed(11)
    }

    #[test]
    fn test_operations_require_canvas() {
        let mut post = compositor();
        assert!(matches!(
            post.add_vignette(0.5),
            Err(PostError::CanvasNotInitialized)
        ));
        assert!(matches!(
            post.add_text(&TextSpec::new("hi", (0, 0))),
            Err(PostError::CanvasNotInitialized)
        ));
        assert!(matches!(
            post.save(Path::new("never.png"), &SaveOptions::default()),
            Err(PostError::NoCanvasToSave)
        ));
    }

    #[test]
    fn test_create_canvas_presets() {
        let mut post = compositor();
        post.create_canvas(&"story".parse().unwrap(), Colour::WHITE)
            .unwrap();
        let canvas = post.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (1080, 1920));
        assert_eq!(canvas.pixel(0, 0), [255, 255, 255]);
    }

    #[test]
    fn test_zero_custom_size_rejected() {
        let mut post = compositor();
        assert!(matches!(
            post.create_canvas(&Dimension::custom(0, 100), Colour::BLACK),
            Err(PostError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_huge_custom_size_rejected() {
        let mut post = compositor();
        let dimension: Dimension = "4294967295x4294967295".parse().unwrap();
        assert!(matches!(
            post.create_canvas(&dimension, Colour::BLACK),
            Err(PostError::InvalidArgument { .. })
        ));
        assert!(post.canvas().is_none());
    }

    #[test]
    fn test_gradient_is_last_writer_wins() {
        let mut post = compositor();
        post.create_canvas(&Dimension::custom(20, 20), Colour::BLACK)
            .unwrap()
            .add_vignette(1.0)
            .unwrap()
            .apply_gradient(Colour::WHITE, Colour::WHITE, GradientDirection::Radial)
            .unwrap();
        assert!(post
            .canvas()
            .unwrap()
            .image()
            .pixels()
            .all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_same_seed_same_pixels() {
        let render = || {
            let mut post = compositor();
            post.create_canvas(&Dimension::custom(120, 120), Colour::BLACK)
                .unwrap()
                .add_geometric_shapes(&ShapePattern {
                    shape: ShapeKind::Triangles,
                    count: 6,
                    ..ShapePattern::default()
                })
                .unwrap()
                .add_noise(10)
                .unwrap();
            post.into_canvas().unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_text_box_draws_box_and_text() {
        let mut post = compositor();
        post.create_canvas(&Dimension::custom(200, 100), Colour::WHITE)
            .unwrap()
            .add_text_box(&TextBoxSpec {
                text: "__".to_string(),
                position: (10, 10),
                size: (100, 50),
                background: [0, 0, 0, 255],
                text_colour: Colour::rgb(255, 0, 0),
                ..TextBoxSpec::default()
            })
            .unwrap();
        let canvas = post.canvas().unwrap();
        // Box corners are inclusive.
        assert_eq!(canvas.pixel(110, 60), [0, 0, 0]);
        assert_eq!(canvas.pixel(111, 61), [255, 255, 255]);
        // '_' at padding offset (30, 30) fills the cell's bottom row.
        assert_eq!(canvas.pixel(30, 37), [255, 0, 0]);
    }

    #[test]
    fn test_save_and_png_bytes() {
        let dir = tempdir().unwrap();
        let mut post = compositor();
        post.create_canvas(&Dimension::custom(8, 8), Colour::BLACK)
            .unwrap()
            .add_text(&TextSpec {
                max_width: Some(8),
                shadow: true,
                ..TextSpec::new("a", (0, 0))
            })
            .unwrap();

        let path = post
            .save(&dir.path().join("out.png"), &SaveOptions::default())
            .unwrap();
        assert!(path.exists());
        assert!(!post.png_bytes().unwrap().is_empty());
    }
}
