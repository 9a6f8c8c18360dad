//! Translucent pattern overlays: parallel lines and scattered shapes.
//!
//! Each overlay is rasterized into a transparent [`Pixmap`] with
//! `BlendMode::Source`, so overlapping strokes and shapes replace each other
//! instead of accumulating alpha. The finished overlay is then composited
//! onto the canvas in one pass.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tiny_skia::{BlendMode, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::Canvas;
use crate::error::{PostError, Result};
use crate::types::Colour;

/// Parameters for [`add_pattern_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePattern {
    pub colour: Colour,
    pub spacing: u32,
    /// Degrees, clockwise from the positive x axis (y points down).
    pub angle: i32,
    pub width: u32,
    pub opacity: u8,
}

impl Default for LinePattern {
    fn default() -> Self {
        Self {
            colour: Colour::WHITE,
            spacing: 50,
            angle: 45,
            width: 2,
            opacity: 30,
        }
    }
}

/// Shape family for [`add_geometric_shapes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Circles,
    Rectangles,
    Triangles,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Circles => "circles",
            ShapeKind::Rectangles => "rectangles",
            ShapeKind::Triangles => "triangles",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circles" | "circle" => Ok(ShapeKind::Circles),
            "rectangles" | "rectangle" => Ok(ShapeKind::Rectangles),
            "triangles" | "triangle" => Ok(ShapeKind::Triangles),
            other => Err(PostError::InvalidArgument {
                message: format!("unknown shape '{}'", other),
                help: Some("Use circles, rectangles or triangles".to_string()),
            }),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for [`add_geometric_shapes`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapePattern {
    pub shape: ShapeKind,
    pub colour: Colour,
    pub opacity: u8,
    pub count: u32,
}

impl Default for ShapePattern {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Circles,
            colour: Colour::WHITE,
            opacity: 20,
            count: 10,
        }
    }
}

/// Smallest and largest shape edge, inclusive.
pub const SHAPE_SIZE: (i32, i32) = (50, 200);

fn overlay_for(canvas: &Canvas) -> Result<Pixmap> {
    Pixmap::new(canvas.width(), canvas.height()).ok_or_else(|| {
        PostError::invalid(format!(
            "cannot allocate a {}x{} overlay",
            canvas.width(),
            canvas.height()
        ))
    })
}

fn replace_paint(colour: Colour, opacity: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(colour.r, colour.g, colour.b, opacity);
    paint.blend_mode = BlendMode::Source;
    paint.anti_alias = false;
    paint
}

fn segment(x0: f32, y0: f32, x1: f32, y1: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x0, y0);
    pb.line_to(x1, y1);
    pb.finish()
}

/// Line segments for a pattern, in canvas coordinates.
fn line_segments(width: u32, height: u32, spacing: u32, angle: i32) -> Vec<(f32, f32, f32, f32)> {
    let (w, h, step) = (width as i64, height as i64, spacing as i64);
    let mut segments = Vec::new();

    match angle.rem_euclid(360) {
        45 => {
            let mut i = -h;
            while i < w + h {
                segments.push((i as f32, 0.0, (i + h) as f32, h as f32));
                i += step;
            }
        }
        135 => {
            let mut i = 0;
            while i < w + h {
                segments.push((i as f32, 0.0, (i - h) as f32, h as f32));
                i += step;
            }
        }
        90 => {
            let mut i = 0;
            while i < w {
                segments.push((i as f32, 0.0, i as f32, h as f32));
                i += step;
            }
        }
        0 => {
            let mut i = 0;
            while i < h {
                segments.push((0.0, i as f32, w as f32, i as f32));
                i += step;
            }
        }
        other => {
            // Parallel lines along (cos, sin), stepped along the normal.
            let theta = (other as f64).to_radians();
            let (dx, dy) = (theta.cos(), theta.sin());
            let (nx, ny) = (-dy, dx);
            let corners = [(0.0, 0.0), (w as f64, 0.0), (0.0, h as f64), (w as f64, h as f64)];
            let offsets = corners.map(|(x, y)| x * nx + y * ny);
            let lo = offsets.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = offsets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let reach = (w as f64).hypot(h as f64);

            let first = (lo / step as f64).floor() as i64;
            let last = (hi / step as f64).ceil() as i64;
            for k in first..=last {
                let o = (k * step) as f64;
                let (px, py) = (o * nx, o * ny);
                segments.push((
                    (px - dx * reach) as f32,
                    (py - dy * reach) as f32,
                    (px + dx * reach) as f32,
                    (py + dy * reach) as f32,
                ));
            }
        }
    }

    segments
}

/// Draw translucent parallel lines over the canvas.
pub fn add_pattern_lines(canvas: &mut Canvas, pattern: &LinePattern) -> Result<()> {
    if pattern.spacing == 0 {
        return Err(PostError::InvalidArgument {
            message: "line spacing must be positive".to_string(),
            help: Some("Pass a spacing of at least 1 pixel".to_string()),
        });
    }

    let mut overlay = overlay_for(canvas)?;
    let paint = replace_paint(pattern.colour, pattern.opacity);
    let stroke = Stroke {
        width: pattern.width.max(1) as f32,
        ..Stroke::default()
    };

    let segments = line_segments(canvas.width(), canvas.height(), pattern.spacing, pattern.angle);
    tracing::debug!(lines = segments.len(), angle = pattern.angle, "drawing line pattern");
    for (x0, y0, x1, y1) in segments {
        if let Some(path) = segment(x0, y0, x1, y1) {
            overlay.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    canvas.composite(&overlay);
    Ok(())
}

fn shape_path(shape: ShapeKind, x: i32, y: i32, size: i32) -> Option<Path> {
    let (x, y, s) = (x as f32, y as f32, size as f32);
    match shape {
        // Boxes are inclusive of their far edge.
        ShapeKind::Circles => Rect::from_ltrb(x, y, x + s + 1.0, y + s + 1.0).and_then(PathBuilder::from_oval),
        ShapeKind::Rectangles => Rect::from_ltrb(x, y, x + s + 1.0, y + s + 1.0).map(PathBuilder::from_rect),
        ShapeKind::Triangles => {
            let mut pb = PathBuilder::new();
            pb.move_to(x, y);
            pb.line_to(x + s, y);
            pb.line_to(x + (size / 2) as f32, y - s);
            pb.close();
            pb.finish()
        }
    }
}

/// Scatter `count` translucent shapes at random positions and sizes.
pub fn add_geometric_shapes(
    canvas: &mut Canvas,
    pattern: &ShapePattern,
    rng: &mut dyn RngCore,
) -> Result<()> {
    if pattern.count == 0 {
        return Ok(());
    }

    let mut overlay = overlay_for(canvas)?;
    let paint = replace_paint(pattern.colour, pattern.opacity);
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);

    for _ in 0..pattern.count {
        let x = rng.random_range(0..=w);
        let y = rng.random_range(0..=h);
        let size = rng.random_range(SHAPE_SIZE.0..=SHAPE_SIZE.1);
        if let Some(path) = shape_path(pattern.shape, x, y, size) {
            overlay.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    canvas.composite(&overlay);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_spacing_rejected() {
        let mut canvas = Canvas::new(10, 10, Colour::BLACK).unwrap();
        let pattern = LinePattern {
            spacing: 0,
            ..LinePattern::default()
        };
        assert!(matches!(
            add_pattern_lines(&mut canvas, &pattern),
            Err(PostError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_classic_angle_segment_counts() {
        // 45: i in -100..300 step 50
        assert_eq!(line_segments(200, 100, 50, 45).len(), 8);
        // 135: i in 0..300 step 50
        assert_eq!(line_segments(200, 100, 50, 135).len(), 6);
        assert_eq!(line_segments(200, 100, 50, 90).len(), 4);
        assert_eq!(line_segments(200, 100, 50, 0).len(), 2);
    }

    #[test]
    fn test_horizontal_lines_land_on_rows() {
        let mut canvas = Canvas::new(100, 100, Colour::BLACK).unwrap();
        let pattern = LinePattern {
            angle: 0,
            opacity: 255,
            ..LinePattern::default()
        };
        add_pattern_lines(&mut canvas, &pattern).unwrap();
        assert_eq!(canvas.pixel(50, 50), [255, 255, 255]);
        assert_eq!(canvas.pixel(50, 25), [0, 0, 0]);
    }

    #[test]
    fn test_generalized_angle_covers_canvas() {
        let segments = line_segments(300, 200, 20, 30);
        assert!(segments.len() > 10);
        let mut canvas = Canvas::new(300, 200, Colour::BLACK).unwrap();
        let pattern = LinePattern {
            angle: 30,
            spacing: 20,
            opacity: 255,
            ..LinePattern::default()
        };
        add_pattern_lines(&mut canvas, &pattern).unwrap();
        let lit = canvas.image().pixels().filter(|p| p.0 != [0, 0, 0]).count();
        assert!(lit > 300 * 200 / 20);
    }

    #[test]
    fn test_zero_shapes_is_noop() {
        let mut canvas = Canvas::new(50, 50, Colour::rgb(10, 20, 30)).unwrap();
        let before = canvas.clone();
        let pattern = ShapePattern {
            count: 0,
            ..ShapePattern::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        add_geometric_shapes(&mut canvas, &pattern, &mut rng).unwrap();
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_shapes_are_deterministic_with_seed() {
        let pattern = ShapePattern {
            shape: ShapeKind::Rectangles,
            opacity: 128,
            count: 5,
            ..ShapePattern::default()
        };
        let render = |seed| {
            let mut canvas = Canvas::new(300, 300, Colour::BLACK).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            add_geometric_shapes(&mut canvas, &pattern, &mut rng).unwrap();
            canvas
        };
        assert_eq!(render(7), render(7));
    }

    #[test]
    fn test_overlapping_shapes_do_not_accumulate() {
        let mut canvas = Canvas::new(400, 400, Colour::BLACK).unwrap();
        let pattern = ShapePattern {
            shape: ShapeKind::Rectangles,
            opacity: 128,
            count: 40,
            ..ShapePattern::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        add_geometric_shapes(&mut canvas, &pattern, &mut rng).unwrap();
        let max = canvas.image().pixels().map(|p| p.0[0]).max().unwrap();
        assert_eq!(max, 128);
    }

    #[test]
    fn test_shape_parse() {
        assert_eq!("triangle".parse::<ShapeKind>().unwrap(), ShapeKind::Triangles);
        assert!("hexagons".parse::<ShapeKind>().is_err());
    }
}
