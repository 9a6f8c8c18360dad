//! Font handles and text rasterization.
//!
//! Text is rasterized into a [`TextMask`] (a coverage bitmap positioned
//! relative to the draw origin). Measuring and drawing both go through the
//! mask, so the width used for wrapping is exactly the ink that lands on the
//! canvas.

use std::path::PathBuf;
use std::sync::Arc;

use super::builtin;

/// A resolved font at a fixed pixel size.
#[derive(Clone)]
pub enum FontHandle {
    /// A TrueType/OpenType face rendered at `size` pixels.
    Outline {
        font: Arc<fontdue::Font>,
        size: f32,
        source: PathBuf,
    },
    /// The built-in 8x8 bitmap font. Ignores the requested size.
    Builtin,
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontHandle::Outline { size, source, .. } => f
                .debug_struct("Outline")
                .field("size", size)
                .field("source", source)
                .finish(),
            FontHandle::Builtin => f.write_str("Builtin"),
        }
    }
}

/// Coverage bitmap for a run of text.
///
/// `left`/`top` are offsets from the draw origin, where the origin is the
/// left edge of the pen and the top of the ascender line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMask {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl TextMask {
    /// Bounding box `(left, top, right, bottom)` relative to the origin.
    pub fn bbox(&self) -> (i32, i32, i32, i32) {
        (
            self.left,
            self.top,
            self.left + self.width as i32,
            self.top + self.height as i32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.width + x) as usize]
    }
}

struct Placed {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl FontHandle {
    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin)
    }

    /// Nominal size in pixels.
    pub fn size(&self) -> f32 {
        match self {
            FontHandle::Outline { size, .. } => *size,
            FontHandle::Builtin => builtin::CELL as f32,
        }
    }

    /// Ink width and height of a single line.
    pub fn dimensions(&self, text: &str) -> (i32, i32) {
        let mask = self.mask(text);
        (mask.width as i32, mask.height as i32)
    }

    /// Rasterize a single line of text.
    pub fn mask(&self, text: &str) -> TextMask {
        let placed = match self {
            FontHandle::Outline { font, size, .. } => place_outline(font, *size, text),
            FontHandle::Builtin => place_builtin(text),
        };
        merge(placed)
    }
}

fn place_outline(font: &fontdue::Font, size: f32, text: &str) -> Vec<Placed> {
    let ascent = font
        .horizontal_line_metrics(size)
        .map(|m| m.ascent)
        .unwrap_or(size * 0.8);

    let mut placed = Vec::new();
    let mut pen = 0.0f32;
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        if let Some(p) = prev {
            pen += font.horizontal_kern(p, ch, size).unwrap_or(0.0);
        }
        let (metrics, coverage) = font.rasterize(ch, size);
        if metrics.width > 0 && metrics.height > 0 {
            let x = (pen + metrics.xmin as f32).round() as i32;
            let y = (ascent - (metrics.ymin as f32 + metrics.height as f32)).round() as i32;
            placed.push(Placed {
                x,
                y,
                width: metrics.width as u32,
                height: metrics.height as u32,
                coverage,
            });
        }
        pen += metrics.advance_width;
        prev = Some(ch);
    }

    placed
}

// Builtin glyphs occupy their full cell, so spaces count towards width.
fn place_builtin(text: &str) -> Vec<Placed> {
    let cell = builtin::CELL;
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            let rows = builtin::glyph(ch);
            let coverage = (0..cell * cell)
                .map(|p| {
                    if builtin::is_set(rows, p % cell, p / cell) {
                        255
                    } else {
                        0
                    }
                })
                .collect();
            Placed {
                x: (i as u32 * cell) as i32,
                y: 0,
                width: cell,
                height: cell,
                coverage,
            }
        })
        .collect()
}

fn merge(placed: Vec<Placed>) -> TextMask {
    if placed.is_empty() {
        return TextMask::default();
    }

    let left = placed.iter().map(|p| p.x).min().unwrap_or(0);
    let top = placed.iter().map(|p| p.y).min().unwrap_or(0);
    let right = placed.iter().map(|p| p.x + p.width as i32).max().unwrap_or(0);
    let bottom = placed.iter().map(|p| p.y + p.height as i32).max().unwrap_or(0);

    let width = (right - left) as u32;
    let height = (bottom - top) as u32;
    let mut coverage = vec![0u8; (width * height) as usize];

    for glyph in &placed {
        let ox = (glyph.x - left) as u32;
        let oy = (glyph.y - top) as u32;
        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let src = glyph.coverage[(gy * glyph.width + gx) as usize];
                let idx = ((oy + gy) * width + ox + gx) as usize;
                coverage[idx] = coverage[idx].max(src);
            }
        }
    }

    TextMask {
        left,
        top,
        width,
        height,
        coverage,
    }
}
