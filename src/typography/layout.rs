//! Line wrapping and text drawing onto a [`Canvas`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::font::FontHandle;
use crate::error::PostError;
use crate::render::Canvas;
use crate::types::Colour;

/// Horizontal alignment of wrapped lines within `max_width`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "center" | "centre" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            other => Err(PostError::InvalidArgument {
                message: format!("unknown alignment '{}'", other),
                help: Some("Use left, center or right".to_string()),
            }),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        };
        f.write_str(s)
    }
}

/// Decoration applied under each drawn line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextEffect {
    #[default]
    Plain,
    Shadow {
        colour: Colour,
        offset: (i32, i32),
    },
    Outline {
        colour: Colour,
        width: i32,
    },
}

impl TextEffect {
    /// Black drop shadow offset by (3, 3).
    pub fn shadow() -> Self {
        TextEffect::Shadow {
            colour: Colour::BLACK,
            offset: (3, 3),
        }
    }

    /// Black outline, 2px wide.
    pub fn outline() -> Self {
        TextEffect::Outline {
            colour: Colour::BLACK,
            width: 2,
        }
    }

    fn draw(
        &self,
        canvas: &mut Canvas,
        origin: (i32, i32),
        text: &str,
        font: &FontHandle,
        colour: Colour,
    ) {
        match *self {
            TextEffect::Plain => draw_text(canvas, origin, text, font, colour),
            TextEffect::Shadow {
                colour: shadow,
                offset,
            } => draw_text_with_shadow(canvas, origin, text, font, colour, shadow, offset),
            TextEffect::Outline {
                colour: outline,
                width,
            } => draw_text_with_outline(canvas, origin, text, font, colour, outline, width),
        }
    }
}

/// Greedy word wrap.
///
/// Hard newlines split the text first. Words are never broken, so a single
/// word wider than `max_width` gets a line of its own.
pub fn wrap_text(text: &str, font: &FontHandle, max_width: i32) -> Vec<String> {
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let mut words = segment.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        for word in words {
            let candidate = format!("{} {}", current, word);
            if font.dimensions(&candidate).0 <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    lines
}

/// Draw a single line with its ascender top at `origin`.
pub fn draw_text(
    canvas: &mut Canvas,
    origin: (i32, i32),
    text: &str,
    font: &FontHandle,
    colour: Colour,
) {
    let mask = font.mask(text);
    if mask.is_empty() {
        return;
    }
    canvas.blit_mask(&mask, origin.0 + mask.left, origin.1 + mask.top, colour);
}

pub fn draw_text_with_shadow(
    canvas: &mut Canvas,
    origin: (i32, i32),
    text: &str,
    font: &FontHandle,
    colour: Colour,
    shadow: Colour,
    offset: (i32, i32),
) {
    let mask = font.mask(text);
    if mask.is_empty() {
        return;
    }
    let (x, y) = (origin.0 + mask.left, origin.1 + mask.top);
    canvas.blit_mask(&mask, x + offset.0, y + offset.1, shadow);
    canvas.blit_mask(&mask, x, y, colour);
}

/// Stamp the text in `outline` at every offset within `width`, then the
/// text itself on top.
pub fn draw_text_with_outline(
    canvas: &mut Canvas,
    origin: (i32, i32),
    text: &str,
    font: &FontHandle,
    colour: Colour,
    outline: Colour,
    width: i32,
) {
    let mask = font.mask(text);
    if mask.is_empty() {
        return;
    }
    let (x, y) = (origin.0 + mask.left, origin.1 + mask.top);
    let width = width.max(0);
    for dx in -width..=width {
        for dy in -width..=width {
            if dx != 0 || dy != 0 {
                canvas.blit_mask(&mask, x + dx, y + dy, outline);
            }
        }
    }
    canvas.blit_mask(&mask, x, y, colour);
}

/// Wrap `text` to `max_width` and draw it line by line.
///
/// Each line advances by its own ink height plus `line_spacing`. Returns the
/// total height drawn, excluding the spacing after the last line.
#[allow(clippy::too_many_arguments)]
pub fn draw_multiline_text(
    canvas: &mut Canvas,
    origin: (i32, i32),
    text: &str,
    font: &FontHandle,
    colour: Colour,
    max_width: i32,
    line_spacing: i32,
    align: Align,
    effect: TextEffect,
) -> i32 {
    let (x, mut y) = origin;
    let lines = wrap_text(text, font, max_width);
    let count = lines.len() as i32;

    for line in &lines {
        let (w, h) = font.dimensions(line);
        let line_x = match align {
            Align::Left => x,
            Align::Center => x + (max_width - w).div_euclid(2),
            Align::Right => x + max_width - w,
        };
        effect.draw(canvas, (line_x, y), line, font, colour);
        y += h + line_spacing;
    }

    if count == 0 {
        0
    } else {
        y - origin.1 - line_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn font() -> FontHandle {
        FontHandle::Builtin
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        assert_eq!(wrap_text("Hello world", &font(), 500), vec!["Hello world"]);
    }

    #[test]
    fn test_wrap_greedy() {
        // 8px per character: "aa bb" is 40px, "aa bb cc" is 64px.
        let lines = wrap_text("aa bb cc dd", &font(), 40);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn test_wrap_never_splits_words() {
        let lines = wrap_text("a supercalifragilistic word", &font(), 16);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "word"]);
    }

    #[test]
    fn test_wrap_hard_newlines_and_empty_segments() {
        let lines = wrap_text("one\n\ntwo", &font(), 500);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let text = "The quick brown fox jumps over the lazy dog again and again";
        let once = wrap_text(text, &font(), 120);
        let twice = wrap_text(&once.join("\n"), &font(), 120);
        assert_eq!(once, twice);
        for line in &once {
            assert!(font().dimensions(line).0 <= 120 || !line.contains(' '));
        }
    }

    #[test]
    fn test_align_parse() {
        assert_eq!("Center".parse::<Align>().unwrap(), Align::Center);
        assert!("middle".parse::<Align>().is_err());
    }

    #[test]
    fn test_draw_text_blends_colour() {
        let mut canvas = Canvas::new(16, 8, Colour::BLACK).unwrap();
        draw_text(&mut canvas, (0, 0), "_", &font(), Colour::WHITE);
        // '_' fills the bottom row of the cell.
        assert_eq!(canvas.pixel(0, 7), [255, 255, 255]);
        assert_eq!(canvas.pixel(0, 0), [0, 0, 0]);
        assert_eq!(canvas.pixel(12, 7), [0, 0, 0]);
    }

    #[test]
    fn test_shadow_drawn_under_text() {
        let mut canvas = Canvas::new(16, 16, Colour::WHITE).unwrap();
        let red = Colour::from_hex("#FF0000").unwrap();
        draw_text_with_shadow(&mut canvas, (0, 0), "_", &font(), red, Colour::BLACK, (3, 3));
        assert_eq!(canvas.pixel(0, 7), [255, 0, 0]);
        assert_eq!(canvas.pixel(3, 10), [0, 0, 0]);
    }

    #[test]
    fn test_outline_surrounds_text() {
        let mut canvas = Canvas::new(16, 16, Colour::WHITE).unwrap();
        let red = Colour::from_hex("#FF0000").unwrap();
        draw_text_with_outline(&mut canvas, (4, 4), "_", &font(), red, Colour::BLACK, 2);
        assert_eq!(canvas.pixel(4, 11), [255, 0, 0]);
        assert_eq!(canvas.pixel(4, 13), [0, 0, 0]);
        assert_eq!(canvas.pixel(4, 14), [255, 255, 255]);
    }

    #[test]
    fn test_multiline_height() {
        let mut canvas = Canvas::new(200, 200, Colour::BLACK).unwrap();
        let height = draw_multiline_text(
            &mut canvas,
            (0, 0),
            "aa bb cc dd",
            &font(),
            Colour::WHITE,
            40,
            10,
            Align::Left,
            TextEffect::Plain,
        );
        // Two 8px lines with one 10px gap.
        assert_eq!(height, 26);
    }

    #[test]
    fn test_multiline_right_align() {
        let mut canvas = Canvas::new(64, 16, Colour::BLACK).unwrap();
        draw_multiline_text(
            &mut canvas,
            (0, 0),
            "_",
            &font(),
            Colour::WHITE,
            64,
            0,
            Align::Right,
            TextEffect::Plain,
        );
        assert_eq!(canvas.pixel(63, 7), [255, 255, 255]);
        assert_eq!(canvas.pixel(0, 7), [0, 0, 0]);
    }
}
