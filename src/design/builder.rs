//! Fluent construction of [`PostDesign`]s.

use std::path::PathBuf;

use super::{Layer, PostDesign};
use crate::error::{PostError, Result};
use crate::render::{
    GradientDirection, LinePattern, LogoAnchor, LogoPlacement, Region, ShapeKind, ShapePattern,
    TextBoxSpec, TextSpec,
};
use crate::types::{Colour, Dimension};

/// Anything the builder accepts as a colour.
pub trait IntoColour {
    fn into_colour(self) -> Result<Colour>;
}

impl IntoColour for Colour {
    fn into_colour(self) -> Result<Colour> {
        Ok(self)
    }
}

impl IntoColour for &str {
    fn into_colour(self) -> Result<Colour> {
        Colour::from_hex(self)
    }
}

impl IntoColour for String {
    fn into_colour(self) -> Result<Colour> {
        Colour::from_hex(&self)
    }
}

impl IntoColour for (u8, u8, u8) {
    fn into_colour(self) -> Result<Colour> {
        Ok(self.into())
    }
}

/// Builds a [`PostDesign`] one layer at a time.
///
/// Colour arguments are parsed as they are passed in. The first failure is
/// kept and returned from [`DesignBuilder::build`]; later calls are still
/// accepted but have no effect on the outcome.
#[derive(Debug, Default)]
pub struct DesignBuilder {
    dimension: Dimension,
    background: Colour,
    layers: Vec<Layer>,
    error: Option<PostError>,
}

impl DesignBuilder {
    pub fn new() -> Self {
        Self {
            background: Colour::WHITE,
            ..Self::default()
        }
    }

    fn colour(&mut self, value: impl IntoColour) -> Colour {
        match value.into_colour() {
            Ok(c) => c,
            Err(e) => {
                self.error.get_or_insert(e);
                Colour::BLACK
            }
        }
    }

    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    /// Use a named preset such as `story`.
    pub fn preset(mut self, name: &str) -> Self {
        match Dimension::preset(name) {
            Ok(d) => self.dimension = d,
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn size(self, width: u32, height: u32) -> Self {
        self.dimension(Dimension::custom(width, height))
    }

    pub fn background(mut self, colour: impl IntoColour) -> Self {
        self.background = self.colour(colour);
        self
    }

    pub fn gradient(
        mut self,
        start: impl IntoColour,
        end: impl IntoColour,
        direction: GradientDirection,
    ) -> Self {
        let start = self.colour(start);
        let end = self.colour(end);
        self.layers.push(Layer::Gradient {
            start,
            end,
            direction,
        });
        self
    }

    pub fn pattern_lines(
        mut self,
        colour: impl IntoColour,
        spacing: u32,
        angle: i32,
        opacity: u8,
    ) -> Self {
        let colour = self.colour(colour);
        self.layers.push(Layer::Lines(LinePattern {
            colour,
            spacing,
            angle,
            opacity,
            ..LinePattern::default()
        }));
        self
    }

    pub fn shapes(mut self, shape: ShapeKind, colour: impl IntoColour, opacity: u8, count: u32) -> Self {
        let colour = self.colour(colour);
        self.layers.push(Layer::Shapes(ShapePattern {
            shape,
            colour,
            opacity,
            count,
        }));
        self
    }

    pub fn vignette(self, intensity: f64) -> Self {
        self.layer(Layer::Vignette { intensity })
    }

    pub fn noise(self, intensity: u8) -> Self {
        self.layer(Layer::Noise { intensity })
    }

    pub fn blur(self, radius: u32, region: Option<Region>) -> Self {
        self.layer(Layer::Blur { radius, region })
    }

    pub fn logo(self, path: impl Into<PathBuf>, anchor: LogoAnchor, max_size: (u32, u32), margin: i32) -> Self {
        self.layer(Layer::Logo {
            path: path.into(),
            placement: LogoPlacement {
                anchor,
                max_size,
                margin,
                position: None,
            },
        })
    }

    /// Single-line bold text.
    pub fn text(
        mut self,
        text: impl Into<String>,
        position: (i32, i32),
        size: u32,
        colour: impl IntoColour,
    ) -> Self {
        let colour = self.colour(colour);
        self.layers.push(Layer::Text(TextSpec {
            size,
            colour,
            ..TextSpec::new(text, position)
        }));
        self
    }

    /// Text with full control over font, wrapping and effects.
    pub fn styled_text(self, spec: TextSpec) -> Self {
        self.layer(Layer::Text(spec))
    }

    pub fn text_box(
        mut self,
        text: impl Into<String>,
        position: (i32, i32),
        size: (i32, i32),
        background: [u8; 4],
        text_colour: impl IntoColour,
        font_size: u32,
    ) -> Self {
        let text_colour = self.colour(text_colour);
        self.layers.push(Layer::TextBox(TextBoxSpec {
            text: text.into(),
            position,
            size,
            background,
            text_colour,
            font_size,
            ..TextBoxSpec::default()
        }));
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn build(self) -> Result<PostDesign> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(PostDesign {
            dimension: self.dimension,
            background: self.background,
            layers: self.layers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_preserves_call_order() {
        let design = DesignBuilder::new()
            .preset("vertical")
            .background("#1A1A2E")
            .noise(5)
            .gradient("#000000", Colour::WHITE, GradientDirection::Diagonal)
            .pattern_lines("#FFFFFF", 60, 45, 25)
            .vignette(0.5)
            .text("FLUENT API", (40, 400), 90, "#FFFFFF")
            .build()
            .unwrap();

        assert_eq!(design.dimension.size(), (1080, 1350));
        assert_eq!(design.background, Colour::rgb(0x1A, 0x1A, 0x2E));
        let kinds: Vec<_> = design.layers.iter().map(Layer::kind).collect();
        assert_eq!(kinds, vec!["noise", "gradient", "lines", "vignette", "text"]);
    }

    #[test]
    fn test_builder_reports_first_bad_colour() {
        let err = DesignBuilder::new()
            .background("#12")
            .text("x", (0, 0), 10, "nope")
            .build()
            .unwrap_err();
        match err {
            PostError::InvalidColorFormat { value } => assert_eq!(value, "#12"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_builder_rejects_unknown_preset() {
        assert!(matches!(
            DesignBuilder::new().preset("poster").build(),
            Err(PostError::UnknownDimensionPreset { .. })
        ));
    }

    #[test]
    fn test_text_box_defaults() {
        let design = DesignBuilder::new()
            .text_box("body", (40, 700), (1000, 200), [0, 0, 0, 200], "#FFFFFF", 38)
            .build()
            .unwrap();
        match &design.layers[0] {
            Layer::TextBox(spec) => {
                assert_eq!(spec.padding, 20);
                assert_eq!(spec.font_size, 38);
                assert_eq!(spec.background, [0, 0, 0, 200]);
            }
            other => panic!("expected text box, got {:?}", other),
        }
    }
}
