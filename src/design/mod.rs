//! Post designs: a serializable description of an image.
//!
//! A [`PostDesign`] records the canvas size, background and an ordered list
//! of [`Layer`]s. Rendering replays the layers onto a [`Compositor`] in the
//! order they were added, so the same design always yields the same image
//! (given the same seed).

mod builder;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::{
    Compositor, GradientDirection, LinePattern, LogoPlacement, Region, SaveOptions, ShapePattern,
    TextBoxSpec, TextSpec,
};
use crate::types::{Colour, Dimension};

pub use builder::{DesignBuilder, IntoColour};

fn default_vignette() -> f64 {
    0.6
}

fn default_noise() -> u8 {
    10
}

fn default_blur() -> u32 {
    5
}

/// One drawing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Gradient {
        start: Colour,
        end: Colour,
        #[serde(default)]
        direction: GradientDirection,
    },
    Lines(LinePattern),
    Shapes(ShapePattern),
    Vignette {
        #[serde(default = "default_vignette")]
        intensity: f64,
    },
    Noise {
        #[serde(default = "default_noise")]
        intensity: u8,
    },
    Blur {
        #[serde(default = "default_blur")]
        radius: u32,
        #[serde(default)]
        region: Option<Region>,
    },
    Logo {
        path: PathBuf,
        #[serde(default)]
        placement: LogoPlacement,
    },
    Text(TextSpec),
    TextBox(TextBoxSpec),
}

impl Layer {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Gradient { .. } => "gradient",
            Layer::Lines(_) => "lines",
            Layer::Shapes(_) => "shapes",
            Layer::Vignette { .. } => "vignette",
            Layer::Noise { .. } => "noise",
            Layer::Blur { .. } => "blur",
            Layer::Logo { .. } => "logo",
            Layer::Text(_) => "text",
            Layer::TextBox(_) => "text_box",
        }
    }

    /// Apply this layer to an initialized compositor.
    pub fn apply(&self, compositor: &mut Compositor) -> Result<()> {
        match self {
            Layer::Gradient {
                start,
                end,
                direction,
            } => compositor.apply_gradient(*start, *end, *direction)?,
            Layer::Lines(pattern) => compositor.add_pattern_lines(pattern)?,
            Layer::Shapes(pattern) => compositor.add_geometric_shapes(pattern)?,
            Layer::Vignette { intensity } => compositor.add_vignette(*intensity)?,
            Layer::Noise { intensity } => compositor.add_noise(*intensity)?,
            Layer::Blur { radius, region } => compositor.add_blur(*radius, *region)?,
            Layer::Logo { path, placement } => compositor.add_logo(path, placement)?,
            Layer::Text(spec) => compositor.add_text(spec)?,
            Layer::TextBox(spec) => compositor.add_text_box(spec)?,
        };
        Ok(())
    }
}

/// A complete post: canvas plus layers, in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDesign {
    #[serde(default)]
    pub dimension: Dimension,
    #[serde(default)]
    pub background: Colour,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl PostDesign {
    pub fn builder() -> DesignBuilder {
        DesignBuilder::new()
    }

    /// Create the canvas and replay every layer onto `compositor`.
    pub fn render(&self, compositor: &mut Compositor) -> Result<()> {
        compositor.create_canvas(&self.dimension, self.background)?;
        for (i, layer) in self.layers.iter().enumerate() {
            tracing::trace!(index = i, layer = layer.kind(), "applying layer");
            layer.apply(compositor)?;
        }
        Ok(())
    }

    /// Render and save to `path`.
    pub fn render_to(
        &self,
        path: &Path,
        compositor: &mut Compositor,
        options: &SaveOptions,
    ) -> Result<PathBuf> {
        self.render(compositor)?;
        compositor.save(path, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typography::Typography;
    use std::sync::Arc;

    fn compositor() -> Compositor {
        Compositor::new(Arc::new(Typography::builtin_only())).with_seed(5)
    }

    #[test]
    fn test_layer_json_defaults() {
        let layer: Layer = serde_json::from_str(r#"{"type": "vignette"}"#).unwrap();
        assert_eq!(layer, Layer::Vignette { intensity: 0.6 });

        let layer: Layer =
            serde_json::from_str(r##"{"type": "lines", "colour": "#FF0000", "angle": 90}"##).unwrap();
        match layer {
            Layer::Lines(p) => {
                assert_eq!(p.angle, 90);
                assert_eq!(p.spacing, 50);
                assert_eq!(p.colour, Colour::rgb(255, 0, 0));
            }
            other => panic!("expected lines, got {:?}", other),
        }
    }

    #[test]
    fn test_design_json_round_trip() {
        let design = PostDesign {
            dimension: Dimension::custom(300, 200),
            background: Colour::rgb(1, 2, 3),
            layers: vec![
                Layer::Noise { intensity: 4 },
                Layer::Blur {
                    radius: 2,
                    region: Some((0, 0, 10, 10)),
                },
            ],
        };
        let json = serde_json::to_string(&design).unwrap();
        let back: PostDesign = serde_json::from_str(&json).unwrap();
        assert_eq!(back, design);
    }

    #[test]
    fn test_render_replays_in_order() {
        let design = PostDesign {
            dimension: Dimension::custom(40, 40),
            background: Colour::BLACK,
            layers: vec![
                Layer::Vignette { intensity: 1.0 },
                Layer::Gradient {
                    start: Colour::WHITE,
                    end: Colour::WHITE,
                    direction: GradientDirection::Vertical,
                },
            ],
        };
        let mut post = compositor();
        design.render(&mut post).unwrap();
        assert_eq!(post.canvas().unwrap().pixel(0, 0), [255, 255, 255]);
    }

    #[test]
    fn test_render_to_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let design = PostDesign {
            dimension: Dimension::custom(16, 16),
            background: Colour::WHITE,
            layers: Vec::new(),
        };
        let path = design
            .render_to(&dir.path().join("p.png"), &mut compositor(), &SaveOptions::default())
            .unwrap();
        assert!(path.exists());
    }
}
