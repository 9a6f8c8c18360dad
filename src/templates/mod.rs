//! Reusable post templates.
//!
//! A [`PostTemplate`] is a flat JSON recipe naming a colour scheme, a
//! background style, optional pattern and effects, and where the logo and
//! text go. [`PostTemplate::to_design`] combines it with per-post
//! [`PostContent`] into a [`PostDesign`].

mod defaults;
mod store;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::design::{Layer, PostDesign};
use crate::error::{PostError, Result};
use crate::render::{
    GradientDirection, LinePattern, LogoAnchor, LogoPlacement, ShapeKind, ShapePattern,
    TextBoxSpec, TextSpec,
};
use crate::types::{get_scheme, Colour, Dimension};
use crate::typography::{BOLD_FONT, REGULAR_FONT};

pub use defaults::default_templates;
pub use store::TemplateStore;

/// How the canvas background is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Solid,
    Gradient,
    /// Solid background; the pattern itself comes from `pattern_type`.
    Pattern,
}

/// Overlay pattern drawn in the scheme's accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Lines,
    Circles,
    Rectangles,
    Triangles,
}

impl PatternType {
    /// The shape family, or `None` for lines.
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            PatternType::Lines => None,
            PatternType::Circles => Some(ShapeKind::Circles),
            PatternType::Rectangles => Some(ShapeKind::Rectangles),
            PatternType::Triangles => Some(ShapeKind::Triangles),
        }
    }
}

impl FromStr for PatternType {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lines" => Ok(PatternType::Lines),
            "circles" => Ok(PatternType::Circles),
            "rectangles" => Ok(PatternType::Rectangles),
            "triangles" => Ok(PatternType::Triangles),
            other => Err(PostError::InvalidArgument {
                message: format!("unknown pattern '{}'", other),
                help: Some("Use lines, circles, rectangles or triangles".to_string()),
            }),
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatternType::Lines => "lines",
            PatternType::Circles => "circles",
            PatternType::Rectangles => "rectangles",
            PatternType::Triangles => "triangles",
        };
        f.write_str(s)
    }
}

fn some_vertical() -> Option<GradientDirection> {
    Some(GradientDirection::Vertical)
}
fn some_50() -> Option<u32> {
    Some(50)
}
fn some_45() -> Option<i32> {
    Some(45)
}
fn some_900() -> Option<i32> {
    Some(900)
}
fn vignette_intensity() -> f64 {
    0.6
}
fn noise_intensity() -> u8 {
    10
}
fn logo_size() -> [u32; 2] {
    [200, 200]
}
fn logo_margin() -> i32 {
    40
}
fn headline_font() -> String {
    BOLD_FONT.to_string()
}
fn headline_size() -> u32 {
    70
}
fn headline_position() -> [i32; 2] {
    [40, 400]
}
fn subheadline_font() -> String {
    REGULAR_FONT.to_string()
}
fn subheadline_size() -> u32 {
    40
}
fn subheadline_position() -> [i32; 2] {
    [40, 600]
}
fn text_box_position() -> [i32; 2] {
    [40, 700]
}
fn text_box_size() -> [i32; 2] {
    [1000, 200]
}
fn text_box_bg_opacity() -> u8 {
    180
}

/// A stored design preset. Field names match the JSON files on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTemplate {
    pub name: String,
    pub dimension: Dimension,
    pub background_type: BackgroundType,
    pub color_scheme: String,

    #[serde(default = "some_vertical")]
    pub gradient_direction: Option<GradientDirection>,

    #[serde(default)]
    pub pattern_type: Option<PatternType>,
    #[serde(default = "some_50")]
    pub pattern_spacing: Option<u32>,
    #[serde(default = "some_45")]
    pub pattern_angle: Option<i32>,

    #[serde(default)]
    pub add_vignette: bool,
    #[serde(default = "vignette_intensity")]
    pub vignette_intensity: f64,
    #[serde(default)]
    pub add_noise: bool,
    #[serde(default = "noise_intensity")]
    pub noise_intensity: u8,
    /// Frost the area behind the text box before drawing it.
    #[serde(default)]
    pub add_blur_region: bool,

    #[serde(default)]
    pub logo_position: LogoAnchor,
    #[serde(default = "logo_size")]
    pub logo_size: [u32; 2],
    #[serde(default = "logo_margin")]
    pub logo_margin: i32,

    #[serde(default = "headline_font")]
    pub headline_font: String,
    #[serde(default = "headline_size")]
    pub headline_size: u32,
    #[serde(default = "headline_position")]
    pub headline_position: [i32; 2],
    #[serde(default = "some_900")]
    pub headline_max_width: Option<i32>,
    #[serde(default)]
    pub headline_shadow: bool,
    #[serde(default)]
    pub headline_outline: bool,

    #[serde(default)]
    pub has_subheadline: bool,
    #[serde(default = "subheadline_font")]
    pub subheadline_font: String,
    #[serde(default = "subheadline_size")]
    pub subheadline_size: u32,
    #[serde(default = "subheadline_position")]
    pub subheadline_position: [i32; 2],
    #[serde(default = "some_900")]
    pub subheadline_max_width: Option<i32>,

    #[serde(default)]
    pub use_text_box: bool,
    #[serde(default = "text_box_position")]
    pub text_box_position: [i32; 2],
    #[serde(default = "text_box_size")]
    pub text_box_size: [i32; 2],
    #[serde(default = "text_box_bg_opacity")]
    pub text_box_bg_opacity: u8,

    /// Overrides the scheme's text colour. Omitted from JSON when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Colour>,
}

impl PostTemplate {
    /// A template with every optional field at its default.
    pub fn new(
        name: impl Into<String>,
        dimension: Dimension,
        background_type: BackgroundType,
        color_scheme: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dimension,
            background_type,
            color_scheme: color_scheme.into(),
            gradient_direction: some_vertical(),
            pattern_type: None,
            pattern_spacing: some_50(),
            pattern_angle: some_45(),
            add_vignette: false,
            vignette_intensity: vignette_intensity(),
            add_noise: false,
            noise_intensity: noise_intensity(),
            add_blur_region: false,
            logo_position: LogoAnchor::TopLeft,
            logo_size: logo_size(),
            logo_margin: logo_margin(),
            headline_font: headline_font(),
            headline_size: headline_size(),
            headline_position: headline_position(),
            headline_max_width: some_900(),
            headline_shadow: false,
            headline_outline: false,
            has_subheadline: false,
            subheadline_font: subheadline_font(),
            subheadline_size: subheadline_size(),
            subheadline_position: subheadline_position(),
            subheadline_max_width: some_900(),
            use_text_box: false,
            text_box_position: text_box_position(),
            text_box_size: text_box_size(),
            text_box_bg_opacity: text_box_bg_opacity(),
            text_color: None,
        }
    }

    /// Combine the template with one post's text (and an optional logo).
    pub fn to_design(&self, content: &PostContent, logo: Option<&Path>) -> Result<PostDesign> {
        let scheme = get_scheme(&self.color_scheme)?;
        let text_colour = self.text_color.unwrap_or_else(|| scheme.text_rgb());
        let mut layers = Vec::new();

        if self.background_type == BackgroundType::Gradient {
            layers.push(Layer::Gradient {
                start: scheme.primary_rgb(),
                end: scheme.secondary_rgb(),
                direction: self.gradient_direction.unwrap_or_default(),
            });
        }

        match self.pattern_type {
            Some(PatternType::Lines) => layers.push(Layer::Lines(LinePattern {
                colour: scheme.accent_rgb(),
                spacing: self.pattern_spacing.unwrap_or(50),
                angle: self.pattern_angle.unwrap_or(45),
                ..LinePattern::default()
            })),
            Some(pattern) => {
                if let Some(shape) = pattern.shape() {
                    layers.push(Layer::Shapes(ShapePattern {
                        shape,
                        colour: scheme.accent_rgb(),
                        ..ShapePattern::default()
                    }));
                }
            }
            None => {}
        }

        if self.add_vignette {
            layers.push(Layer::Vignette {
                intensity: self.vignette_intensity,
            });
        }
        if self.add_noise {
            layers.push(Layer::Noise {
                intensity: self.noise_intensity,
            });
        }

        if let Some(path) = logo {
            layers.push(Layer::Logo {
                path: path.to_path_buf(),
                placement: LogoPlacement {
                    anchor: self.logo_position,
                    max_size: (self.logo_size[0], self.logo_size[1]),
                    margin: self.logo_margin,
                    position: None,
                },
            });
        }

        layers.push(Layer::Text(TextSpec {
            text: content.headline.clone(),
            position: (self.headline_position[0], self.headline_position[1]),
            font: self.headline_font.clone(),
            size: self.headline_size,
            colour: text_colour,
            max_width: self.headline_max_width,
            shadow: self.headline_shadow,
            outline: self.headline_outline,
            ..TextSpec::default()
        }));

        if let Some(sub) = content.subheadline.as_deref().filter(|s| !s.is_empty()) {
            if self.has_subheadline {
                layers.push(Layer::Text(TextSpec {
                    text: sub.to_string(),
                    position: (self.subheadline_position[0], self.subheadline_position[1]),
                    font: self.subheadline_font.clone(),
                    size: self.subheadline_size,
                    colour: text_colour,
                    max_width: self.subheadline_max_width,
                    ..TextSpec::default()
                }));
            }
        }

        if let Some(body) = content.body.as_deref().filter(|s| !s.is_empty()) {
            if self.use_text_box {
                let [x, y] = self.text_box_position;
                let [w, h] = self.text_box_size;
                if self.add_blur_region {
                    layers.push(Layer::Blur {
                        radius: 5,
                        region: Some((x, y, x + w, y + h)),
                    });
                }
                layers.push(Layer::TextBox(TextBoxSpec {
                    text: body.to_string(),
                    position: (x, y),
                    size: (w, h),
                    background: Colour::BLACK.with_alpha(self.text_box_bg_opacity),
                    text_colour,
                    ..TextBoxSpec::default()
                }));
            }
        }

        Ok(PostDesign {
            dimension: self.dimension.clone(),
            background: scheme.background_rgb(),
            layers,
        })
    }
}

/// The text of one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub headline: String,
    #[serde(default)]
    pub subheadline: Option<String>,
    /// Body copy for templates with a text box.
    #[serde(default)]
    pub body: Option<String>,
}

impl PostContent {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Self::default()
        }
    }

    pub fn with_subheadline(mut self, subheadline: impl Into<String>) -> Self {
        self.subheadline = Some(subheadline.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Caller-supplied values that take precedence over a template's own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateOverrides {
    pub dimension: Option<Dimension>,
    pub logo_size: Option<(u32, u32)>,
    pub logo_position: Option<LogoAnchor>,
    pub headline_size: Option<u32>,
    pub text_color: Option<Colour>,
    /// OR-ed with the template's own flag.
    pub shadow: bool,
    /// OR-ed with the template's own flag.
    pub outline: bool,
}

impl TemplateOverrides {
    pub fn apply(&self, template: &mut PostTemplate) {
        if let Some(d) = &self.dimension {
            template.dimension = d.clone();
        }
        if let Some((w, h)) = self.logo_size {
            template.logo_size = [w, h];
        }
        if let Some(anchor) = self.logo_position {
            template.logo_position = anchor;
        }
        if let Some(size) = self.headline_size {
            template.headline_size = size;
        }
        if let Some(colour) = self.text_color {
            template.text_color = Some(colour);
        }
        template.headline_shadow |= self.shadow;
        template.headline_outline |= self.outline;
    }
}
