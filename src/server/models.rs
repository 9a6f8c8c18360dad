use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::design::{Layer, PostDesign};
use crate::error::{PostError, Result};
use crate::render::{
    GradientDirection, LinePattern, LogoAnchor, LogoPlacement, ShapeKind, ShapePattern,
    TextBoxSpec, TextSpec,
};
use crate::templates::{PatternType, PostContent, TemplateStore};
use crate::types::{get_scheme, Colour, Dimension};

/// Body of `POST /generate`.
///
/// With `template` set, only `text` and `subtext` are read and the template
/// supplies the rest. Otherwise every field describes the post directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostRequest {
    pub text: String,
    pub subtext: Option<String>,
    pub template: Option<String>,
    /// A preset name, `WxH`, or `custom` together with the two fields below.
    pub dimension: String,
    pub custom_width: Option<u32>,
    pub custom_height: Option<u32>,
    pub color_scheme: Option<String>,
    pub bg_color: Option<String>,
    pub gradient_start: Option<String>,
    pub gradient_end: Option<String>,
    pub gradient_direction: String,
    pub pattern: Option<String>,
    pub pattern_color: Option<String>,
    pub pattern_angle: i32,
    pub pattern_spacing: u32,
    pub pattern_width: u32,
    pub pattern_opacity: u8,
    pub shape_type: Option<String>,
    pub shape_color: Option<String>,
    pub shape_count: u32,
    pub shape_opacity: u8,
    pub add_vignette: bool,
    pub vignette_intensity: f64,
    pub add_noise: bool,
    pub noise_intensity: u8,
    pub add_blur: bool,
    pub blur_radius: u32,
    pub text_shadow: bool,
    pub text_outline: bool,
    pub text_x: i32,
    pub text_y: i32,
    pub font_size: u32,
    pub text_color: String,
    pub text_max_width: i32,
    pub subtext_x: i32,
    pub subtext_y: i32,
    pub subtext_font_size: u32,
    pub subtext_color: Option<String>,
    pub logo_position: String,
    pub logo_size: u32,
    /// Fetched before rendering; ignored when a logo file is uploaded.
    pub logo_url: Option<String>,
    pub add_textbox: bool,
    pub textbox_content: Option<String>,
    pub textbox_x: i32,
    pub textbox_y: i32,
    pub textbox_width: i32,
    pub textbox_height: i32,
    pub textbox_bg_color: String,
    pub textbox_bg_opacity: u8,
    pub textbox_text_color: String,
    pub textbox_font_size: u32,
    pub textbox_padding: i32,
    pub seed: Option<u64>,
}

impl Default for PostRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            subtext: None,
            template: None,
            dimension: "square".to_string(),
            custom_width: None,
            custom_height: None,
            color_scheme: None,
            bg_color: None,
            gradient_start: None,
            gradient_end: None,
            gradient_direction: "vertical".to_string(),
            pattern: None,
            pattern_color: None,
            pattern_angle: 45,
            pattern_spacing: 50,
            pattern_width: 2,
            pattern_opacity: 30,
            shape_type: None,
            shape_color: None,
            shape_count: 15,
            shape_opacity: 20,
            add_vignette: false,
            vignette_intensity: 0.5,
            add_noise: false,
            noise_intensity: 5,
            add_blur: false,
            blur_radius: 5,
            text_shadow: false,
            text_outline: false,
            text_x: 40,
            text_y: 400,
            font_size: 70,
            text_color: "#FFFFFF".to_string(),
            text_max_width: 900,
            subtext_x: 40,
            subtext_y: 650,
            subtext_font_size: 40,
            subtext_color: None,
            logo_position: "top-left".to_string(),
            logo_size: 150,
            logo_url: None,
            add_textbox: false,
            textbox_content: None,
            textbox_x: 40,
            textbox_y: 800,
            textbox_width: 900,
            textbox_height: 200,
            textbox_bg_color: "#000000".to_string(),
            textbox_bg_opacity: 200,
            textbox_text_color: "#FFFFFF".to_string(),
            textbox_font_size: 35,
            textbox_padding: 25,
            seed: None,
        }
    }
}

fn optional_colour(value: Option<&str>) -> Result<Option<Colour>> {
    value.map(Colour::from_hex).transpose()
}

impl PostRequest {
    /// Resolve the request into a design, loading the template if one is named.
    pub fn to_design(&self, templates: &TemplateStore, logo: Option<&Path>) -> Result<PostDesign> {
        if let Some(name) = self.template.as_deref() {
            let template = templates.load(name)?;
            let mut content = PostContent::new(self.text.clone());
            content.subheadline = self.subtext.clone();
            return template.to_design(&content, logo);
        }
        self.custom_design(logo)
    }

    fn dimension(&self) -> Result<Dimension> {
        if self.dimension == "custom" {
            return match (self.custom_width, self.custom_height) {
                (Some(w), Some(h)) => Ok(Dimension::custom(w, h)),
                _ => Err(PostError::InvalidArgument {
                    message: "dimension 'custom' needs custom_width and custom_height".to_string(),
                    help: None,
                }),
            };
        }
        self.dimension.parse()
    }

    fn custom_design(&self, logo: Option<&Path>) -> Result<PostDesign> {
        let background = match (&self.color_scheme, &self.bg_color) {
            (Some(scheme), _) => get_scheme(scheme)?.background_rgb(),
            (None, Some(hex)) => Colour::from_hex(hex)?,
            (None, None) => Colour::BLACK,
        };

        let mut layers = Vec::new();

        if let (Some(start), Some(end)) = (&self.gradient_start, &self.gradient_end) {
            let direction: GradientDirection = self.gradient_direction.parse()?;
            layers.push(Layer::Gradient {
                start: Colour::from_hex(start)?,
                end: Colour::from_hex(end)?,
                direction,
            });
        }

        if let Some(pattern) = self.pattern.as_deref() {
            let colour = optional_colour(self.pattern_color.as_deref())?.unwrap_or(Colour::WHITE);
            let pattern: PatternType = pattern.parse()?;
            match pattern.shape() {
                None => layers.push(Layer::Lines(LinePattern {
                    colour,
                    spacing: self.pattern_spacing,
                    angle: self.pattern_angle,
                    width: self.pattern_width,
                    opacity: self.pattern_opacity,
                })),
                Some(shape) => layers.push(Layer::Shapes(ShapePattern {
                    shape,
                    colour,
                    opacity: self.pattern_opacity,
                    count: self.shape_count,
                })),
            }
        }

        if let Some(shape) = self.shape_type.as_deref() {
            let shape: ShapeKind = shape.parse()?;
            layers.push(Layer::Shapes(ShapePattern {
                shape,
                colour: optional_colour(self.shape_color.as_deref())?.unwrap_or(Colour::WHITE),
                opacity: self.shape_opacity,
                count: self.shape_count,
            }));
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
        if self.add_blur {
            layers.push(Layer::Blur {
                radius: self.blur_radius,
                region: None,
            });
        }

        if let Some(path) = logo {
            let anchor: LogoAnchor = self.logo_position.parse()?;
            layers.push(Layer::Logo {
                path: path.to_path_buf(),
                placement: LogoPlacement {
                    anchor,
                    max_size: (self.logo_size, self.logo_size),
                    ..LogoPlacement::default()
                },
            });
        }

        let text_colour = Colour::from_hex(&self.text_color)?;
        layers.push(Layer::Text(TextSpec {
            size: self.font_size,
            colour: text_colour,
            max_width: Some(self.text_max_width),
            shadow: self.text_shadow,
            outline: self.text_outline,
            ..TextSpec::new(self.text.clone(), (self.text_x, self.text_y))
        }));

        if let Some(subtext) = self.subtext.as_deref().filter(|s| !s.is_empty()) {
            let colour = optional_colour(self.subtext_color.as_deref())?.unwrap_or(text_colour);
            layers.push(Layer::Text(TextSpec {
                size: self.subtext_font_size,
                colour,
                max_width: Some(self.text_max_width),
                ..TextSpec::new(subtext, (self.subtext_x, self.subtext_y))
            }));
        }

        if let Some(content) = self.textbox_content.as_deref().filter(|_| self.add_textbox) {
            let bg = Colour::from_hex(&self.textbox_bg_color)?;
            layers.push(Layer::TextBox(TextBoxSpec {
                text: content.to_string(),
                position: (self.textbox_x, self.textbox_y),
                size: (self.textbox_width, self.textbox_height),
                background: bg.with_alpha(self.textbox_bg_opacity),
                text_colour: Colour::from_hex(&self.textbox_text_color)?,
                font_size: self.textbox_font_size,
                padding: self.textbox_padding,
                ..TextBoxSpec::default()
            }));
        }

        Ok(PostDesign {
            dimension: self.dimension()?,
            background,
            layers,
        })
    }
}

/// Body of `POST /generate/batch`: one shared design, one image per text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchRequest {
    pub design: PostRequest,
    pub texts: Vec<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, TemplateStore) {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path()).unwrap();
        (dir, store)
    }

    fn kinds(design: &PostDesign) -> Vec<&'static str> {
        design.layers.iter().map(Layer::kind).collect()
    }

    #[test]
    fn test_minimal_request_defaults() {
        let request: PostRequest = serde_json::from_str(r#"{"text": "Hello"}"#).unwrap();
        assert_eq!(request.dimension, "square");
        assert_eq!(request.font_size, 70);
        assert_eq!(request.textbox_padding, 25);

        let (_dir, store) = store();
        let design = request.to_design(&store, None).unwrap();
        assert_eq!(design.background, Colour::BLACK);
        assert_eq!(design.dimension.size(), (1080, 1080));
        assert_eq!(kinds(&design), vec!["text"]);
        match &design.layers[0] {
            Layer::Text(spec) => {
                assert_eq!(spec.position, (40, 400));
                assert_eq!(spec.max_width, Some(900));
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_full_request_layer_order() {
        let request = PostRequest {
            text: "Launch".to_string(),
            subtext: Some("Today".to_string()),
            dimension: "custom".to_string(),
            custom_width: Some(600),
            custom_height: Some(400),
            gradient_start: Some("#FF0000".to_string()),
            gradient_end: Some("#0000FF".to_string()),
            pattern: Some("lines".to_string()),
            shape_type: Some("circle".to_string()),
            add_vignette: true,
            add_noise: true,
            add_blur: true,
            add_textbox: true,
            textbox_content: Some("Details".to_string()),
            ..PostRequest::default()
        };
        let (_dir, store) = store();
        let design = request
            .to_design(&store, Some(Path::new("logo.png")))
            .unwrap();
        assert_eq!(design.dimension, Dimension::custom(600, 400));
        assert_eq!(
            kinds(&design),
            vec!["gradient", "lines", "shapes", "vignette", "noise", "blur", "logo", "text", "text", "text_box"]
        );
        let fonts: Vec<_> = design
            .layers
            .iter()
            .filter_map(|layer| match layer {
                Layer::Text(spec) => Some(spec.font.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fonts, vec![crate::typography::BOLD_FONT; 2]);
    }

    #[test]
    fn test_scheme_background_wins_over_bg_color() {
        let request = PostRequest {
            color_scheme: Some("professional_blue".to_string()),
            bg_color: Some("#123456".to_string()),
            ..PostRequest::default()
        };
        let (_dir, store) = store();
        let design = request.to_design(&store, None).unwrap();
        let scheme = get_scheme("professional_blue").unwrap();
        assert_eq!(design.background, scheme.background_rgb());
    }

    #[test]
    fn test_textbox_needs_flag() {
        let request = PostRequest {
            textbox_content: Some("ignored".to_string()),
            ..PostRequest::default()
        };
        let (_dir, store) = store();
        assert_eq!(kinds(&request.to_design(&store, None).unwrap()), vec!["text"]);
    }

    #[test]
    fn test_invalid_values_are_client_errors() {
        let (_dir, store) = store();
        let cases = [
            PostRequest {
                text_color: "#GGGGGG".to_string(),
                ..PostRequest::default()
            },
            PostRequest {
                dimension: "custom".to_string(),
                ..PostRequest::default()
            },
            PostRequest {
                color_scheme: Some("nope".to_string()),
                ..PostRequest::default()
            },
            PostRequest {
                template: Some("missing".to_string()),
                ..PostRequest::default()
            },
        ];
        for request in cases {
            let err = request.to_design(&store, None).unwrap_err();
            assert!(err.is_client_error(), "{:?}", err);
        }
    }

    #[test]
    fn test_template_request_uses_template() {
        let (_dir, store) = store();
        store.create_defaults().unwrap();
        let request = PostRequest {
            text: "Quarterly results".to_string(),
            template: Some("professional_gradient".to_string()),
            font_size: 10,
            ..PostRequest::default()
        };
        let design = request.to_design(&store, None).unwrap();
        let headline = design
            .layers
            .iter()
            .find_map(|l| match l {
                Layer::Text(spec) => Some(spec),
                _ => None,
            })
            .unwrap();
        assert_eq!(headline.text, "Quarterly results");
        assert_ne!(headline.size, 10);
    }

    #[test]
    fn test_batch_request_parse() {
        let batch: BatchRequest = serde_json::from_str(
            r##"{"design": {"text": "", "bg_color": "#0A66C2"}, "texts": ["one", "two"]}"##,
        )
        .unwrap();
        assert_eq!(batch.texts.len(), 2);
        assert_eq!(batch.design.bg_color.as_deref(), Some("#0A66C2"));
        assert!(batch.logo_url.is_none());
    }
}
