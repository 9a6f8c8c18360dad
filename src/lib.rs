//! postgen - Branded social media post generator
//!
//! Renders gradient backgrounds, overlay patterns, effects, logos and text
//! into PNG or JPEG images. Posts are described either by stored JSON
//! templates or by a [`PostDesign`] built in code, and can be generated one
//! at a time, in batches from CSV/JSON files, or over HTTP.

pub mod batch;
pub mod cli;
pub mod config;
pub mod design;
pub mod error;
pub mod logging;
pub mod news;
pub mod output;
pub mod render;
pub mod server;
pub mod templates;
pub mod types;
pub mod typography;

pub use batch::{BatchGenerator, BatchItem, BatchReport};
pub use config::Config;
pub use design::{DesignBuilder, Layer, PostDesign};
pub use error::{PostError, Result};
pub use news::{Article, NewsFetcher, NewsQuery};
pub use render::{
    Canvas, Compositor, GradientDirection, LinePattern, LogoAnchor, LogoPlacement, SaveOptions,
    ShapeKind, ShapePattern, TextBoxSpec, TextSpec,
};
pub use templates::{PostContent, PostTemplate, TemplateOverrides, TemplateStore};
pub use types::{get_scheme, list_schemes, ColorScheme, Colour, Dimension};
pub use typography::{Align, TextEffect, Typography};
