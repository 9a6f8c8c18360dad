//! Batch generation from CSV or JSON files.
//!
//! Each row names a template (or carries a few custom settings) plus the
//! post text. Rows are rendered one after another; a failing row is logged
//! and recorded in the [`BatchReport`] without stopping the rest.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::design::{Layer, PostDesign};
use crate::error::{PostError, Result};
use crate::render::{
    Compositor, GradientDirection, LogoAnchor, LogoPlacement, SaveOptions, TextSpec,
};
use crate::templates::{PostContent, TemplateStore};
use crate::types::{get_scheme, Dimension};
use crate::typography::Typography;

/// An `x,y` pair, written either as a JSON array or as `"x,y"` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointField {
    Pair([i32; 2]),
    Text(String),
}

impl PointField {
    pub fn resolve(&self) -> Result<(i32, i32)> {
        match self {
            PointField::Pair([x, y]) => Ok((*x, *y)),
            PointField::Text(s) => parse_point(s),
        }
    }
}

/// Parse `"x,y"`.
pub fn parse_point(s: &str) -> Result<(i32, i32)> {
    let parsed = s
        .split_once(',')
        .and_then(|(x, y)| Some((x.trim().parse().ok()?, y.trim().parse().ok()?)));
    parsed.ok_or_else(|| PostError::InvalidArgument {
        message: format!("invalid position '{}'", s),
        help: Some("Positions are written as X,Y, e.g. 40,400".to_string()),
    })
}

/// One post in a batch file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchItem {
    pub template: Option<String>,
    pub text: Option<String>,
    pub subtext: Option<String>,
    pub output_filename: Option<String>,
    /// Per-item logo (JSON batches only).
    pub logo: Option<PathBuf>,

    // Settings used when no template is named.
    pub dimension: Option<String>,
    pub color_scheme: Option<String>,
    pub gradient_direction: Option<String>,
    pub add_vignette: Option<bool>,
    pub add_noise: Option<bool>,
    pub logo_position: Option<String>,
    pub font_size: Option<u32>,
    pub text_position: Option<PointField>,
    pub subtext_position: Option<PointField>,
}

impl BatchItem {
    fn content(&self) -> PostContent {
        PostContent {
            headline: self.text.clone().unwrap_or_default(),
            subheadline: self.subtext.clone().filter(|s| !s.is_empty()),
            body: None,
        }
    }

    /// Design for a row without a template: scheme gradient, optional
    /// effects and logo, then the text.
    pub fn custom_design(&self, logo: Option<&Path>) -> Result<PostDesign> {
        let dimension: Dimension = self.dimension.as_deref().unwrap_or("square").parse()?;
        let scheme = get_scheme(self.color_scheme.as_deref().unwrap_or("professional_dark"))?;
        let direction: GradientDirection = match self.gradient_direction.as_deref() {
            Some(d) => d.parse()?,
            None => GradientDirection::Vertical,
        };

        let mut layers = vec![Layer::Gradient {
            start: scheme.primary_rgb(),
            end: scheme.secondary_rgb(),
            direction,
        }];
        if self.add_vignette.unwrap_or(false) {
            layers.push(Layer::Vignette { intensity: 0.6 });
        }
        if self.add_noise.unwrap_or(false) {
            layers.push(Layer::Noise { intensity: 10 });
        }
        if let Some(path) = logo {
            let anchor: LogoAnchor = match self.logo_position.as_deref() {
                Some(p) => p.parse()?,
                None => LogoAnchor::TopLeft,
            };
            layers.push(Layer::Logo {
                path: path.to_path_buf(),
                placement: LogoPlacement {
                    anchor,
                    ..LogoPlacement::default()
                },
            });
        }

        let content = self.content();
        let text_position = match &self.text_position {
            Some(p) => p.resolve()?,
            None => (40, 400),
        };
        layers.push(Layer::Text(TextSpec {
            size: self.font_size.unwrap_or(70),
            colour: scheme.text_rgb(),
            max_width: Some(900),
            ..TextSpec::new(content.headline, text_position)
        }));

        if let Some(sub) = content.subheadline {
            let position = match &self.subtext_position {
                Some(p) => p.resolve()?,
                None => (40, 550),
            };
            layers.push(Layer::Text(TextSpec {
                size: 40,
                colour: scheme.text_rgb(),
                max_width: Some(900),
                ..TextSpec::new(sub, position)
            }));
        }

        Ok(PostDesign {
            dimension,
            background: scheme.background_rgb(),
            layers,
        })
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub generated: Vec<PathBuf>,
    /// 1-based item number and the error message.
    pub failures: Vec<(usize, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.generated.len() + self.failures.len()
    }
}

/// Renders batch items into an output directory.
#[derive(Debug)]
pub struct BatchGenerator {
    output_dir: PathBuf,
    store: TemplateStore,
    typography: Arc<Typography>,
    seed: Option<u64>,
}

impl BatchGenerator {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        store: TemplateStore,
        typography: Arc<Typography>,
    ) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|e| PostError::Io {
            path: output_dir.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
        Ok(Self {
            output_dir,
            store,
            typography,
            seed: None,
        })
    }

    /// Seed every item's random generator for reproducible output.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn generate_from_csv(&self, path: &Path, logo: Option<&Path>) -> Result<BatchReport> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| PostError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut report = BatchReport::default();
        for (i, row) in reader.deserialize::<BatchItem>().enumerate() {
            let index = i + 1;
            let outcome = row
                .map_err(|e| PostError::Parse {
                    message: format!("row {}: {}", index, e),
                    help: None,
                })
                .and_then(|item| self.generate_item(index, &item, logo));
            self.record(&mut report, index, outcome);
        }

        tracing::info!(generated = report.generated.len(), failed = report.failures.len(), "batch complete");
        Ok(report)
    }

    pub fn generate_from_json(&self, path: &Path, logo: Option<&Path>) -> Result<BatchReport> {
        let content = fs::read_to_string(path).map_err(|e| PostError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let items: Vec<BatchItem> = serde_json::from_str(&content).map_err(|e| PostError::Parse {
            message: format!("{}: {}", path.display(), e),
            help: Some("The file must contain a JSON array of post objects".to_string()),
        })?;
        Ok(self.generate(&items, logo))
    }

    /// Render every item, collecting successes and failures.
    pub fn generate(&self, items: &[BatchItem], logo: Option<&Path>) -> BatchReport {
        let mut report = BatchReport::default();
        for (i, item) in items.iter().enumerate() {
            let index = i + 1;
            let outcome = self.generate_item(index, item, logo);
            self.record(&mut report, index, outcome);
        }
        tracing::info!(generated = report.generated.len(), failed = report.failures.len(), "batch complete");
        report
    }

    fn record(&self, report: &mut BatchReport, index: usize, outcome: Result<PathBuf>) {
        match outcome {
            Ok(path) => {
                tracing::info!(item = index, path = %path.display(), "generated");
                report.generated.push(path);
            }
            Err(e) => {
                tracing::error!(item = index, error = %e, "failed to generate post");
                report.failures.push((index, e.to_string()));
            }
        }
    }

    fn generate_item(&self, index: usize, item: &BatchItem, logo: Option<&Path>) -> Result<PathBuf> {
        let filename = item
            .output_filename
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| format!("post_{}.png", index));
        let output = self.output_dir.join(filename);
        let logo = item.logo.as_deref().or(logo);

        let design = match item.template.as_deref().filter(|t| !t.is_empty()) {
            Some(name) => self.store.load(name)?.to_design(&item.content(), logo)?,
            None => item.custom_design(logo)?,
        };

        let mut compositor = Compositor::new(self.typography.clone());
        if let Some(seed) = self.seed {
            compositor = compositor.with_seed(seed.wrapping_add(index as u64));
        }
        design.render_to(&output, &mut compositor, &SaveOptions::default())
    }
}

#[derive(Serialize)]
struct SampleRow {
    template: &'static str,
    text: &'static str,
    subtext: &'static str,
    output_filename: &'static str,
}

const SAMPLE: [SampleRow; 3] = [
    SampleRow {
        template: "professional_gradient",
        text: "Innovation Starts Here",
        subtext: "Join the future of technology",
        output_filename: "post_innovation.png",
    },
    SampleRow {
        template: "bold_red_lines",
        text: "New Product Launch",
        subtext: "Available Now",
        output_filename: "post_launch.png",
    },
    SampleRow {
        template: "minimal_clean",
        text: "Simplicity is Key",
        subtext: "Less is More",
        output_filename: "post_minimal.png",
    },
];

/// Write an example CSV batch file.
pub fn write_sample_csv(path: &Path) -> Result<()> {
    let io_err = |e: csv::Error| PostError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(io_err)?;
    for row in &SAMPLE {
        writer.serialize(row).map_err(io_err)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write an example JSON batch file.
pub fn write_sample_json(path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&SAMPLE).map_err(|e| PostError::Parse {
        message: e.to_string(),
        help: None,
    })?;
    fs::write(path, json).map_err(|e| PostError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
