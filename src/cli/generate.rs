//! Generate command implementation.
//!
//! Renders one post, either from a stored template (flags override some of
//! its values) or entirely from flags.

use std::path::PathBuf;

use clap::Args;

use super::{parse_size, template_store, typography};
use crate::batch::parse_point;
use crate::config::Config;
use crate::design::{DesignBuilder, PostDesign};
use crate::error::{PostError, Result};
use crate::output::Printer;
use crate::render::{Compositor, GradientDirection, LogoAnchor, SaveOptions, TextSpec};
use crate::templates::{PatternType, PostContent, TemplateOverrides};
use crate::types::{get_scheme, Colour, Dimension};

const DEFAULT_FONT_SIZE: u32 = 70;
const PLACEHOLDER_HEADLINE: &str = "Your Headline Here";

/// Generate one post from a template or from flags
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Template name to use
    #[arg(long, short)]
    pub template: Option<String>,

    /// Main headline text
    #[arg(long)]
    pub text: Option<String>,

    /// Subheadline text
    #[arg(long)]
    pub subtext: Option<String>,

    /// Path to a logo image
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Dimension preset
    #[arg(long, short, default_value = "square")]
    pub dimension: String,

    /// Custom size as WIDTHxHEIGHT (e.g. 1080x1080)
    #[arg(long)]
    pub custom_size: Option<String>,

    /// Background colour (hex, e.g. #000000)
    #[arg(long)]
    pub bg_color: Option<String>,

    /// Gradient start colour (hex)
    #[arg(long)]
    pub gradient_start: Option<String>,

    /// Gradient end colour (hex)
    #[arg(long)]
    pub gradient_end: Option<String>,

    /// Gradient direction: vertical, horizontal, diagonal or radial
    #[arg(long, default_value = "vertical")]
    pub gradient_direction: GradientDirection,

    /// Color scheme name
    #[arg(long, short)]
    pub color_scheme: Option<String>,

    /// Pattern overlay: lines, circles, rectangles or triangles
    #[arg(long)]
    pub pattern: Option<PatternType>,

    /// Line pattern angle in degrees
    #[arg(long, default_value = "45", allow_negative_numbers = true)]
    pub pattern_angle: i32,

    /// Line pattern spacing in pixels
    #[arg(long, default_value = "50")]
    pub pattern_spacing: u32,

    /// Darken the edges
    #[arg(long)]
    pub vignette: bool,

    /// Add film grain
    #[arg(long)]
    pub noise: bool,

    /// Drop shadow behind the headline
    #[arg(long)]
    pub shadow: bool,

    /// Outline around the headline
    #[arg(long)]
    pub outline: bool,

    /// Logo anchor (top-left, top-center, top-right, bottom-left, bottom-center, bottom-right, center)
    #[arg(long)]
    pub logo_position: Option<LogoAnchor>,

    /// Logo bounding box as WIDTHxHEIGHT
    #[arg(long)]
    pub logo_size: Option<String>,

    /// Headline font size
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: u32,

    /// Text colour (hex). Defaults to white, or the scheme's text colour with a template
    #[arg(long)]
    pub text_color: Option<String>,

    /// Headline position as X,Y
    #[arg(long)]
    pub text_position: Option<String>,

    /// Output file (.png or .jpg)
    #[arg(long, short, default_value = "output/post.png")]
    pub output: PathBuf,

    /// Seed for the random layers (shapes, noise)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: GenerateArgs, config: &Config, printer: &Printer) -> Result<()> {
    let design = build_design(&args, config)?;
    let label = args.template.as_deref().unwrap_or("custom");
    let (w, h) = design.dimension.size();
    printer.info("Rendering", &format!("{} ({}x{})", label, w, h));

    let mut compositor = Compositor::new(typography(config));
    if let Some(seed) = args.seed {
        compositor = compositor.with_seed(seed);
    }
    let path = design.render_to(&args.output, &mut compositor, &SaveOptions::default())?;

    printer.status("Generated", &printer.path(&path));
    Ok(())
}

/// Turn the flags into a design without rendering it.
pub fn build_design(args: &GenerateArgs, config: &Config) -> Result<PostDesign> {
    if args.text.is_none() && args.template.is_none() {
        return Err(PostError::InvalidArgument {
            message: "either --text or --template is required".to_string(),
            help: Some("Try `postgen generate --text \"Hello\"` or `postgen templates list`".to_string()),
        });
    }

    match &args.template {
        Some(name) => template_design(name, args, config),
        None => custom_design(args),
    }
}

fn template_design(name: &str, args: &GenerateArgs, config: &Config) -> Result<PostDesign> {
    let mut template = template_store(config)?.load(name)?;

    let overrides = TemplateOverrides {
        dimension: custom_size(args)?,
        logo_size: args.logo_size.as_deref().map(parse_size).transpose()?,
        logo_position: args.logo_position,
        headline_size: (args.font_size != DEFAULT_FONT_SIZE).then_some(args.font_size),
        text_color: args.text_color.as_deref().map(Colour::from_hex).transpose()?,
        shadow: args.shadow,
        outline: args.outline,
    };
    overrides.apply(&mut template);

    let content = PostContent {
        headline: args
            .text
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_HEADLINE.to_string()),
        subheadline: args.subtext.clone(),
        body: None,
    };
    template.to_design(&content, args.logo.as_deref())
}

fn custom_size(args: &GenerateArgs) -> Result<Option<Dimension>> {
    Ok(args
        .custom_size
        .as_deref()
        .map(parse_size)
        .transpose()?
        .map(|(w, h)| Dimension::custom(w, h)))
}

fn custom_design(args: &GenerateArgs) -> Result<PostDesign> {
    let dimension = match custom_size(args)? {
        Some(d) => d,
        None => Dimension::preset(&args.dimension)?,
    };

    let background = match (&args.bg_color, &args.color_scheme) {
        (Some(hex), _) => Colour::from_hex(hex)?,
        (None, Some(scheme)) => get_scheme(scheme)?.background_rgb(),
        (None, None) => Colour::BLACK,
    };

    let mut builder = DesignBuilder::new().dimension(dimension).background(background);

    if let (Some(start), Some(end)) = (&args.gradient_start, &args.gradient_end) {
        builder = builder.gradient(start.as_str(), end.as_str(), args.gradient_direction);
    }

    builder = match args.pattern.map(|p| (p, p.shape())) {
        Some((_, Some(shape))) => builder.shapes(shape, Colour::WHITE, 20, 10),
        Some((_, None)) => builder.pattern_lines(Colour::WHITE, args.pattern_spacing, args.pattern_angle, 30),
        None => builder,
    };

    if args.vignette {
        builder = builder.vignette(0.6);
    }
    if args.noise {
        builder = builder.noise(10);
    }

    if let Some(logo) = &args.logo {
        let max_size = args
            .logo_size
            .as_deref()
            .map(parse_size)
            .transpose()?
            .unwrap_or((200, 200));
        builder = builder.logo(
            logo.clone(),
            args.logo_position.unwrap_or_default(),
            max_size,
            40,
        );
    }

    let position = match &args.text_position {
        Some(p) => parse_point(p)?,
        None => (40, 400),
    };
    let colour = match &args.text_color {
        Some(hex) => Colour::from_hex(hex)?,
        None => Colour::WHITE,
    };

    builder = builder.styled_text(TextSpec {
        size: args.font_size,
        colour,
        max_width: Some(900),
        shadow: args.shadow,
        outline: args.outline,
        ..TextSpec::new(args.text.clone().unwrap_or_default(), position)
    });

    if let Some(subtext) = args.subtext.as_deref().filter(|s| !s.is_empty()) {
        builder = builder.styled_text(TextSpec {
            size: 40,
            colour,
            max_width: Some(900),
            ..TextSpec::new(subtext, (position.0, position.1 + 150))
        });
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::design::Layer;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["postgen", "generate"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Generate(args) => args,
            other => panic!("expected generate, got {:?}", other),
        }
    }

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            templates: dir.join("templates"),
            ..Config::default()
        }
    }

    fn texts(design: &PostDesign) -> Vec<&TextSpec> {
        design
            .layers
            .iter()
            .filter_map(|l| match l {
                Layer::Text(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_requires_text_or_template() {
        let args = parse(&[]);
        let err = build_design(&args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--text or --template"));
    }

    #[test]
    fn test_custom_design_from_flags() {
        let args = parse(&[
            "--text", "Hello",
            "--subtext", "World",
            "--custom-size", "800x600",
            "--gradient-start", "#000000",
            "--gradient-end", "#FF0000",
            "--pattern", "lines",
            "--pattern-angle", "-30",
            "--vignette",
            "--text-position", "10,20",
        ]);
        let design = build_design(&args, &Config::default()).unwrap();
        assert_eq!(design.dimension, Dimension::custom(800, 600));
        let kinds: Vec<_> = design.layers.iter().map(Layer::kind).collect();
        assert_eq!(kinds, vec!["gradient", "lines", "vignette", "text", "text"]);

        let texts = texts(&design);
        assert_eq!(texts[0].position, (10, 20));
        assert_eq!(texts[1].position, (10, 170));
        assert_eq!(texts[1].size, 40);
        assert_eq!(texts[1].font, crate::typography::BOLD_FONT);
    }

    #[test]
    fn test_bg_color_wins_over_scheme() {
        let args = parse(&["--text", "x", "--bg-color", "#112233", "-c", "bold_red"]);
        let design = build_design(&args, &Config::default()).unwrap();
        assert_eq!(design.background, Colour::rgb(0x11, 0x22, 0x33));
    }

    #[test]
    fn test_bad_colour_flag() {
        let args = parse(&["--text", "x", "--gradient-start", "#12", "--gradient-end", "#000000"]);
        assert!(matches!(
            build_design(&args, &Config::default()),
            Err(PostError::InvalidColorFormat { .. })
        ));
    }

    #[test]
    fn test_template_overrides() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        template_store(&config).unwrap().create_defaults().unwrap();

        let args = parse(&["-t", "minimal_clean", "--custom-size", "640x480", "--shadow", "--font-size", "90"]);
        let design = build_design(&args, &config).unwrap();
        assert_eq!(design.dimension, Dimension::custom(640, 480));
        let headline = texts(&design)[0];
        assert_eq!(headline.text, PLACEHOLDER_HEADLINE);
        assert_eq!(headline.size, 90);
        assert!(headline.shadow);
    }

    #[test]
    fn test_template_keeps_size_at_default_font_size() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        template_store(&config).unwrap().create_defaults().unwrap();

        let args = parse(&["-t", "minimal_clean", "--text", "Hi"]);
        let design = build_design(&args, &config).unwrap();
        assert_eq!(texts(&design)[0].size, 65);
        let scheme = get_scheme("minimal_gray").unwrap();
        assert_eq!(texts(&design)[0].colour, scheme.text_rgb());
    }

    #[test]
    fn test_run_writes_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out").join("post.png");
        let args = parse(&[
            "--text", "Hi",
            "--custom-size", "64x32",
            "--font-size", "8",
            "--seed", "1",
            "-o", output.to_str().unwrap(),
        ]);
        let config = Config {
            fonts: dir.path().to_path_buf(),
            ..config_in(dir.path())
        };
        run(args, &config, &Printer::plain()).unwrap();
        let image = image::open(&output).unwrap();
        assert_eq!((image.width(), image.height()), (64, 32));
    }
}
