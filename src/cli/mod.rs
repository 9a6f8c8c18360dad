pub mod batch;
pub mod completions;
pub mod generate;
pub mod news;
pub mod schemes;
pub mod serve;
pub mod templates;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{PostError, Result};
use crate::templates::TemplateStore;
use crate::typography::Typography;

/// postgen - Branded social media post generator
#[derive(Parser, Debug)]
#[command(name = "postgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./postgen.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one post from a template or from flags
    Generate(generate::GenerateArgs),

    /// List, show, delete or seed stored templates
    Templates(templates::TemplatesArgs),

    /// List color schemes or show one
    Schemes(schemes::SchemesArgs),

    /// Generate many posts from a CSV or JSON file
    Batch(batch::BatchArgs),

    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// Fetch headlines from Google News
    News(news::NewsArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Template store at the configured directory.
pub(crate) fn template_store(config: &Config) -> Result<TemplateStore> {
    TemplateStore::new(&config.templates)
}

/// Font resolver rooted at the configured font directory.
pub(crate) fn typography(config: &Config) -> Arc<Typography> {
    Arc::new(Typography::new(&config.fonts))
}

/// Parse a "WxH" size string into (width, height).
pub(crate) fn parse_size(s: &str) -> Result<(u32, u32)> {
    let invalid = || PostError::InvalidArgument {
        message: format!("Invalid size '{}': expected WxH (e.g. 1080x1080)", s),
        help: Some("Use the format WxH, for example: 1080x1350, 200x200".to_string()),
    };

    let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;

    if w == 0 || h == 0 {
        return Err(PostError::InvalidArgument {
            message: format!("Size must be non-zero, got {}x{}", w, h),
            help: Some("Both width and height must be at least 1".to_string()),
        });
    }

    Ok((w, h))
}
