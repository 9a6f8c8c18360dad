//! Batch command implementation.

use std::path::PathBuf;

use clap::{ArgGroup, Args};

use super::{template_store, typography};
use crate::batch::{write_sample_csv, write_sample_json, BatchGenerator, BatchReport};
use crate::config::Config;
use crate::error::Result;
use crate::output::{plural, Printer};

/// Generate many posts from a CSV or JSON file
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["csv", "json", "sample_csv", "sample_json"])
))]
pub struct BatchArgs {
    /// CSV file with one post per row
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// JSON file holding an array of posts
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write an example CSV file and exit
    #[arg(long)]
    pub sample_csv: Option<PathBuf>,

    /// Write an example JSON file and exit
    #[arg(long)]
    pub sample_json: Option<PathBuf>,

    /// Logo added to every post
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Output directory (default: configured output directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Base seed for the random layers; each post adds its row number
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: BatchArgs, config: &Config, printer: &Printer) -> Result<()> {
    if let Some(path) = &args.sample_csv {
        write_sample_csv(path)?;
        printer.status("Created", &printer.path(path));
        return Ok(());
    }
    if let Some(path) = &args.sample_json {
        write_sample_json(path)?;
        printer.status("Created", &printer.path(path));
        return Ok(());
    }

    let output_dir = args.output_dir.clone().unwrap_or_else(|| config.output.clone());
    let generator = BatchGenerator::new(output_dir, template_store(config)?, typography(config))?
        .with_seed(args.seed);
    let logo = args.logo.as_deref();

    let report = match (&args.csv, &args.json) {
        (Some(csv), _) => generator.generate_from_csv(csv, logo)?,
        (None, Some(json)) => generator.generate_from_json(json, logo)?,
        (None, None) => BatchReport::default(),
    };

    print_report(&report, printer);
    Ok(())
}

fn print_report(report: &BatchReport, printer: &Printer) {
    for path in &report.generated {
        printer.status("Generated", &printer.path(path));
    }
    for (index, message) in &report.failures {
        printer.error("Failed", &format!("post {}: {}", index, message));
    }

    let summary = format!(
        "{} of {}",
        plural(report.generated.len(), "post", "posts"),
        report.total()
    );
    if report.failures.is_empty() {
        printer.status("Finished", &summary);
    } else {
        printer.warning("Finished", &summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> std::result::Result<BatchArgs, clap::Error> {
        let mut full = vec!["postgen", "batch"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).map(|cli| match cli.command {
            Commands::Batch(args) => args,
            other => panic!("expected batch, got {:?}", other),
        })
    }

    #[test]
    fn test_source_required_and_exclusive() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--csv", "a.csv", "--json", "b.json"]).is_err());
        assert!(parse(&["--csv", "a.csv"]).is_ok());
    }

    #[test]
    fn test_sample_then_generate() {
        let dir = tempdir().unwrap();
        let config = Config {
            templates: dir.path().join("templates"),
            fonts: dir.path().to_path_buf(),
            output: dir.path().join("out"),
            ..Config::default()
        };
        template_store(&config).unwrap().create_defaults().unwrap();
        let printer = Printer::plain();

        let sample = dir.path().join("posts.json");
        let sample_arg = sample.to_str().unwrap();
        run(parse(&["--sample-json", sample_arg]).unwrap(), &config, &printer).unwrap();
        assert!(sample.is_file());

        run(parse(&["--json", sample_arg, "--seed", "4"]).unwrap(), &config, &printer).unwrap();
        assert!(dir.path().join("out").join("post_launch.png").is_file());
    }
}
