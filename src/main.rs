use clap::Parser;
use miette::Result;
use postgen::cli::{Cli, Commands};
use postgen::config::Config;
use postgen::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    postgen::logging::init(cli.verbose);

    let printer = Printer::new();
    let cwd = std::env::current_dir().map_err(postgen::PostError::from)?;
    let config = Config::discover(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Generate(args) => postgen::cli::generate::run(args, &config, &printer)?,
        Commands::Templates(args) => postgen::cli::templates::run(args, &config, &printer)?,
        Commands::Schemes(args) => postgen::cli::schemes::run(args, &printer)?,
        Commands::Batch(args) => postgen::cli::batch::run(args, &config, &printer)?,
        Commands::Serve(args) => postgen::cli::serve::run(args, &config, &printer)?,
        Commands::News(args) => postgen::cli::news::run(args, &config, &printer)?,
        Commands::Completions(args) => postgen::cli::completions::run(args)?,
    }

    Ok(())
}
