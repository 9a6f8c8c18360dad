//! Serve command implementation.

use clap::Args;

use super::{template_store, typography};
use crate::config::Config;
use crate::error::Result;
use crate::output::Printer;
use crate::server::{self, AppState};

/// Run the HTTP API
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (default: server.addr from the config)
    #[arg(long)]
    pub addr: Option<String>,
}

pub fn run(args: ServeArgs, config: &Config, printer: &Printer) -> Result<()> {
    let addr = args.addr.unwrap_or_else(|| config.server.addr.clone());
    let state = AppState::new(typography(config), template_store(config)?);

    let runtime = tokio::runtime::Runtime::new()?;

    printer.status("Serving", &format!("http://{}", addr));
    runtime.block_on(server::serve(&addr, state))
}
