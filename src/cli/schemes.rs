//! Schemes command implementation.

use clap::Args;

use crate::error::Result;
use crate::output::{plural, Printer};
use crate::types::{all_schemes, get_scheme, ColorScheme};

/// List color schemes or show one
#[derive(Args, Debug)]
pub struct SchemesArgs {
    /// Scheme to show (lists all when omitted)
    pub name: Option<String>,
}

pub fn run(args: SchemesArgs, printer: &Printer) -> Result<()> {
    match args.name {
        Some(name) => {
            let scheme = get_scheme(&name)?;
            printer.info("Scheme", &printer.bold(scheme.name));
            for (role, hex) in roles(scheme) {
                printer.item(role, Some(hex));
            }
        }
        None => {
            let schemes = all_schemes();
            printer.info("Schemes", &plural(schemes.len(), "scheme", "schemes"));
            for scheme in schemes {
                let detail = format!("{} -> {}", scheme.primary, scheme.secondary);
                printer.item(scheme.name, Some(&detail));
            }
        }
    }
    Ok(())
}

fn roles(scheme: &ColorScheme) -> [(&'static str, &'static str); 5] {
    [
        ("primary", scheme.primary),
        ("secondary", scheme.secondary),
        ("accent", scheme.accent),
        ("text", scheme.text),
        ("background", scheme.background),
    ]
}
