//! Templates command implementation.

use clap::{Args, Subcommand};

use super::template_store;
use crate::config::Config;
use crate::error::{PostError, Result};
use crate::output::{plural, Printer};

/// List, show, delete or seed stored templates
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub action: TemplatesAction,
}

#[derive(Subcommand, Debug)]
pub enum TemplatesAction {
    /// List stored templates
    List,

    /// Print a template as JSON
    Show { name: String },

    /// Delete a stored template
    Delete { name: String },

    /// Write the built-in templates into the template directory
    CreateDefaults,
}

pub fn run(args: TemplatesArgs, config: &Config, printer: &Printer) -> Result<()> {
    let store = template_store(config)?;

    match args.action {
        TemplatesAction::List => {
            let mut names = store.list()?;
            names.sort();
            if names.is_empty() {
                printer.warning(
                    "Empty",
                    "no templates found; run `postgen templates create-defaults`",
                );
                return Ok(());
            }
            printer.info("Templates", &plural(names.len(), "template", "templates"));
            for name in &names {
                let detail = store
                    .load(name)
                    .map(|t| format!("{} {}", t.dimension, t.color_scheme))
                    .unwrap_or_else(|e| e.to_string());
                printer.item(name, Some(&detail));
            }
        }
        TemplatesAction::Show { name } => {
            let template = store.load(&name)?;
            let json = serde_json::to_string_pretty(&template).map_err(|e| PostError::Parse {
                message: e.to_string(),
                help: None,
            })?;
            println!("{}", json);
        }
        TemplatesAction::Delete { name } => {
            store.delete(&name)?;
            printer.status("Deleted", &name);
        }
        TemplatesAction::CreateDefaults => {
            let count = store.create_defaults()?;
            printer.status(
                "Created",
                &format!(
                    "{} in {}",
                    plural(count, "template", "templates"),
                    printer.path(store.dir())
                ),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            templates: dir.join("templates"),
            ..Config::default()
        }
    }

    #[test]
    fn test_create_then_delete() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let printer = Printer::plain();

        let run_action = |action| run(TemplatesArgs { action }, &config, &printer);
        run_action(TemplatesAction::CreateDefaults).unwrap();
        run_action(TemplatesAction::List).unwrap();
        run_action(TemplatesAction::Show {
            name: "dark_geometric".to_string(),
        })
        .unwrap();
        run_action(TemplatesAction::Delete {
            name: "dark_geometric".to_string(),
        })
        .unwrap();

        assert!(matches!(
            run_action(TemplatesAction::Show {
                name: "dark_geometric".to_string()
            }),
            Err(PostError::TemplateNotFound { .. })
        ));
    }
}
