//! # Cookbook
//!
//! Command-line browser for scraped Sulfur crafting recipes.
//!
//! Loads the recipes and ingredients documents, replays the command-line
//! filters through the browser state machine and prints one page of
//! grouped items as a table or JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod cli;
mod config;
mod loader;
mod render;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use cookbook_core::BrowserView;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::cli::Cli;
use crate::config::CookbookConfig;
use crate::loader::DataLoader;
use crate::render::JsonReport;

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable with --json
    let directive = if cli.verbose {
        "cookbook=debug"
    } else {
        "cookbook=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    debug!("Version: {}", env!("CARGO_PKG_VERSION"));
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(CookbookConfig::config_path);
    let mut config = CookbookConfig::load_from(&config_path);
    if let Some(path) = &cli.recipes {
        config.recipes_path.clone_from(path);
    }
    if let Some(path) = &cli.ingredients {
        config.ingredients_path.clone_from(path);
    }
    config.effect_scope = cli.effect_scope(config.effect_scope);
    config.validate();

    if cli.write_config {
        config
            .save_to(&config_path)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        return Ok(());
    }

    let images = config.images.to_table();
    let mut loader = DataLoader::new(&config.recipes_path, &config.ingredients_path);
    let catalog = loader.load_catalog(&images).with_context(|| {
        format!(
            "Failed to load {} / {}",
            loader.recipes_path().display(),
            loader.ingredients_path().display()
        )
    })?;

    debug!("Loader stats: {:?}", loader.stats());

    let state = cli.browser_state(config.effect_scope);
    let view = BrowserView::build(&catalog, &state, &config.view_options());
    info!(
        "{} of {} groups match, page {}/{}",
        view.total_results,
        catalog.groups().len(),
        view.page,
        view.total_pages
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let report = JsonReport {
            stats: catalog.stats(),
            state: &state,
            view: &view,
        };
        render::write_json(&mut out, &report)?;
    } else {
        render::write_table(&mut out, &view, state.sort())?;
        if cli.vocab {
            writeln!(out)?;
            render::write_vocabulary(&mut out, &view, &images)?;
        }
    }
    out.flush()?;

    Ok(())
}
