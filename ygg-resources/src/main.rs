//! ygg-resources - Yggdrasil public resource catalog
//!
//! A CLI tool that extracts public peers, services and Tor bridges from the
//! Yggdrasil website's services document and prints them as JSON.

#![deny(unsafe_code)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use ygg_resources::acquire::{acquire_or_empty, DocumentSource, FileSource, GitSource};
use ygg_resources::catalog::parse_with_diagnostics;
use ygg_resources::presenter::{present, Destination};
use ygg_resources::settings::{Settings, SettingsFile};

/// Main entry point for the ygg-resources CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let settings = resolve_settings(&cli)?;
    log::debug!("Settings: {:?}", settings);
    if !settings.filter.is_empty() {
        log::debug!(
            "Filter '{}' is recorded but not applied to the resource tree",
            settings.filter
        );
    }

    // Stage 1: Acquire the document (best effort)
    let source = document_source(&settings);
    let lines = acquire_or_empty(source.as_ref());

    // Stage 2: Parse it into a resource tree
    let (tree, diagnostics) = parse_with_diagnostics(&lines);
    log::info!(
        "Found {} categories and {} Tor bridges",
        tree.len(),
        diagnostics.entries
    );

    // Stage 3: Present the result
    let destination = Destination::from_export_path(settings.export_json.as_deref());
    present(&tree, &destination).with_context(|| match &destination {
        Destination::File(path) => format!("Failed to export JSON to {}", path.display()),
        Destination::Stdout => "Failed to print JSON".to_string(),
    })?;

    Ok(())
}

/// Initialize logging: debug with `-v`, info otherwise; `RUST_LOG` refines it
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Combine the optional settings file with command-line overrides
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let from_file = match &cli.config {
        Some(path) => SettingsFile::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => SettingsFile::default(),
    };
    Ok(from_file.merge(cli.overrides()).into())
}

/// Local file when one is configured, otherwise a shallow git clone
fn document_source(settings: &Settings) -> Box<dyn DocumentSource> {
    match &settings.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(GitSource::new(
            settings.repository.clone(),
            settings.document.clone(),
        )),
    }
}
