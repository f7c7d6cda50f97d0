//! docsite - documentation site builder
//!
//! A CLI tool for building static documentation sites from Markdown with a
//! table of contents that follows the reader's scroll position.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, TocFormat};
use docsite::layout::DocumentLayout;
use docsite::observer::{LayoutObserver, ObserverOptions};
use docsite::{pipeline, templates, ScrollSyncState, ScrollSyncTracker, SectionRegistry, TocPanel};
use std::path::{Path, PathBuf};

/// Height given to every heading box in `simulate`
const SIMULATED_HEADING_HEIGHT: f64 = 32.0;

/// Main entry point for the docsite CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force, title } => {
            handle_init_command(path, force, title)?;
        }

        Commands::Build {
            input,
            output,
            verbose,
        } => {
            handle_build_command(&input, &output, verbose)?;
        }

        Commands::Toc {
            file,
            format,
            active,
        } => {
            handle_toc_command(&file, format, active.as_deref())?;
        }

        Commands::Simulate {
            file,
            scroll,
            viewport,
            heading_spacing,
        } => {
            handle_simulate_command(&file, &scroll, viewport, heading_spacing)?;
        }
    }

    Ok(())
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, force: bool, title: Option<String>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    println!("Initializing documentation site");
    println!("Target path: {}", target_path.display());
    if let Some(ref title_text) = title {
        println!("Title: {}", title_text);
    }

    let written = templates::write_starter(&target_path, force, title.as_deref())
        .with_context(|| format!("Failed to initialize {}", target_path.display()))?;

    println!("\n✓ Wrote {} files", written.len());
    println!("\nNext steps:");
    println!("  1. Edit docsite.toml to configure navigation");
    println!("  2. Write your pages in the content/ directory");
    println!("  3. Run 'docsite build' to generate the site");

    Ok(())
}

/// Handle the build command
fn handle_build_command(input: &Path, output: &Path, verbose: bool) -> Result<()> {
    // Initialize logging if verbose
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    println!("Building documentation site...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    println!("\n[Stage 1/3] Loading pages...");
    let site = pipeline::load_site(input)
        .with_context(|| format!("Failed to load site from {}", input.display()))?;
    println!("✓ Loaded {} pages", site.pages.len());

    println!("\n[Stage 2/3] Checking headings and links...");
    let diagnostics = pipeline::check_site(&site);
    for diagnostic in &diagnostics {
        log::warn!("{}", diagnostic);
        println!("  warning: {}", diagnostic);
    }
    println!("✓ {} warnings", diagnostics.len());

    println!("\n[Stage 3/3] Writing HTML...");
    let written = docsite::export::export_site(&site, output)
        .with_context(|| format!("Failed to write site to {}", output.display()))?;
    if verbose {
        for path in &written {
            println!("  - {}", path.display());
        }
    }
    println!("✓ Wrote {} pages", written.len());

    println!("\n✓ Build completed successfully!");
    Ok(())
}

/// Handle the toc command
fn handle_toc_command(file: &Path, format: TocFormat, active: Option<&str>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let registry = SectionRegistry::from_document(&content);
    let state = active.map_or_else(ScrollSyncState::empty, |id| {
        ScrollSyncState::empty().on_intersect(id)
    });
    let panel = TocPanel::new(&registry, &state);

    match format {
        TocFormat::Text => print!("{}", panel.render_text()),
        TocFormat::Html => print!("{}", panel.render_html()),
    }

    Ok(())
}

/// Handle the simulate command
///
/// Headings are laid out `heading_spacing` pixels apart, starting one spacing
/// below the top of the document.
fn handle_simulate_command(
    file: &Path,
    scroll: &[f64],
    viewport: f64,
    heading_spacing: f64,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let registry = SectionRegistry::from_document(&content);
    let layout = DocumentLayout::uniform(
        registry.iter().map(|h| h.id.clone()),
        heading_spacing,
        heading_spacing,
        SIMULATED_HEADING_HEIGHT,
    );
    let observer = LayoutObserver::new(layout.clone(), viewport, ObserverOptions::default());
    let mut tracker = ScrollSyncTracker::mount(&registry, observer, &layout);
    tracker.poll();

    println!("{:>10}  {:<24}  active", "scroll", "band");
    for &y in scroll {
        tracker.observer_mut().scroll_to(y);
        tracker.poll();

        let band = tracker.observer().band();
        let active = if tracker.active_id().is_empty() {
            "(none)"
        } else {
            tracker.active_id()
        };
        println!(
            "{:>10}  {:<24}  {}",
            y,
            format!("{}..{}", band.top, band.bottom),
            active
        );
    }

    Ok(())
}
