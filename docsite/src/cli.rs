//! Command-line interface definitions for docsite

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the toc command
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum TocFormat {
    /// Indented outline
    #[default]
    Text,
    /// The HTML panel embedded in built pages
    Html,
}

/// CLI structure for the docsite application
#[derive(Parser)]
#[command(name = "docsite")]
#[command(version)]
#[command(about = "Documentation site builder with a scroll-synced table of contents", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for docsite
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new site from the starter template
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// Site title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Build the site to static HTML
    Build {
        /// Site directory containing docsite.toml (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "site")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the table of contents of a Markdown file
    Toc {
        /// Markdown file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: TocFormat,

        /// Heading id to mark as active
        #[arg(short, long)]
        active: Option<String>,
    },

    /// Replay scroll positions and print the highlighted heading after each
    Simulate {
        /// Markdown file
        file: PathBuf,

        /// Scroll offsets in pixels, applied in order
        #[arg(short, long = "scroll", value_name = "Y", num_args = 1.., required = true, allow_negative_numbers = true)]
        scroll: Vec<f64>,

        /// Viewport height in pixels
        #[arg(long, default_value_t = 900.0)]
        viewport: f64,

        /// Vertical distance between consecutive headings in pixels
        #[arg(long, default_value_t = 400.0)]
        heading_spacing: f64,
    },
}
