//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Find missing and unused translations in a component-based front-end project.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Project directory (defaults to the nearest ancestor with a package.json)
    #[arg(long, env = "INTL_ANALYZER_ROOT")]
    pub root: Option<PathBuf>,

    /// Remove unused translations from the catalog files
    #[arg(long)]
    pub fix: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
