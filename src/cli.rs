//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use picta_dl::format::FormatSelector;

/// Resolve Picta media pages into metadata and ranked stream formats.
///
/// URLs are taken from the arguments, or one per line from piped stdin.
/// Nothing is downloaded; the selected format is printed for a downloader.
#[derive(Parser, Debug)]
#[command(name = "picta-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the resolved media as JSON
    #[arg(short = 'j', long)]
    pub dump_json: bool,

    /// List all available formats, best first
    #[arg(short = 'F', long, conflicts_with = "dump_json")]
    pub list_formats: bool,

    /// Format to select: best, worst, bestvideo, bestaudio, or a format id
    #[arg(short = 'f', long = "format", default_value = "best")]
    pub format: FormatSelector,

    /// Redirect hops allowed between extractors (1-5)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub max_redirects: Option<u8>,

    /// Load configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Media page URLs to resolve
    #[arg(value_name = "URLS")]
    pub urls: Vec<String>,
}
