//! CLI entry point for picta-dl.

use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use picta_dl::extractor::{DEFAULT_MAX_REDIRECTS, ExtractContext, ExtractorConfig};
use picta_dl::{ExtractorRegistry, build_default_registry};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod output;

use app_config::VerbositySetting;
use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Config is read before tracing starts because it may set the verbosity.
    let loaded = app_config::load_config(args.config.as_deref());
    let file_verbosity = loaded
        .as_ref()
        .ok()
        .and_then(|l| l.config.as_ref())
        .and_then(|c| c.verbosity);

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match (args.verbose, file_verbosity) {
            (0, Some(VerbositySetting::Quiet)) => "error",
            (0, Some(VerbositySetting::Verbose | VerbositySetting::Debug)) | (1, _) => "debug",
            (0, _) => "info",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries results only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let loaded = loaded?;
    let mut extractor_config = ExtractorConfig::default();
    let mut max_redirects = DEFAULT_MAX_REDIRECTS;
    match &loaded.config {
        Some(file) => {
            debug!(
                path = ?loaded.path,
                verbosity = file.verbosity.map(VerbositySetting::as_str),
                "Loaded config file"
            );
            file.apply_to(&mut extractor_config);
            if let Some(n) = file.max_redirects {
                max_redirects = n;
            }
        }
        None => debug!(path = ?loaded.path, "No config file; using defaults"),
    }
    if let Some(n) = args.max_redirects {
        max_redirects = usize::from(n);
    }
    let ctx = ExtractContext { max_redirects };

    let urls = read_input_urls(&args.urls)?;
    if urls.is_empty() {
        info!("No input provided. Pipe URLs via stdin or pass as arguments.");
        info!("Example: picta-dl https://www.picta.cu/medias/<slug>");
        return Ok(ExitCode::SUCCESS);
    }

    let registry = build_default_registry(&extractor_config)
        .context("Failed to initialize extractors")?;
    debug!(?registry, ?ctx, "Extractor registry ready");

    let failed = run_batch(&registry, &ctx, &args, &urls).await?;

    info!(
        total = urls.len(),
        failed,
        succeeded = urls.len() - failed,
        "Resolution complete"
    );

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Resolves every URL in order; returns how many failed.
async fn run_batch(
    registry: &ExtractorRegistry,
    ctx: &ExtractContext,
    args: &Args,
    urls: &[String],
) -> Result<usize> {
    let mut failed = 0;
    for url in urls {
        let media = match registry.resolve_url(url, ctx).await {
            Ok(media) => media,
            Err(err) => {
                warn!(url = %url, kind = ?err.kind(), "Resolution failed");
                eprintln!("ERROR: {url}: {err}");
                failed += 1;
                continue;
            }
        };

        if args.dump_json {
            let json = serde_json::to_string(&media).context("Failed to serialize media")?;
            println!("{json}");
        } else if args.list_formats {
            print!("{}", output::format_table(&media));
        } else {
            match media.select(&args.format) {
                Ok(selected) => print!("{}", output::summary(&media, selected)),
                Err(err) => {
                    eprintln!("ERROR: {url}: {err}");
                    failed += 1;
                }
            }
        }
    }
    Ok(failed)
}

/// Collects URLs from arguments, else from piped stdin.
///
/// Blank lines and `#` comments are skipped.
fn read_input_urls(arg_urls: &[String]) -> Result<Vec<String>> {
    let input_text = if !arg_urls.is_empty() {
        arg_urls.join("\n")
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read URLs from stdin")?;
        buffer
    } else {
        String::new()
    };

    Ok(input_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
