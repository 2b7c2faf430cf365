//! Human-readable rendering of resolved media for stdout.

use std::fmt::Write;

use picta_dl::{ResolvedMedia, StreamVariant};

/// Renders the ranked format table printed by `--list-formats`.
pub fn format_table(media: &ResolvedMedia) -> String {
    let id_width = media
        .formats
        .iter()
        .map(|f| f.format_id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut out = String::new();
    let _ = writeln!(out, "[info] Available formats for {}:", media.id());
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<4}  {:<10}  {:>8}  {:<24}  NOTE",
        "ID", "EXT", "RESOLUTION", "BITRATE", "CODECS"
    );
    for variant in &media.formats {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<4}  {:<10}  {:>8}  {:<24}  {}",
            variant.format_id,
            variant.ext,
            variant.resolution_label(),
            bitrate_label(variant),
            codecs_label(variant),
            note_label(variant),
        );
    }
    out
}

/// Renders the default one-item summary with the selected format.
pub fn summary(media: &ResolvedMedia, selected: &StreamVariant) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {}",
        media.id(),
        media.metadata.title.as_deref().unwrap_or("<untitled>")
    );
    if let Some(uploader) = &media.metadata.uploader {
        let _ = writeln!(out, "  uploader: {uploader}");
    }
    if let Some(date) = &media.metadata.upload_date {
        let _ = writeln!(out, "  upload date: {date}");
    }
    let _ = writeln!(
        out,
        "  format: {} ({}, {}, {}, {})",
        selected.format_id,
        selected.ext,
        selected.resolution_label(),
        bitrate_label(selected),
        selected.content.label()
    );
    let _ = writeln!(out, "  manifest: {}", selected.manifest_url);
    out
}

fn bitrate_label(variant: &StreamVariant) -> String {
    variant
        .bitrate_kbps()
        .map_or_else(|| "-".to_string(), |kbps| format!("{kbps}k"))
}

fn codecs_label(variant: &StreamVariant) -> String {
    match (variant.vcodec.as_deref(), variant.acodec.as_deref()) {
        (Some(v), Some(a)) => format!("{v}, {a}"),
        (Some(v), None) => v.to_string(),
        (None, Some(a)) => a.to_string(),
        (None, None) => "unknown".to_string(),
    }
}

fn note_label(variant: &StreamVariant) -> String {
    match &variant.language {
        Some(lang) => format!("{} [{lang}]", variant.content.label()),
        None => variant.content.label().to_string(),
    }
}
