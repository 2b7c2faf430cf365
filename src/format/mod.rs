//! Stream variants and their ordering.
//!
//! - [`StreamVariant`] - one downloadable rendition declared by a manifest
//! - [`rank_variants`] - deterministic best-first ordering
//! - [`FormatSelector`] - `best` / `worst` / `bestvideo` / `bestaudio` / explicit id

mod rank;
mod select;

pub use rank::{CodecPreference, DEFAULT_CODEC_PREFERENCE, rank_variants};
pub use select::FormatSelector;

use serde::Serialize;

/// Which elementary streams a variant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamContent {
    AudioVideo,
    VideoOnly,
    AudioOnly,
    /// The manifest gave no codec or content type information.
    Unknown,
}

impl StreamContent {
    /// Derives content from the presence of each codec kind.
    #[must_use]
    pub fn from_presence(has_video: bool, has_audio: bool) -> Self {
        match (has_video, has_audio) {
            (true, true) => Self::AudioVideo,
            (true, false) => Self::VideoOnly,
            (false, true) => Self::AudioOnly,
            (false, false) => Self::Unknown,
        }
    }

    /// Short label used in format listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::AudioVideo => "audio+video",
            Self::VideoOnly => "video only",
            Self::AudioOnly => "audio only",
            Self::Unknown => "unknown",
        }
    }
}

/// One concrete encoded rendition referenced by a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamVariant {
    /// Selector token handed to the download stage.
    pub format_id: String,
    /// Manifest that declared this variant; the download stage fetches
    /// segments through it using `format_id`.
    pub manifest_url: String,
    /// Container extension (`mp4`, `webm`, `m4a`, ...).
    pub ext: String,
    pub mime_type: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub content: StreamContent,
    /// Declared bandwidth in bits per second.
    pub bitrate: Option<u64>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub language: Option<String>,
    /// Position in manifest declaration order.
    pub order: usize,
}

impl StreamVariant {
    /// Bitrate in kbit/s, rounded down.
    #[must_use]
    pub fn bitrate_kbps(&self) -> Option<u64> {
        self.bitrate.map(|bps| bps / 1000)
    }

    /// `WIDTHxHEIGHT`, `HEIGHTp`, or `audio only` for display.
    #[must_use]
    pub fn resolution_label(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            (None, Some(h)) => format!("{h}p"),
            _ if self.content == StreamContent::AudioOnly => "audio only".to_string(),
            _ => "unknown".to_string(),
        }
    }
}

/// Maps a MIME type to the container extension used for output files.
#[must_use]
pub fn mime_to_ext(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match essence.as_str() {
        "video/mp4" => Some("mp4"),
        "audio/mp4" => Some("m4a"),
        "video/webm" | "audio/webm" => Some("webm"),
        "video/x-matroska" => Some("mkv"),
        "audio/mpeg" => Some("mp3"),
        "audio/ogg" => Some("ogg"),
        "video/mp2t" => Some("ts"),
        "text/vtt" => Some("vtt"),
        _ => None,
    }
}
