//! MPEG-DASH manifest parsing.

use async_trait::async_trait;
use dash_mpd::{AdaptationSet, MPD, Representation};
use reqwest::Client;
use tracing::{debug, warn};

use crate::extractor::{ExtractError, HttpSettings, build_extractor_http_client};
use crate::format::{StreamContent, StreamVariant, mime_to_ext};

use super::{ManifestError, ManifestParser};

const VIDEO_CODECS: &[&str] = &[
    "avc1", "avc2", "avc3", "avc4", "vp9", "vp09", "vp8", "hev1", "hev2", "hvc1", "h263", "h264",
    "mp4v", "av01", "theora", "dvh1", "dvhe",
];

const AUDIO_CODECS: &[&str] = &[
    "mp4a", "opus", "vorbis", "mp3", "aac", "ac-3", "ec-3", "eac3", "dtsc", "dtse", "dtsh", "dtsl",
    "flac", "alac",
];

/// [`ManifestParser`] for DASH MPD documents fetched over HTTP.
#[derive(Debug, Clone)]
pub struct DashManifestParser {
    client: Client,
}

impl DashManifestParser {
    /// Creates a parser with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Setup`] when client construction fails.
    pub fn new(settings: HttpSettings) -> Result<Self, ExtractError> {
        Ok(Self {
            client: build_extractor_http_client("dash", settings)?,
        })
    }

    /// Creates a parser that shares an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ManifestParser for DashManifestParser {
    #[tracing::instrument(skip(self), fields(manifest_url = %manifest_url))]
    async fn parse_manifest(
        &self,
        manifest_url: &str,
        media_id: &str,
    ) -> Result<Vec<StreamVariant>, ManifestError> {
        debug!("Downloading MPD manifest");
        let response = self.client.get(manifest_url).send().await.map_err(|e| {
            warn!(error = %e, "Manifest request failed");
            ManifestError::Unreachable {
                url: manifest_url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::HttpStatus {
                url: manifest_url.to_string(),
                status: status.as_u16(),
            });
        }

        let xml = response
            .text()
            .await
            .map_err(|e| ManifestError::Unreachable {
                url: manifest_url.to_string(),
                reason: e.to_string(),
            })?;

        parse_mpd(&xml, manifest_url)
    }
}

/// Parses MPD text into one variant per audio or video representation.
///
/// Text and image adaptation sets are skipped. Variants are numbered in
/// declaration order across all periods.
///
/// # Errors
///
/// Returns [`ManifestError::Malformed`] when the XML does not parse.
pub fn parse_mpd(xml: &str, manifest_url: &str) -> Result<Vec<StreamVariant>, ManifestError> {
    let mpd: MPD = dash_mpd::parse(xml).map_err(|e| ManifestError::Malformed {
        url: manifest_url.to_string(),
        reason: e.to_string(),
    })?;

    let mut variants = Vec::new();
    for period in &mpd.periods {
        for adaptation in &period.adaptations {
            for representation in &adaptation.representations {
                let order = variants.len();
                if let Some(variant) =
                    build_variant(adaptation, representation, manifest_url, order)
                {
                    variants.push(variant);
                }
            }
        }
    }
    Ok(variants)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackKind {
    Video,
    Audio,
    Text,
    Unspecified,
}

impl TrackKind {
    fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "audio" => Self::Audio,
            "text" | "image" | "application" => Self::Text,
            _ => Self::Unspecified,
        }
    }
}

fn build_variant(
    adaptation: &AdaptationSet,
    representation: &Representation,
    manifest_url: &str,
    order: usize,
) -> Option<StreamVariant> {
    let mime_type = representation
        .mimeType
        .clone()
        .or_else(|| adaptation.mimeType.clone());
    let kind = adaptation
        .contentType
        .as_deref()
        .map(TrackKind::from_label)
        .filter(|k| *k != TrackKind::Unspecified)
        .or_else(|| {
            mime_type
                .as_deref()
                .and_then(|m| m.split('/').next())
                .map(TrackKind::from_label)
        })
        .unwrap_or(TrackKind::Unspecified);

    if kind == TrackKind::Text {
        return None;
    }

    let codecs = representation
        .codecs
        .as_deref()
        .or(adaptation.codecs.as_deref())
        .filter(|c| !c.trim().is_empty());

    let (mut vcodec, mut acodec) = codecs.map(split_codecs).unwrap_or_default();
    if vcodec.is_none()
        && acodec.is_none()
        && let Some(codec) = codecs
    {
        match kind {
            TrackKind::Video => vcodec = Some(codec.trim().to_string()),
            TrackKind::Audio => acodec = Some(codec.trim().to_string()),
            TrackKind::Text | TrackKind::Unspecified => {}
        }
    }

    let content = if codecs.is_some() {
        StreamContent::from_presence(vcodec.is_some(), acodec.is_some())
    } else {
        StreamContent::from_presence(kind == TrackKind::Video, kind == TrackKind::Audio)
    };

    let ext = mime_type
        .as_deref()
        .and_then(mime_to_ext)
        .unwrap_or("mp4")
        .to_string();

    Some(StreamVariant {
        format_id: representation
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("dash-{order}")),
        manifest_url: manifest_url.to_string(),
        ext,
        mime_type,
        vcodec,
        acodec,
        content,
        bitrate: representation.bandwidth,
        width: representation.width,
        height: representation.height,
        language: adaptation.lang.clone().filter(|l| l != "und"),
        order,
    })
}

/// Splits an RFC 6381 `codecs` list into its video and audio members.
fn split_codecs(codecs: &str) -> (Option<String>, Option<String>) {
    let mut vcodec = None;
    let mut acodec = None;
    for codec in codecs.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let family = codec.split('.').next().unwrap_or(codec).to_ascii_lowercase();
        if vcodec.is_none() && VIDEO_CODECS.contains(&family.as_str()) {
            vcodec = Some(codec.to_string());
        } else if acodec.is_none() && AUDIO_CODECS.contains(&family.as_str()) {
            acodec = Some(codec.to_string());
        }
    }
    (vcodec, acodec)
}
