//! Deterministic best-first ordering of stream variants.
//!
//! Keys, highest priority first:
//! 1. muxed audio+video over single-stream variants
//! 2. higher declared bitrate
//! 3. higher vertical resolution
//! 4. codec preference tier (video codec, then audio codec)
//! 5. manifest declaration order
//!
//! Ranking never drops a variant.

use std::cmp::Ordering;

use super::{StreamContent, StreamVariant};

/// Default codec preference, best first. Codecs match by prefix,
/// case-insensitively.
pub const DEFAULT_CODEC_PREFERENCE: &[&str] = &[
    "av01", "vp09", "vp9", "hev1", "hvc1", "avc1", "avc3", "vp8", "mp4v", "h263", "flac", "alac",
    "opus", "ec-3", "ac-3", "mp4a", "vorbis", "mp3",
];

/// Ordered list of codec prefixes used as the final ranking tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecPreference {
    prefixes: Vec<String>,
}

impl CodecPreference {
    /// Creates a preference from prefixes ordered best first.
    #[must_use]
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Parses a comma-separated list such as `"vp9, avc1, opus"`.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Returns the configured prefixes, best first.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Tier of a single codec string; lower is better, unknown codecs rank last.
    #[must_use]
    pub fn tier(&self, codec: Option<&str>) -> usize {
        let Some(codec) = codec.map(str::to_ascii_lowercase) else {
            return self.prefixes.len();
        };
        self.prefixes
            .iter()
            .position(|prefix| codec.starts_with(prefix.as_str()))
            .unwrap_or(self.prefixes.len())
    }

    fn variant_tier(&self, variant: &StreamVariant) -> (usize, usize) {
        (
            self.tier(variant.vcodec.as_deref()),
            self.tier(variant.acodec.as_deref()),
        )
    }
}

impl Default for CodecPreference {
    fn default() -> Self {
        Self::new(DEFAULT_CODEC_PREFERENCE)
    }
}

/// Orders `variants` best first.
///
/// Variants equal on every key keep their manifest declaration order,
/// whatever order they were passed in.
#[must_use]
pub fn rank_variants(
    mut variants: Vec<StreamVariant>,
    preference: &CodecPreference,
) -> Vec<StreamVariant> {
    variants.sort_by(|a, b| compare_variants(a, b, preference));
    variants
}

fn compare_variants(a: &StreamVariant, b: &StreamVariant, preference: &CodecPreference) -> Ordering {
    let muxed = |v: &StreamVariant| v.content == StreamContent::AudioVideo;

    muxed(b)
        .cmp(&muxed(a))
        .then_with(|| b.bitrate.cmp(&a.bitrate))
        .then_with(|| b.height.cmp(&a.height))
        .then_with(|| preference.variant_tier(a).cmp(&preference.variant_tier(b)))
        .then_with(|| a.order.cmp(&b.order))
}
