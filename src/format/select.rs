//! Format selection over a best-first variant list.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::{StreamContent, StreamVariant};

/// Policy for picking one variant out of a ranked list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormatSelector {
    /// First variant in ranking order.
    #[default]
    Best,
    /// Last variant in ranking order.
    Worst,
    /// Best variant carrying video and no audio.
    BestVideo,
    /// Best variant carrying audio and no video.
    BestAudio,
    /// Variant with this exact `format_id`.
    Id(String),
}

impl FormatSelector {
    /// Picks from `ranked`, which must already be ordered best first.
    #[must_use]
    pub fn select<'a>(&self, ranked: &'a [StreamVariant]) -> Option<&'a StreamVariant> {
        match self {
            Self::Best => ranked.first(),
            Self::Worst => ranked.last(),
            Self::BestVideo => ranked.iter().find(|v| v.content == StreamContent::VideoOnly),
            Self::BestAudio => ranked.iter().find(|v| v.content == StreamContent::AudioOnly),
            Self::Id(id) => ranked.iter().find(|v| v.format_id == *id),
        }
    }
}

impl FromStr for FormatSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "best" => Self::Best,
            "worst" => Self::Worst,
            "bestvideo" => Self::BestVideo,
            "bestaudio" => Self::BestAudio,
            other => Self::Id(other.to_string()),
        })
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Best => f.write_str("best"),
            Self::Worst => f.write_str("worst"),
            Self::BestVideo => f.write_str("bestvideo"),
            Self::BestAudio => f.write_str("bestaudio"),
            Self::Id(id) => f.write_str(id),
        }
    }
}
