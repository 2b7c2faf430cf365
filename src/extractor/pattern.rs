//! URL shape matching and media identifier extraction.
//!
//! Each extractor owns one [`UrlPattern`]. Scheme and host compare
//! case-insensitively; path segments and the identifier token are
//! case-sensitive.

use std::fmt;

use regex::Regex;
use serde::Serialize;

/// A non-empty media identifier drawn from `[0-9a-z-]`.
///
/// Two forms exist: the human-readable slug of canonical URLs and the
/// numeric id used by embed URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Validates `value` and wraps it; returns `None` for empty or
    /// out-of-class input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || c == '-');
        valid.then_some(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the numeric form used by embed URLs.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.0.chars().all(|c| c.is_ascii_digit())
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MediaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A compiled URL shape with a named `id` capture.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    regex: Regex,
}

impl UrlPattern {
    /// Canonical shape: `scheme://[www.]<host>/(medias|embed)/(?v=)?<slug-or-digits>`.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the host makes the pattern exceed regex limits.
    pub fn canonical(host: &str) -> Result<Self, regex::Error> {
        Self::from_regex(&format!(
            r"^(?i:https?://(?:www\.)?{})/(?:medias|embed)/(?:\?v=)?(?P<id>[\da-z-]+)(?:[/?#&.]|$)",
            regex::escape(host)
        ))
    }

    /// Alias shape: `scheme://www.<host>/embed/(?v=)?<digits>`.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the host makes the pattern exceed regex limits.
    pub fn embed(host: &str) -> Result<Self, regex::Error> {
        Self::from_regex(&format!(
            r"^(?i:https?://www\.{})/embed/(?:\?v=)?(?P<id>[0-9]+)(?:[/?#&.]|$)",
            regex::escape(host)
        ))
    }

    fn from_regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Extracts the media identifier, or `None` when the URL has another shape.
    #[must_use]
    pub fn match_id(&self, url: &str) -> Option<MediaId> {
        self.regex
            .captures(url.trim())
            .and_then(|caps| caps.name("id"))
            .and_then(|m| MediaId::new(m.as_str()))
    }

    /// Returns true if the URL has this shape.
    #[must_use]
    pub fn is_match(&self, url: &str) -> bool {
        self.match_id(url).is_some()
    }

    /// Returns the underlying regular expression source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
