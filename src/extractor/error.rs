//! Error types for extractor operations.
//!
//! This module defines structured errors for media resolution,
//! following the What/Why/Fix pattern used across the project.

use thiserror::Error;

use crate::manifest::ManifestError;

use super::http_client::FetchError;
use super::metadata::FieldError;

/// Coarse classification of an [`ExtractError`].
///
/// Hosts use this to decide how to report a failure without matching on
/// every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The URL does not belong to any registered source.
    NoMatch,
    /// The upstream publication API could not be queried.
    Upstream,
    /// The publication document lacks a required field.
    Metadata,
    /// The stream manifest was referenced but could not be used.
    Manifest,
    /// Metadata resolved but nothing downloadable was found.
    NoFormats,
    /// Redirect chain between sources could not be followed.
    Redirect,
    /// A requested format selector matched no variant.
    Selection,
    /// The extractor could not be constructed.
    Setup,
}

/// Errors that can occur while resolving a media URL.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// Extractor construction failed (HTTP client, URL pattern)
    #[error("cannot initialize extractor '{extractor}': {reason}")]
    Setup {
        /// The extractor being constructed
        extractor: String,
        /// Why construction failed
        reason: String,
    },

    /// No registered extractor accepts the URL
    #[error("no extractor found for '{url}'\n  Suggestion: Check that the URL is a Picta media or embed page")]
    NoExtractor {
        /// The URL that no extractor matched
        url: String,
    },

    /// A redirect named an extractor key that is not registered
    #[error("unknown extractor '{key}' requested while resolving '{url}'")]
    UnknownExtractor {
        /// The requested extractor key
        key: String,
        /// The URL being redirected
        url: String,
    },

    /// Too many redirects between extractors
    #[error(
        "too many redirects ({count}) resolving '{url}'\n  Suggestion: Check for circular extractor redirects"
    )]
    TooManyRedirects {
        /// The original URL being resolved
        url: String,
        /// Number of redirects encountered
        count: usize,
    },

    /// The publication document could not be fetched
    #[error("cannot download metadata for '{id}': {source}\n  Suggestion: {suggestion}")]
    Upstream {
        /// Media identifier being resolved
        id: String,
        /// Underlying transport failure
        #[source]
        source: FetchError,
        /// How to fix the issue
        suggestion: String,
    },

    /// The publication document is missing a required field
    #[error("invalid metadata for '{id}': {source}")]
    Metadata {
        /// Media identifier being resolved
        id: String,
        /// Underlying field failure
        #[source]
        source: FieldError,
    },

    /// The stream manifest could not be fetched or parsed
    #[error("cannot read stream manifest for '{id}': {source}")]
    Manifest {
        /// Media identifier being resolved
        id: String,
        /// Underlying manifest failure
        #[source]
        source: ManifestError,
    },

    /// No stream variants were found for an otherwise valid document
    #[error("cannot find video formats for '{id}'\n  Suggestion: The publication may be private or still processing")]
    NoFormats {
        /// Media identifier being resolved
        id: String,
    },

    /// The requested format is not among the resolved variants
    #[error("requested format '{selector}' is not available for '{id}'\n  Suggestion: Use --list-formats to see available formats")]
    FormatNotAvailable {
        /// Media identifier
        id: String,
        /// The selector that matched nothing
        selector: String,
    },
}

impl ExtractError {
    /// Creates a `Setup` error.
    #[must_use]
    pub fn setup(extractor: &str, reason: &str) -> Self {
        Self::Setup {
            extractor: extractor.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `NoExtractor` error.
    #[must_use]
    pub fn no_extractor(url: &str) -> Self {
        Self::NoExtractor {
            url: url.to_string(),
        }
    }

    /// Creates an `UnknownExtractor` error.
    #[must_use]
    pub fn unknown_extractor(key: &str, url: &str) -> Self {
        Self::UnknownExtractor {
            key: key.to_string(),
            url: url.to_string(),
        }
    }

    /// Creates a `TooManyRedirects` error.
    #[must_use]
    pub fn too_many_redirects(url: &str, count: usize) -> Self {
        Self::TooManyRedirects {
            url: url.to_string(),
            count,
        }
    }

    /// Creates an `Upstream` error with a suggestion derived from the failure.
    #[must_use]
    pub fn upstream(id: &str, source: FetchError) -> Self {
        let suggestion = match &source {
            FetchError::HttpStatus { status: 404, .. } => {
                "The publication does not exist; check the URL".to_string()
            }
            FetchError::HttpStatus { status, .. } if *status >= 500 => {
                "The Picta API is unavailable. Try again later.".to_string()
            }
            FetchError::InvalidJson { .. } => {
                "The API answered with an unexpected format".to_string()
            }
            _ => "Check your network connection and try again".to_string(),
        };
        Self::Upstream {
            id: id.to_string(),
            source,
            suggestion,
        }
    }

    /// Creates a `Metadata` error.
    #[must_use]
    pub fn metadata(id: &str, source: FieldError) -> Self {
        Self::Metadata {
            id: id.to_string(),
            source,
        }
    }

    /// Creates a `Manifest` error.
    #[must_use]
    pub fn manifest(id: &str, source: ManifestError) -> Self {
        Self::Manifest {
            id: id.to_string(),
            source,
        }
    }

    /// Creates a `NoFormats` error.
    #[must_use]
    pub fn no_formats(id: &str) -> Self {
        Self::NoFormats { id: id.to_string() }
    }

    /// Creates a `FormatNotAvailable` error.
    #[must_use]
    pub fn format_not_available(id: &str, selector: &str) -> Self {
        Self::FormatNotAvailable {
            id: id.to_string(),
            selector: selector.to_string(),
        }
    }

    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Setup { .. } => ErrorKind::Setup,
            Self::NoExtractor { .. } => ErrorKind::NoMatch,
            Self::UnknownExtractor { .. } | Self::TooManyRedirects { .. } => ErrorKind::Redirect,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Metadata { .. } => ErrorKind::Metadata,
            Self::Manifest { .. } => ErrorKind::Manifest,
            Self::NoFormats { .. } => ErrorKind::NoFormats,
            Self::FormatNotAvailable { .. } => ErrorKind::Selection,
        }
    }
}
