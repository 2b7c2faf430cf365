//! Adaptive-streaming manifest resolution.
//!
//! [`resolve_formats`] decides whether a manifest is consulted at all and
//! hands the work to a [`ManifestParser`]. Parser failures propagate: an
//! attempted-but-failed manifest must never look like "no manifest".

mod dash;

pub use dash::{DashManifestParser, parse_mpd};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::format::StreamVariant;

/// Failures reading a manifest that was referenced by the document.
#[derive(Debug, Clone, Error)]
pub enum ManifestError {
    /// The manifest could not be downloaded
    #[error("cannot reach manifest {url}: {reason}")]
    Unreachable {
        /// Manifest URL
        url: String,
        /// Underlying client error text
        reason: String,
    },

    /// The manifest server answered with a non-success status
    #[error("HTTP {status} fetching manifest {url}")]
    HttpStatus {
        /// Manifest URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The manifest body is not a valid DASH document
    #[error("malformed manifest {url}: {reason}")]
    Malformed {
        /// Manifest URL
        url: String,
        /// Parser error text
        reason: String,
    },
}

/// Turns a manifest reference into one [`StreamVariant`] per representation.
#[async_trait]
pub trait ManifestParser: Send + Sync {
    /// Fetches and parses `manifest_url`; `media_id` is used for logging.
    async fn parse_manifest(
        &self,
        manifest_url: &str,
        media_id: &str,
    ) -> Result<Vec<StreamVariant>, ManifestError>;
}

/// Resolves the variants for an optional manifest reference.
///
/// Returns an empty list without touching the parser when
/// `manifest_url` is `None`.
///
/// # Errors
///
/// Propagates [`ManifestError`] from the parser unchanged.
pub async fn resolve_formats(
    parser: &dyn ManifestParser,
    manifest_url: Option<&str>,
    media_id: &str,
) -> Result<Vec<StreamVariant>, ManifestError> {
    let Some(manifest_url) = manifest_url else {
        debug!(media_id, "No manifest referenced; skipping format resolution");
        return Ok(Vec::new());
    };
    let variants = parser.parse_manifest(manifest_url, media_id).await?;
    debug!(media_id, count = variants.len(), "Resolved manifest variants");
    Ok(variants)
}
