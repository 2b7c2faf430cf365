//! Normalization of publication API documents into [`MediaMetadata`].
//!
//! Every publication field lives under `results[0]`. Only the title may be
//! required; all other fields are looked up tolerantly and become `None`
//! when missing, null, or mistyped.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::document::Lookup;
use super::pattern::MediaId;
use super::timestamp::{unified_timestamp, upload_date};

/// A required metadata field was absent after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is missing or null in the document
    #[error("missing required field \"{field}\"")]
    Missing {
        /// Normalized field name
        field: &'static str,
    },
}

impl FieldError {
    /// Creates a `Missing` error for `field`.
    #[must_use]
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }
}

/// Normalized description of one publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaMetadata {
    /// Display identifier: the document id, else the URL-derived id.
    pub id: String,
    /// Title; `None` only when normalization ran with the title optional.
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    /// Creation time in Unix seconds.
    pub timestamp: Option<i64>,
    /// `YYYYMMDD` in UTC, derived from `timestamp`.
    pub upload_date: Option<String>,
    pub thumbnail: Option<String>,
    /// Channel name wrapped as a single-element list.
    pub category: Option<Vec<String>>,
    /// Reference to the DASH manifest; not the formats themselves.
    pub manifest_url: Option<String>,
}

/// Whether normalization fails when the title is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePolicy {
    Required,
    Optional,
}

const RESULT_ROOT: &str = "results.0";

/// Builds [`MediaMetadata`] from a raw publication document.
///
/// # Errors
///
/// Returns [`FieldError::Missing`] when `title` is [`TitlePolicy::Required`]
/// and `results[0].nombre` is absent or null.
pub fn normalize(
    doc: &Value,
    fallback_id: &MediaId,
    title: TitlePolicy,
) -> Result<MediaMetadata, FieldError> {
    let result = Lookup::new(doc).path(RESULT_ROOT);

    let title_value = result.key("nombre").display_string();
    if title == TitlePolicy::Required && title_value.is_none() {
        return Err(FieldError::missing("title"));
    }

    let timestamp = result
        .key("fecha_creacion")
        .as_str()
        .and_then(unified_timestamp);

    Ok(MediaMetadata {
        id: result
            .key("id")
            .display_string()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| fallback_id.to_string()),
        title: title_value,
        description: result.key("descripcion").as_str().map(str::to_string),
        uploader: result.path("usuario.username").as_str().map(str::to_string),
        timestamp,
        upload_date: timestamp.and_then(upload_date),
        thumbnail: result.key("url_imagen").string(),
        category: result.path("canal.nombre").string().map(|name| vec![name]),
        manifest_url: result.key("url_manifiesto").string(),
    })
}
