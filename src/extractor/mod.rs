//! URL extraction pipeline for Picta media pages.
//!
//! An extractor turns a page URL into normalized metadata plus a ranked
//! list of stream variants. Extractors live in an ordered registry that
//! also follows redirects between them, which is how the embed URL shape
//! reuses the canonical resolution path.
//!
//! # Architecture
//!
//! - [`Extractor`] - Async trait that individual sources implement
//! - [`ExtractorRegistry`] - Ordered collection of extractors with redirect loop
//! - [`ExtractStep`] - Result of a single extractor's attempt
//! - [`PictaExtractor`] - Canonical `/medias/<slug>` and `/embed/<slug>` pages
//! - [`PictaEmbedExtractor`] - Numeric `www.<host>/embed/?v=<id>` alias
//!
//! # Example
//!
//! ```no_run
//! use picta_dl::extractor::{ExtractContext, ExtractorConfig, build_default_registry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_registry(&ExtractorConfig::default())?;
//! let media = registry
//!     .resolve_url("https://www.picta.cu/medias/orishas-everyday-2019-01-16-16-36-42-443003", &ExtractContext::default())
//!     .await?;
//! println!("{} has {} formats", media.id(), media.formats.len());
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod http_client;
mod metadata;
mod pattern;
mod picta;
mod registry;
mod timestamp;

pub use error::{ErrorKind, ExtractError};
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, FetchError, HttpJsonFetcher,
    HttpSettings, JsonFetcher, build_extractor_http_client,
};
pub use metadata::{FieldError, MediaMetadata, TitlePolicy, normalize};
pub use pattern::{MediaId, UrlPattern};
pub use picta::{PICTA_EMBED_KEY, PICTA_KEY, PictaEmbedExtractor, PictaExtractor};
pub use registry::ExtractorRegistry;
pub use timestamp::{unified_timestamp, upload_date};

use async_trait::async_trait;
use serde::Serialize;

use crate::format::{CodecPreference, FormatSelector, StreamVariant};

/// Host the extractors match when nothing else is configured.
pub const DEFAULT_HOST: &str = "picta.cu";
/// Base of the publication API; `publicacion/` is appended per request.
pub const DEFAULT_API_BASE_URL: &str = "https://api.picta.cu/api/v2/";
/// Redirect hops the registry follows before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 1;

/// Settings shared by all built-in extractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Site host the URL patterns accept, without scheme or `www.`.
    pub host: String,
    /// Publication API base, ending in `/`.
    pub api_base_url: String,
    pub codec_preference: CodecPreference,
    pub http: HttpSettings,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            codec_preference: CodecPreference::default(),
            http: HttpSettings::default(),
        }
    }
}

/// Builds the registry used by the CLI.
///
/// The embed alias is registered first: its URL shape is a subset of the
/// canonical one, and it must win so the redirect path is exercised.
///
/// # Errors
///
/// Returns [`ExtractError::Setup`] when an extractor cannot be constructed.
pub fn build_default_registry(config: &ExtractorConfig) -> Result<ExtractorRegistry, ExtractError> {
    let mut registry = ExtractorRegistry::new();
    registry.register(Box::new(PictaEmbedExtractor::new(&config.host)?));
    registry.register(Box::new(PictaExtractor::new(config)?));
    Ok(registry)
}

/// Fully resolved media: metadata plus variants ordered best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMedia {
    #[serde(flatten)]
    pub metadata: MediaMetadata,
    /// Never empty when produced by an extractor.
    pub formats: Vec<StreamVariant>,
}

impl ResolvedMedia {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Top-ranked variant.
    #[must_use]
    pub fn best(&self) -> Option<&StreamVariant> {
        self.formats.first()
    }

    /// Lowest-ranked variant.
    #[must_use]
    pub fn worst(&self) -> Option<&StreamVariant> {
        self.formats.last()
    }

    /// Applies `selector` to the ranked formats.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FormatNotAvailable`] when nothing matches.
    pub fn select(&self, selector: &FormatSelector) -> Result<&StreamVariant, ExtractError> {
        selector
            .select(&self.formats)
            .ok_or_else(|| ExtractError::format_not_available(self.id(), &selector.to_string()))
    }
}

/// Result of a single extractor's attempt.
#[derive(Debug, Clone)]
pub enum ExtractStep {
    /// Extraction finished.
    Resolved(Box<ResolvedMedia>),
    /// Resolve `url` again with the extractor registered as `extractor_key`.
    Redirect { url: String, extractor_key: String },
}

/// Context passed to extractors during resolution.
#[derive(Debug, Clone)]
pub struct ExtractContext {
    /// Maximum number of redirect hops allowed.
    pub max_redirects: usize,
}

impl ExtractContext {
    /// Creates a new context with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl Default for ExtractContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait that all extractors must implement.
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Box<dyn Extractor>` in the registry.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Stable key used for redirects and reporting (e.g. `picta`).
    fn key(&self) -> &str;

    /// Human-readable description of the source.
    fn description(&self) -> &str;

    fn pattern(&self) -> &UrlPattern;

    /// Extracts the media identifier when the URL belongs to this source.
    fn match_url(&self, url: &str) -> Option<MediaId> {
        self.pattern().match_id(url)
    }

    /// Returns true if this extractor accepts the URL.
    fn suitable(&self, url: &str) -> bool {
        self.pattern().is_match(url)
    }

    /// Runs extraction for a URL this extractor accepted.
    async fn extract(&self, url: &str, ctx: &ExtractContext) -> Result<ExtractStep, ExtractError>;
}
