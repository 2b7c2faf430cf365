//! Picta extractors: canonical media pages and the numeric embed alias.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::format::{CodecPreference, rank_variants};
use crate::manifest::{DashManifestParser, ManifestParser, resolve_formats};

use super::http_client::{HttpJsonFetcher, JsonFetcher, build_extractor_http_client};
use super::metadata::{TitlePolicy, normalize};
use super::pattern::{MediaId, UrlPattern};
use super::{ExtractContext, ExtractError, ExtractStep, Extractor, ExtractorConfig, ResolvedMedia};

/// Registry key of [`PictaExtractor`].
pub const PICTA_KEY: &str = "picta";
/// Registry key of [`PictaEmbedExtractor`].
pub const PICTA_EMBED_KEY: &str = "picta:embed";

/// Resolves `/medias/<slug>` (and slug-style `/embed/`) pages through the
/// publication API and the DASH manifest it references.
pub struct PictaExtractor {
    pattern: UrlPattern,
    publication_endpoint: Url,
    fetcher: Arc<dyn JsonFetcher>,
    manifest_parser: Arc<dyn ManifestParser>,
    codec_preference: CodecPreference,
}

impl PictaExtractor {
    /// Creates the extractor with HTTP-backed collaborators sharing one client.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Setup`] if the URL pattern or the HTTP client
    /// cannot be built.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let client = build_extractor_http_client(PICTA_KEY, config.http)?;
        Self::with_collaborators(
            config,
            Arc::new(HttpJsonFetcher::new(client.clone())),
            Arc::new(DashManifestParser::with_client(client)),
        )
    }

    /// Creates the extractor with caller-supplied collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Setup`] if the URL pattern cannot be built or
    /// the API base is not an absolute http(s) URL.
    pub fn with_collaborators(
        config: &ExtractorConfig,
        fetcher: Arc<dyn JsonFetcher>,
        manifest_parser: Arc<dyn ManifestParser>,
    ) -> Result<Self, ExtractError> {
        let pattern = UrlPattern::canonical(&config.host)
            .map_err(|e| ExtractError::setup(PICTA_KEY, &e.to_string()))?;
        let publication_endpoint = publication_endpoint(&config.api_base_url)?;
        Ok(Self {
            pattern,
            publication_endpoint,
            fetcher,
            manifest_parser,
            codec_preference: config.codec_preference.clone(),
        })
    }

    /// Publication lookup URL for `id`.
    #[must_use]
    pub fn api_url(&self, id: &MediaId) -> String {
        format!(
            "{}?format=json&slug_url_raw={}",
            self.publication_endpoint,
            urlencoding::encode(id.as_str())
        )
    }

    /// Resolves a canonical URL into metadata and best-first formats.
    ///
    /// Steps run strictly in order: match, fetch document, normalize,
    /// resolve manifest, rank. Nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::NoExtractor`] if the URL does not match
    /// - [`ExtractError::Upstream`] if the document cannot be fetched
    /// - [`ExtractError::Metadata`] if the document has no title
    /// - [`ExtractError::Manifest`] if the referenced manifest fails
    /// - [`ExtractError::NoFormats`] if no variant was found
    #[tracing::instrument(skip(self), fields(extractor = PICTA_KEY))]
    pub async fn resolve_url(&self, url: &str) -> Result<ResolvedMedia, ExtractError> {
        let media_id = self
            .pattern
            .match_id(url)
            .ok_or_else(|| ExtractError::no_extractor(url))?;

        let api_url = self.api_url(&media_id);
        debug!(
            media_id = %media_id,
            numeric_id = media_id.is_numeric(),
            api_url = %api_url,
            "Downloading publication metadata"
        );
        let document = self
            .fetcher
            .fetch_json(&api_url)
            .await
            .map_err(|e| ExtractError::upstream(media_id.as_str(), e))?;

        let metadata = normalize(&document, &media_id, TitlePolicy::Required)
            .map_err(|e| ExtractError::metadata(media_id.as_str(), e))?;

        let variants = resolve_formats(
            self.manifest_parser.as_ref(),
            metadata.manifest_url.as_deref(),
            &metadata.id,
        )
        .await
        .map_err(|e| ExtractError::manifest(&metadata.id, e))?;

        if variants.is_empty() {
            return Err(ExtractError::no_formats(&metadata.id));
        }

        let formats = rank_variants(variants, &self.codec_preference);
        info!(
            id = %metadata.id,
            format_count = formats.len(),
            best = formats.first().map_or("", |f| f.format_id.as_str()),
            "Resolved media"
        );
        Ok(ResolvedMedia { metadata, formats })
    }
}

/// `<base>/publicacion/`, treating `base` as a directory.
fn publication_endpoint(api_base_url: &str) -> Result<Url, ExtractError> {
    let mut base = api_base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base).map_err(|e| {
        ExtractError::setup(PICTA_KEY, &format!("invalid API base URL '{base}': {e}"))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ExtractError::setup(
            PICTA_KEY,
            &format!("API base URL must use http or https, got '{}'", base.scheme()),
        ));
    }
    base.join("publicacion/")
        .map_err(|e| ExtractError::setup(PICTA_KEY, &e.to_string()))
}

impl std::fmt::Debug for PictaExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictaExtractor")
            .field("pattern", &self.pattern)
            .field("publication_endpoint", &self.publication_endpoint.as_str())
            .field("codec_preference", &self.codec_preference)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Extractor for PictaExtractor {
    fn key(&self) -> &str {
        PICTA_KEY
    }

    fn description(&self) -> &str {
        "Picta videos"
    }

    fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    async fn extract(&self, url: &str, _ctx: &ExtractContext) -> Result<ExtractStep, ExtractError> {
        self.resolve_url(url)
            .await
            .map(|media| ExtractStep::Resolved(Box::new(media)))
    }
}

/// Recognizes `www.<host>/embed/?v=<digits>` and hands the URL to
/// [`PictaExtractor`] without touching the network.
#[derive(Debug)]
pub struct PictaEmbedExtractor {
    pattern: UrlPattern,
}

impl PictaEmbedExtractor {
    /// # Errors
    ///
    /// Returns [`ExtractError::Setup`] if the URL pattern cannot be built.
    pub fn new(host: &str) -> Result<Self, ExtractError> {
        let pattern = UrlPattern::embed(host)
            .map_err(|e| ExtractError::setup(PICTA_EMBED_KEY, &e.to_string()))?;
        Ok(Self { pattern })
    }
}

#[async_trait]
impl Extractor for PictaEmbedExtractor {
    fn key(&self) -> &str {
        PICTA_EMBED_KEY
    }

    fn description(&self) -> &str {
        "Picta embedded videos"
    }

    fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    async fn extract(&self, url: &str, _ctx: &ExtractContext) -> Result<ExtractStep, ExtractError> {
        let media_id = self
            .match_url(url)
            .ok_or_else(|| ExtractError::no_extractor(url))?;
        debug!(media_id = %media_id, "Delegating embed URL to canonical extractor");
        Ok(ExtractStep::Redirect {
            url: url.to_string(),
            extractor_key: PICTA_KEY.to_string(),
        })
    }
}
