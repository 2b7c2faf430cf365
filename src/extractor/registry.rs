//! Extractor registry with redirect-following resolution loop.
//!
//! The [`ExtractorRegistry`] keeps extractors in registration order. The
//! first suitable extractor handles a URL; a [`ExtractStep::Redirect`] hands
//! the URL to the extractor registered under the named key.

use tracing::{debug, info};

use super::{ExtractContext, ExtractError, ExtractStep, Extractor, ResolvedMedia};

/// An ordered collection of extractors.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Registers an extractor after all previously registered ones.
    #[tracing::instrument(skip(self, extractor), fields(extractor_key))]
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        tracing::Span::current().record("extractor_key", extractor.key());
        debug!(
            key = extractor.key(),
            pattern = extractor.pattern().as_str(),
            "Registering extractor"
        );
        self.extractors.push(extractor);
    }

    /// Returns the number of registered extractors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Returns true if no extractors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Iterates extractors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Extractor> {
        self.extractors.iter().map(AsRef::as_ref)
    }

    /// Returns the first registered extractor that accepts `url`.
    #[must_use]
    pub fn find_handler(&self, url: &str) -> Option<&dyn Extractor> {
        self.iter().find(|e| e.suitable(url))
    }

    /// Returns the extractor registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Extractor> {
        self.iter().find(|e| e.key() == key)
    }

    /// Resolves `url` to media, following redirects between extractors.
    ///
    /// Extractor errors are returned as-is; there is no fallback to later
    /// extractors.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::NoExtractor`] if no extractor accepts `url`
    /// - [`ExtractError::UnknownExtractor`] if a redirect names an unregistered key
    /// - [`ExtractError::TooManyRedirects`] if more than `ctx.max_redirects` hops occur
    /// - any error returned by the handling extractor
    #[tracing::instrument(skip(self, ctx))]
    pub async fn resolve_url(
        &self,
        url: &str,
        ctx: &ExtractContext,
    ) -> Result<ResolvedMedia, ExtractError> {
        let mut handler = self
            .find_handler(url)
            .ok_or_else(|| ExtractError::no_extractor(url))?;
        let mut current_url = url.to_string();
        let mut redirect_count: usize = 0;

        loop {
            debug!(extractor = handler.key(), url = %current_url, "Trying extractor");

            match handler.extract(&current_url, ctx).await? {
                ExtractStep::Resolved(media) => {
                    info!(
                        extractor = handler.key(),
                        id = media.id(),
                        "Resolution successful"
                    );
                    return Ok(*media);
                }
                ExtractStep::Redirect {
                    url: next_url,
                    extractor_key,
                } => {
                    redirect_count += 1;
                    if redirect_count > ctx.max_redirects {
                        return Err(ExtractError::too_many_redirects(url, redirect_count));
                    }
                    let next = self
                        .get(&extractor_key)
                        .ok_or_else(|| ExtractError::unknown_extractor(&extractor_key, &next_url))?;
                    debug!(
                        from = handler.key(),
                        to = next.key(),
                        url = %next_url,
                        redirect_count,
                        "Following redirect"
                    );
                    handler = next;
                    current_url = next_url;
                }
            }
        }
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.extractors.iter().map(|e| e.key()).collect();
        f.debug_struct("ExtractorRegistry")
            .field("extractor_count", &self.extractors.len())
            .field("extractors", &keys)
            .finish()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
