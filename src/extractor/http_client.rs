//! Shared HTTP client construction and JSON fetching for extractors.
//!
//! This module centralizes networking defaults so extractors and the
//! manifest parser stay consistent on timeout, user-agent, compression and
//! proxy compatibility. Timeouts are passed in explicitly; there is no
//! process-wide client state.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, Proxy};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::user_agent;

use super::ExtractError;

/// Default connect timeout for API and manifest requests.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default whole-request timeout for API and manifest requests.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Timeout settings for extractor HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

/// Transport failures while fetching a remote document.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("network error fetching {url}: {reason}")]
    Network {
        /// The requested URL
        url: String,
        /// Underlying client error text
        reason: String,
    },

    /// Non-success HTTP status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// Body was not valid JSON
    #[error("invalid JSON from {url}: {reason}")]
    InvalidJson {
        /// The requested URL
        url: String,
        /// Decoder error text
        reason: String,
    },
}

/// Fetches and decodes JSON documents from the upstream API.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Downloads `url` and decodes its body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// [`JsonFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    client: Client,
}

impl HttpJsonFetcher {
    /// Wraps an already configured client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    #[tracing::instrument(skip(self), fields(url = %url))]
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "API request failed");
                FetchError::Network {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "API returned error status");
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::InvalidJson {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Builds an extractor HTTP client using shared project policy.
///
/// `extractor_name` is used only for error messages and logging, not in
/// the User-Agent header.
///
/// # Errors
///
/// Returns [`ExtractError::Setup`] when client construction fails.
pub fn build_extractor_http_client(
    extractor_name: &str,
    settings: HttpSettings,
) -> Result<Client, ExtractError> {
    let user_agent = user_agent::default_extractor_user_agent();

    match try_build_client(&user_agent, settings, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some restricted sandbox environments panic when querying
            // system proxy settings; env proxies still apply.
            warn!(
                extractor = extractor_name,
                "Extractor client hit system proxy panic; using env-proxy fallback builder"
            );
            match try_build_client(&user_agent, settings, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(ExtractError::setup(
                    extractor_name,
                    "HTTP client construction panicked while initializing networking",
                )),
                Err(BuildClientFailure::Build(error)) => Err(ExtractError::setup(
                    extractor_name,
                    &format!("HTTP client construction failed: {error}"),
                )),
            }
        }
        Err(BuildClientFailure::Build(error)) => Err(ExtractError::setup(
            extractor_name,
            &format!("HTTP client construction failed: {error}"),
        )),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    user_agent: &str,
    settings: HttpSettings,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let user_agent = user_agent.to_string();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(user_agent, settings);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(user_agent: String, settings: HttpSettings) -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.read_timeout_secs))
        .user_agent(user_agent)
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    match scheme {
        "https" => find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        "http" => find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        _ => None,
    }
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
