//! Shared User-Agent string for API and manifest HTTP clients.

/// Project URL for User-Agent identification (RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/picta-dl";

/// Default User-Agent for extractor requests (single shared format; no per-extractor name in header).
#[must_use]
pub(crate) fn default_extractor_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("picta-dl/{version} (media-resolver; +{PROJECT_UA_URL})")
}
