//! Picta media resolution library
//!
//! This library turns Picta page URLs into normalized metadata plus a
//! deterministically ranked list of DASH stream variants. Downloading the
//! selected variant is left to the caller.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`extractor`] - URL matching, publication metadata, extractor registry
//! - [`manifest`] - DASH manifest fetching and representation enumeration
//! - [`format`] - Stream variants, ranking and selection

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod extractor;
pub mod format;
pub mod manifest;
mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use extractor::{
    ErrorKind, ExtractContext, ExtractError, Extractor, ExtractorConfig, ExtractorRegistry,
    MediaMetadata, ResolvedMedia, build_default_registry,
};
pub use format::{CodecPreference, FormatSelector, StreamContent, StreamVariant};
