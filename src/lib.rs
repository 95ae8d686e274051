//! Image-Seine: a keyword-driven image harvester
//!
//! This crate crawls an image search engine's result pages for a configured
//! list of keywords, downloads candidate images, discards byte-identical
//! duplicates across the whole run, and records provenance metadata for
//! every image it keeps.

pub mod config;
pub mod crawler;
pub mod dedup;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Image-Seine operations
#[derive(Debug, Error)]
pub enum SeineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Metadata write error: {0}")]
    Metadata(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl SeineError {
    /// Whether this error must terminate the whole run rather than just the
    /// keyword that produced it.
    ///
    /// Metadata sink and filesystem failures are fatal; network failures
    /// end at the keyword boundary and the run moves on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SeineError::Config(_) | SeineError::Metadata(_) | SeineError::Io(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Keyword file {0} is missing or unreadable")]
    KeywordsUnreadable(String),

    #[error("Keyword file {0} contains no keywords")]
    NoKeywords(String),
}

/// Result type alias for Image-Seine operations
pub type Result<T> = std::result::Result<T, SeineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Candidate;
pub use dedup::DedupStore;
pub use output::{AcceptedImage, MetadataSink};
