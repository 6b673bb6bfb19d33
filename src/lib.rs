//! Scopecrawl: a concurrent, scope-bounded breadth-first web crawler
//!
//! This crate starts from a seed address, fetches pages with a fixed pool of
//! workers, extracts outbound links and keeps following the ones that stay
//! inside a configured domain until no unvisited in-scope address remains.

pub mod config;
pub mod crawler;
pub mod output;
pub mod scope;
pub mod state;

use thiserror::Error;

/// Main error type for crawler setup and orchestration
///
/// Per-address failures never surface here; they are contained in the
/// worker loop and only logged.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
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
}

/// Errors produced while fetching a single address
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {address}: {source}")]
    Http {
        address: String,
        source: reqwest::Error,
    },

    #[error("Request timeout for {address}")]
    Timeout { address: String },

    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("Fetch of {address} was cancelled")]
    Cancelled { address: String },

    #[error("Failed to read body of {address}: {source}")]
    Body {
        address: String,
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns true if another attempt could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Body { .. } => true,
            Self::Http { source, .. } => !source.is_builder() && !source.is_redirect(),
            Self::InvalidAddress { .. } | Self::Cancelled { .. } => false,
        }
    }

    /// Returns true if the fetch stopped because the run is shutting down
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// A pipeline stage failed for one source address
#[derive(Debug, Error)]
#[error("Processing error for {source_address}: {message}")]
pub struct ProcessingError {
    pub source_address: String,
    pub message: String,
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlController, CrawlOutcome, FetchedContent, Frontier};
pub use scope::{DomainScope, Scope};
pub use state::FrontierState;
