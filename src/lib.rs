//! Crawldex: a budgeted domain crawler with full-text search
//!
//! This crate walks every document reachable under a domain, extracts its text
//! through an external extraction service, stores the text alongside a content
//! fingerprint, and answers full-text queries with the matching document URLs.

pub mod config;
pub mod crawler;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Crawldex operations
#[derive(Debug, Error)]
pub enum CrawldexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failures raised while processing one document during a traversal
///
/// Every variant is recoverable: the traversal engine counts it against the
/// error budget and moves on to the next pending document.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Extraction service error: {0}")]
    Extraction(String),

    #[error("Store error: {0}")]
    Store(#[from] storage::StorageError),

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

/// Result type alias for Crawldex operations
pub type Result<T> = std::result::Result<T, CrawldexError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for per-document crawl operations
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlStats, Spider};
pub use storage::{CrawlTask, DocumentRecord, DocumentStore, SqliteStore, TaskStatus};
pub use url::{classify_link, LinkKind, LinkTarget};
