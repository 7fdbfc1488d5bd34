use serde::Deserialize;

/// Main configuration structure for crawldex
///
/// Every section is optional; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub fetcher: FetcherConfig,
    pub extractor: ExtractorConfig,
    pub tasks: TaskConfig,
}

/// HTTP API listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,

    /// Seconds between purges of expired records
    pub sweep_interval_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./crawldex.db".to_string(),
            sweep_interval_secs: 300,
        }
    }
}

/// Outbound document requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// Scheme prepended to scheme-less document URLs
    pub scheme: String,

    pub user_agent: String,

    /// Total request timeout in seconds
    pub timeout_secs: u64,

    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            user_agent: format!("crawldex/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Text-extraction service (Apache Tika)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractorConfig {
    /// Base URL of the Tika server
    pub url: String,

    pub timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9998".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Crawl task limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TaskConfig {
    /// Maximum number of crawl tasks running at once
    pub max_running: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self { max_running: 16 }
    }
}
