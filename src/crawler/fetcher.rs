//! HTTP fetcher implementation
//!
//! This module handles outbound document requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests returning the raw document bytes
//! - Error classification into fetch failures
//!
//! Failed fetches are never retried; the traversal engine counts them.

use crate::config::FetcherConfig;
use crate::{CrawlError, CrawlResult};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Retrieves the raw bytes of a document
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the scheme-less document URL `doc`
    async fn fetch(&self, doc: &str) -> CrawlResult<Vec<u8>>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents over HTTP(S) with reqwest
pub struct HttpFetcher {
    client: Client,
    scheme: String,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            scheme: config.scheme.clone(),
        })
    }

    /// Full request URL for a scheme-less document URL
    pub fn document_url(&self, doc: &str) -> String {
        format!("{}://{}", self.scheme, doc)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, doc: &str) -> CrawlResult<Vec<u8>> {
        let url = self.document_url(doc);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| classify_error(&url, e))?;

        let body = response.bytes().await.map_err(|e| classify_error(&url, e))?;
        Ok(body.to_vec())
    }
}

/// Converts a reqwest failure into a fetch error with a readable reason
fn classify_error(url: &str, error: reqwest::Error) -> CrawlError {
    let reason = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if let Some(status) = error.status() {
        format!("HTTP {}", status.as_u16())
    } else {
        error.to_string()
    };

    CrawlError::Fetch {
        url: url.to_string(),
        reason,
    }
}
