//! Text extraction adapter
//!
//! Raw document bytes are streamed to an Apache Tika server, which detects the
//! mime type on its own and answers with plain text.

use crate::config::ExtractorConfig;
use crate::{CrawlError, CrawlResult};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Turns raw document bytes into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, body: &[u8]) -> CrawlResult<String>;
}

/// Tika server client (`PUT /tika`)
pub struct TikaExtractor {
    client: Client,
    endpoint: String,
}

impl TikaExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/tika", config.url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextExtractor for TikaExtractor {
    async fn extract(&self, body: &[u8]) -> CrawlResult<String> {
        let response = self
            .client
            .put(&self.endpoint)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(ACCEPT, "text/plain")
            .body(body.to_vec())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| CrawlError::Extraction(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| CrawlError::Extraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(url: &str) -> ExtractorConfig {
        ExtractorConfig {
            url: url.to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let extractor = TikaExtractor::new(&config_for("http://localhost:9998/")).unwrap();
        assert_eq!(extractor.endpoint(), "http://localhost:9998/tika");
    }

    #[tokio::test]
    async fn test_extract_sends_raw_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/tika"))
            .and(header("content-type", "application/octet-stream"))
            .and(header("accept", "text/plain"))
            .and(body_bytes(b"<html><body>Hello</body></html>".to_vec()))
            .respond_with(ResponseTemplate::new(200).set_body_string("Hello\n"))
            .expect(1)
            .mount(&server)
            .await;

        let extractor = TikaExtractor::new(&config_for(&server.uri())).unwrap();
        let text = extractor
            .extract(b"<html><body>Hello</body></html>")
            .await
            .unwrap();

        assert_eq!(text, "Hello\n");
    }

    #[tokio::test]
    async fn test_extract_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/tika"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let extractor = TikaExtractor::new(&config_for(&server.uri())).unwrap();
        assert!(matches!(
            extractor.extract(b"data").await,
            Err(CrawlError::Extraction(_))
        ));
    }
}
