//! Crawler module for document traversal and indexing
//!
//! This module contains the core crawling logic, including:
//! - Link classification hooks and HTML href extraction
//! - Content fingerprinting for change detection
//! - The iteration/error budget that bounds every run
//! - The depth-first traversal engine
//! - Task lifecycle reporting and the registry of running crawl tasks
//! - Adapters for the HTTP client and the text-extraction service

mod budget;
mod change;
mod engine;
mod extractor;
mod fetcher;
mod lifecycle;
mod parser;
mod registry;
mod stats;

pub use budget::{should_continue, Budget, ERROR_CEILING, ITERATION_CEILING};
pub use change::{fingerprint, needs_extraction};
pub use engine::{CrawlOutcome, Spider};
pub use extractor::{TextExtractor, TikaExtractor};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use lifecycle::{run_task, TaskReporter};
pub use parser::extract_hrefs;
pub use registry::{validate_fqdn, LaunchError, TaskRegistry};
pub use stats::CrawlStats;

use crate::storage::DocumentStore;
use std::sync::Arc;

/// Collaborators shared by every crawl task
///
/// Cloning is cheap; each spawned task gets its own copy of the handles.
#[derive(Clone)]
pub struct CrawlContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub extractor: Arc<dyn TextExtractor>,
    pub store: Arc<dyn DocumentStore>,
}

impl CrawlContext {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn TextExtractor>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
        }
    }
}
