//! Storage module for documents and crawl tasks
//!
//! The store is a key-value store holding JSON records plus a full-text index
//! over the `DOC`-prefixed records. This module handles:
//! - SQLite database initialization and schema management
//! - JSON record persistence with per-key expiry
//! - Full-text index construction and querying
//! - Typed access to documents and crawl tasks

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::crawler::CrawlStats;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Key prefix for document records
pub const DOC_PREFIX: &str = "DOC";

/// Key prefix for crawl task records
pub const TASK_PREFIX: &str = "taskID";

/// How long a completed task record is kept
pub const TASK_RETENTION: Duration = Duration::from_secs(60 * 60 * 24);

/// Builds the store key of a document record
pub fn document_key(doc: &str) -> String {
    format!("{}:{}", DOC_PREFIX, doc)
}

/// Builds the store key of a crawl task record
pub fn task_key(task_id: &str) -> String {
    format!("{}:{}", TASK_PREFIX, task_id)
}

/// Extracted text and content fingerprint of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Scheme-less document URL
    pub doc: String,
    /// Plain text returned by the extraction service
    pub text: String,
    /// Hex-encoded SHA-256 of the raw document bytes
    pub hash: String,
}

/// Status of a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Complete,
}

/// Persisted status of one crawl run
///
/// Serializes as `{"status":"active"}` while running and as
/// `{"indexed":3,"errors":0,"time":1.25,"status":"complete"}` once finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlTask {
    #[serde(flatten)]
    pub stats: Option<CrawlStats>,
    pub status: TaskStatus,
}

impl CrawlTask {
    /// A task whose traversal is running
    pub fn active() -> Self {
        Self {
            stats: None,
            status: TaskStatus::Active,
        }
    }

    /// A finished task with its final counters
    pub fn complete(stats: CrawlStats) -> Self {
        Self {
            stats: Some(stats),
            status: TaskStatus::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Complete
    }
}
