//! Storage traits and error types
//!
//! This module defines the trait interface for store backends and
//! associated error types.

use crate::storage::{document_key, task_key, CrawlTask, DocumentRecord, TASK_RETENTION};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Search query error: {0}")]
    Query(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store implementations
///
/// The raw operations mirror a JSON key-value store with key expiry and a
/// full-text index over document records. Implementations must be safe to
/// share between concurrently running crawl tasks; last write wins.
pub trait DocumentStore: Send + Sync {
    // ===== Raw Records =====

    /// Reads the JSON value stored at `key`
    ///
    /// Expired records are reported as absent.
    fn get_json(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Writes (or overwrites) the JSON value stored at `key`
    ///
    /// An existing expiry on the key is left untouched.
    fn set_json(&self, key: &str, value: &Value) -> StorageResult<()>;

    /// Sets the key to expire `ttl` from now
    ///
    /// Returns false if the key does not exist.
    fn expire(&self, key: &str, ttl: Duration) -> StorageResult<bool>;

    /// Remaining lifetime of `key` in whole seconds, None if it never expires
    /// or does not exist
    fn ttl(&self, key: &str) -> StorageResult<Option<i64>>;

    /// Physically removes expired records, returning how many were removed
    fn purge_expired(&self) -> StorageResult<u64>;

    // ===== Full-Text Index =====

    /// Creates the full-text index over document records and fills it from
    /// the records already stored
    fn build_index(&self) -> StorageResult<()>;

    /// Returns the URLs of all documents whose text matches `term`
    fn search(&self, term: &str) -> StorageResult<Vec<String>>;

    // ===== Typed Access =====

    /// Gets the stored record of a document
    fn document(&self, doc: &str) -> StorageResult<Option<DocumentRecord>> {
        match self.get_json(&document_key(doc))? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Inserts or replaces the record of a document
    fn put_document(&self, record: &DocumentRecord) -> StorageResult<()> {
        self.set_json(&document_key(&record.doc), &serde_json::to_value(record)?)
    }

    /// Gets a crawl task by ID
    fn task(&self, task_id: &str) -> StorageResult<Option<CrawlTask>> {
        match self.get_json(&task_key(task_id))? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Writes the status record of a crawl task
    fn put_task(&self, task_id: &str, task: &CrawlTask) -> StorageResult<()> {
        self.set_json(&task_key(task_id), &serde_json::to_value(task)?)
    }

    /// Starts the retention countdown of a crawl task record
    fn expire_task(&self, task_id: &str) -> StorageResult<bool> {
        self.expire(&task_key(task_id), TASK_RETENTION)
    }
}
