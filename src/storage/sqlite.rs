//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DocumentStore trait.

use crate::storage::schema::{initialize_index, initialize_schema};
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite storage backend
///
/// The connection sits behind a mutex so one store can be shared by the HTTP
/// handlers and every running crawl task.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))
    }
}

/// Current time as a unix timestamp
fn now() -> i64 {
    Utc::now().timestamp()
}

/// Builds an FTS5 query matching every word of `term`, in any order, in the
/// text column
///
/// Returns None when the term has no searchable word.
fn text_match_query(term: &str) -> Option<String> {
    let words: Vec<String> = term
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .map(|word| format!("\"{}\"", word.replace('"', "\"\"")))
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(format!("text : ({})", words.join(" ")))
    }
}

impl DocumentStore for SqliteStore {
    fn get_json(&self, key: &str) -> StorageResult<Option<Value>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM records
                 WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                params![key, now()],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json(&self, key: &str, value: &Value) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        let conn = self.conn()?;
        // An expired row that was not purged yet is logically absent, so
        // overwriting it starts a fresh record without expiry.
        conn.execute(
            "INSERT INTO records (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = CASE
                    WHEN records.expires_at IS NOT NULL AND records.expires_at <= ?3 THEN NULL
                    ELSE records.expires_at
                END",
            params![key, raw, now()],
        )?;
        Ok(())
    }

    fn expire(&self, key: &str, ttl: Duration) -> StorageResult<bool> {
        let now = now();
        let expires_at = now + ttl.as_secs() as i64;
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE records SET expires_at = ?2
             WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?3)",
            params![key, expires_at, now],
        )?;
        Ok(changed > 0)
    }

    fn ttl(&self, key: &str) -> StorageResult<Option<i64>> {
        let now = now();
        let conn = self.conn()?;
        let expires_at: Option<Option<i64>> = conn
            .query_row(
                "SELECT expires_at FROM records
                 WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)",
                params![key, now],
                |row| row.get(0),
            )
            .optional()?;

        Ok(expires_at.flatten().map(|at| at - now))
    }

    fn purge_expired(&self) -> StorageResult<u64> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM records WHERE expires_at IS NOT NULL AND expires_at <= ?1",
            params![now()],
        )?;
        Ok(removed as u64)
    }

    fn build_index(&self) -> StorageResult<()> {
        let mut conn = self.conn()?;
        initialize_index(&mut conn)?;
        Ok(())
    }

    fn search(&self, term: &str) -> StorageResult<Vec<String>> {
        let query = text_match_query(term)
            .ok_or_else(|| StorageError::Query("empty search term".to_string()))?;

        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT doc FROM document_index
                 WHERE document_index MATCH ?1
                 ORDER BY rowid",
            )
            .map_err(|e| StorageError::Query(e.to_string()))?;

        let docs = stmt
            .query_map(params![query], |row| row.get(0))
            .and_then(|rows| rows.collect::<Result<Vec<String>, _>>())
            .map_err(|e| StorageError::Query(e.to_string()))?;

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CrawlTask, DocumentRecord};
    use serde_json::json;

    fn record(doc: &str, text: &str) -> DocumentRecord {
        DocumentRecord {
            doc: doc.to_string(),
            text: text.to_string(),
            hash: format!("hash-of-{}", doc),
        }
    }

    fn indexed_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.build_index().unwrap();
        store
    }

    #[test]
    fn test_create_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawldex.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set_json("taskID:a", &json!({"status": "active"})).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get_json("taskID:a").unwrap(),
            Some(json!({"status": "active"}))
        );
    }

    #[test]
    fn test_get_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get_json("DOC:nothing").unwrap(), None);
        assert_eq!(store.document("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_json("k", &json!({"v": 1})).unwrap();
        store.set_json("k", &json!({"v": 2})).unwrap();
        assert_eq!(store.get_json("k").unwrap(), Some(json!({"v": 2})));
    }

    #[test]
    fn test_document_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let rec = record("ex.com/a", "hello world");
        store.put_document(&rec).unwrap();

        assert_eq!(store.document("ex.com/a").unwrap(), Some(rec));
        assert!(store.get_json("DOC:ex.com/a").unwrap().is_some());
    }

    #[test]
    fn test_task_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put_task("t1", &CrawlTask::active()).unwrap();
        assert_eq!(store.task("t1").unwrap(), Some(CrawlTask::active()));
        assert_eq!(store.task("t2").unwrap(), None);
    }

    #[test]
    fn test_expire_sets_ttl() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put_task("t1", &CrawlTask::active()).unwrap();
        assert_eq!(store.ttl("taskID:t1").unwrap(), None);

        assert!(store.expire_task("t1").unwrap());
        let ttl = store.ttl("taskID:t1").unwrap().unwrap();
        assert!(ttl > 60 * 60 * 23 && ttl <= 60 * 60 * 24);
    }

    #[test]
    fn test_expire_missing_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(!store.expire("nope", Duration::from_secs(10)).unwrap());
    }

    #[test]
    fn test_expired_records_are_hidden_and_purged() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_json("gone", &json!({"a": 1})).unwrap();
        store.set_json("kept", &json!({"a": 2})).unwrap();
        store.expire("gone", Duration::ZERO).unwrap();

        assert_eq!(store.get_json("gone").unwrap(), None);
        assert_eq!(store.ttl("gone").unwrap(), None);
        assert!(store.get_json("kept").unwrap().is_some());

        assert_eq!(store.purge_expired().unwrap(), 1);
        assert_eq!(store.purge_expired().unwrap(), 0);
    }

    #[test]
    fn test_overwriting_expired_record_clears_expiry() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_json("k", &json!({"v": 1})).unwrap();
        store.expire("k", Duration::ZERO).unwrap();

        store.set_json("k", &json!({"v": 2})).unwrap();
        assert_eq!(store.get_json("k").unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.ttl("k").unwrap(), None);
    }

    #[test]
    fn test_search_finds_matching_documents() {
        let store = indexed_store();
        store
            .put_document(&record("ex.com", "Welcome to the kitten shelter"))
            .unwrap();
        store
            .put_document(&record("ex.com/dogs", "Puppies and dogs"))
            .unwrap();
        store
            .put_document(&record("ex.com/cats", "More kitten pictures"))
            .unwrap();

        let docs = store.search("kitten").unwrap();
        assert_eq!(docs, vec!["ex.com".to_string(), "ex.com/cats".to_string()]);
    }

    #[test]
    fn test_search_matches_all_words_in_any_order() {
        let store = indexed_store();
        store
            .put_document(&record("ex.com/setup", "A guide to the installation of the server"))
            .unwrap();
        store
            .put_document(&record("ex.com/faq", "Frequently asked installation questions"))
            .unwrap();

        assert_eq!(
            store.search("installation guide").unwrap(),
            vec!["ex.com/setup".to_string()]
        );
        assert_eq!(
            store.search("  server   the guide ").unwrap(),
            vec!["ex.com/setup".to_string()]
        );
        assert!(store.search("installation kittens").unwrap().is_empty());
    }

    #[test]
    fn test_search_matches_inflected_forms() {
        let store = indexed_store();
        store
            .put_document(&record("ex.com/cats", "One kitten was running home"))
            .unwrap();

        assert_eq!(store.search("kittens").unwrap(), vec!["ex.com/cats".to_string()]);
        assert_eq!(store.search("runs").unwrap(), vec!["ex.com/cats".to_string()]);
    }

    #[test]
    fn test_search_punctuation_only_term_is_error() {
        let store = indexed_store();
        assert!(matches!(store.search("- !"), Err(StorageError::Query(_))));
    }

    #[test]
    fn test_search_sees_updated_text() {
        let store = indexed_store();
        store.put_document(&record("ex.com", "old words")).unwrap();
        store.put_document(&record("ex.com", "new words")).unwrap();

        assert!(store.search("old").unwrap().is_empty());
        assert_eq!(store.search("new").unwrap(), vec!["ex.com".to_string()]);
    }

    #[test]
    fn test_search_only_matches_text_column() {
        let store = indexed_store();
        store.put_document(&record("ex.com/zebra", "nothing here")).unwrap();

        assert!(store.search("zebra").unwrap().is_empty());
    }

    #[test]
    fn test_search_with_punctuation() {
        let store = indexed_store();
        store
            .put_document(&record("ex.com", "Getting started with Node.js today"))
            .unwrap();

        assert_eq!(store.search("Node.js").unwrap(), vec!["ex.com".to_string()]);
        assert!(store.search("say \"hi\"").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_term_is_error() {
        let store = indexed_store();
        assert!(matches!(store.search("   "), Err(StorageError::Query(_))));
    }

    #[test]
    fn test_search_without_index_is_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put_document(&record("ex.com", "text")).unwrap();
        assert!(matches!(store.search("text"), Err(StorageError::Query(_))));
    }

    #[test]
    fn test_build_index_includes_existing_documents() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put_document(&record("ex.com/early", "indexed later")).unwrap();

        store.build_index().unwrap();
        store.build_index().unwrap();

        assert_eq!(
            store.search("later").unwrap(),
            vec!["ex.com/early".to_string()]
        );
    }
}
