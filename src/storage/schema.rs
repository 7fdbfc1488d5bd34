//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Crawldex database.

/// SQL schema for the record table
pub const SCHEMA_SQL: &str = r#"
-- JSON records keyed like a key-value store ("DOC:<url>", "taskID:<id>")
CREATE TABLE IF NOT EXISTS records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    expires_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_records_expires_at ON records(expires_at);
"#;

/// SQL for the full-text index over document records
///
/// The index is kept in sync by triggers so every write to a `DOC:` record is
/// searchable immediately. Words are stemmed with the Porter stemmer. The
/// table is recreated on every build so an older tokenizer never survives.
pub const INDEX_SQL: &str = r#"
DROP TABLE IF EXISTS document_index;

CREATE VIRTUAL TABLE document_index USING fts5(
    key UNINDEXED,
    doc,
    text,
    tokenize = 'porter unicode61'
);

CREATE TRIGGER IF NOT EXISTS records_index_insert AFTER INSERT ON records
WHEN new.key LIKE 'DOC:%'
BEGIN
    INSERT INTO document_index (key, doc, text)
    VALUES (new.key, json_extract(new.value, '$.doc'), json_extract(new.value, '$.text'));
END;

CREATE TRIGGER IF NOT EXISTS records_index_update AFTER UPDATE ON records
WHEN new.key LIKE 'DOC:%'
BEGIN
    DELETE FROM document_index WHERE key = old.key;
    INSERT INTO document_index (key, doc, text)
    VALUES (new.key, json_extract(new.value, '$.doc'), json_extract(new.value, '$.text'));
END;

CREATE TRIGGER IF NOT EXISTS records_index_delete AFTER DELETE ON records
WHEN old.key LIKE 'DOC:%'
BEGIN
    DELETE FROM document_index WHERE key = old.key;
END;
"#;

/// Refills the index from the stored document records
pub const REBUILD_INDEX_SQL: &str = r#"
DELETE FROM document_index;
INSERT INTO document_index (key, doc, text)
SELECT key, json_extract(value, '$.doc'), json_extract(value, '$.text')
FROM records
WHERE key LIKE 'DOC:%';
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Creates the full-text index and its triggers, then rebuilds its content
pub fn initialize_index(conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    tx.execute_batch(INDEX_SQL)?;
    tx.execute_batch(REBUILD_INDEX_SQL)?;
    tx.commit()
}
