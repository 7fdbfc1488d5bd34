//! Change detection via content fingerprints
//!
//! A document is re-extracted only when its raw bytes differ from the bytes
//! that produced the stored record.

use crate::storage::DocumentRecord;
use sha2::{Digest, Sha256};

/// Computes the hex-encoded SHA-256 of the raw document bytes
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Returns true if the document must be (re-)extracted
///
/// # Arguments
///
/// * `stored` - The record currently in the store, if any
/// * `fingerprint` - The fingerprint of the freshly fetched bytes
pub fn needs_extraction(stored: Option<&DocumentRecord>, fingerprint: &str) -> bool {
    match stored {
        Some(record) => record.hash != fingerprint,
        None => true,
    }
}
