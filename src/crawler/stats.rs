//! Crawl statistics snapshot

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Counters reported for a traversal run
///
/// Field names match the persisted task record: `indexed`, `errors`, `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Documents whose text was (re-)extracted and stored
    pub indexed: u32,

    /// Recoverable failures counted during the run
    pub errors: u32,

    /// Seconds since the run started, rounded to two decimals
    pub time: f64,
}

impl CrawlStats {
    /// Builds a snapshot from the live counters
    pub fn snapshot(indexed: u32, errors: u32, started: Instant) -> Self {
        Self {
            indexed,
            errors,
            time: round_seconds(started.elapsed().as_secs_f64()),
        }
    }
}

fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
