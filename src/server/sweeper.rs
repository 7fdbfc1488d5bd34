//! Background purge of expired store records

use crate::storage::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawns a background task that purges expired records every `period`
///
/// Expired records are already invisible to reads; the sweep only reclaims
/// their space. The first sweep runs immediately.
pub fn spawn_expiry_sweeper(store: Arc<dyn DocumentStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.purge_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Purged {} expired records", removed),
                Err(e) => tracing::warn!("Expiry sweep failed: {}", e),
            }
        }
    })
}
