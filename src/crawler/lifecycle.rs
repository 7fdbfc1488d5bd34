//! Task lifecycle reporting
//!
//! A crawl task's record is written exactly twice: `active` when the task
//! starts, and `complete` with the final counters when the traversal ends.
//! The completed record then expires after [`TASK_RETENTION`].
//!
//! [`TASK_RETENTION`]: crate::storage::TASK_RETENTION

use crate::crawler::engine::Spider;
use crate::crawler::stats::CrawlStats;
use crate::crawler::CrawlContext;
use crate::storage::{CrawlTask, DocumentStore, StorageResult};
use std::sync::Arc;

/// Persists status transitions of one crawl task
pub struct TaskReporter {
    store: Arc<dyn DocumentStore>,
    task_id: String,
}

impl TaskReporter {
    pub fn new(store: Arc<dyn DocumentStore>, task_id: impl Into<String>) -> Self {
        Self {
            store,
            task_id: task_id.into(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Records that the task is running
    pub fn start(&self) -> StorageResult<()> {
        self.store.put_task(&self.task_id, &CrawlTask::active())
    }

    /// Records the final counters and starts the retention countdown
    pub fn finish(&self, stats: CrawlStats) -> StorageResult<()> {
        self.store
            .put_task(&self.task_id, &CrawlTask::complete(stats))?;
        self.store.expire_task(&self.task_id)?;
        Ok(())
    }
}

/// Runs one crawl task from start to finish
///
/// Traversal failures never surface here; only a failure to persist the
/// task record does, in which case no completion record is written.
///
/// # Arguments
///
/// * `context` - The collaborators shared by all crawl tasks
/// * `fqdn` - The domain to crawl
/// * `task_id` - The identifier handed back to the caller
pub async fn run_task(
    context: CrawlContext,
    fqdn: String,
    task_id: String,
) -> StorageResult<CrawlStats> {
    tracing::info!("Task {} started for {}", task_id, fqdn);

    let reporter = TaskReporter::new(context.store.clone(), task_id);
    reporter.start()?;

    let outcome = Spider::new(fqdn, context).crawl().await;
    reporter.finish(outcome.stats)?;

    tracing::info!(
        "Task {} complete. docs indexed: {}, errors: {}, time: {}",
        reporter.task_id(),
        outcome.stats.indexed,
        outcome.stats.errors,
        outcome.stats.time
    );

    Ok(outcome.stats)
}
