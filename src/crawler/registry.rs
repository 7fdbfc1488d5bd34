//! Registry of running crawl tasks
//!
//! Each launched task runs on its own tokio task. The registry only keeps the
//! join handles so it can bound concurrency and drain on shutdown; results
//! travel through the store.

use crate::crawler::lifecycle::run_task;
use crate::crawler::CrawlContext;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;
use uuid::Uuid;

/// Reasons a crawl task could not be launched
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Too many running tasks (limit {0})")]
    TooManyTasks(usize),
}

/// Checks that `fqdn` is a bare domain the fetcher can request
///
/// # Arguments
///
/// * `fqdn` - The domain as sent by the client, e.g. `example.com`
///
/// # Returns
///
/// * `Ok(())` - The domain can be crawled
/// * `Err(LaunchError::InvalidDomain)` - Empty, carries a scheme or whitespace,
///   or does not form a URL with a host
pub fn validate_fqdn(fqdn: &str) -> Result<(), LaunchError> {
    if fqdn.is_empty() {
        return Err(LaunchError::InvalidDomain("fqdn cannot be empty".to_string()));
    }

    if fqdn.contains("://") {
        return Err(LaunchError::InvalidDomain(format!(
            "'{}' must not include a scheme",
            fqdn
        )));
    }

    if fqdn.chars().any(char::is_whitespace) {
        return Err(LaunchError::InvalidDomain(format!(
            "'{}' must not contain whitespace",
            fqdn
        )));
    }

    let url = Url::parse(&format!("https://{}", fqdn))
        .map_err(|e| LaunchError::InvalidDomain(format!("'{}': {}", fqdn, e)))?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(LaunchError::InvalidDomain(format!("'{}' has no host", fqdn)));
    }

    Ok(())
}

/// Tracks crawl tasks spawned on the tokio runtime
pub struct TaskRegistry {
    context: CrawlContext,
    max_running: usize,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TaskRegistry {
    pub fn new(context: CrawlContext, max_running: usize) -> Self {
        Self {
            context,
            max_running,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        // A panic while holding the lock leaves the map itself intact
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Spawns a crawl of `fqdn` and returns its task ID
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(&self, fqdn: &str) -> Result<String, LaunchError> {
        validate_fqdn(fqdn)?;
        self.reap();

        let mut tasks = self.tasks();
        if tasks.len() >= self.max_running {
            return Err(LaunchError::TooManyTasks(self.max_running));
        }

        let task_id = Uuid::new_v4().to_string();
        let context = self.context.clone();
        let fqdn = fqdn.to_string();
        let id = task_id.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = run_task(context, fqdn, id.clone()).await {
                tracing::error!("Task {} aborted: {}", id, e);
            }
        });
        tasks.insert(task_id.clone(), handle);

        Ok(task_id)
    }

    /// Drops the handles of finished tasks, returning how many were dropped
    pub fn reap(&self) -> usize {
        let mut tasks = self.tasks();
        let before = tasks.len();
        tasks.retain(|_, handle| !handle.is_finished());
        before - tasks.len()
    }

    /// Number of tasks still running
    pub fn running(&self) -> usize {
        self.tasks()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Waits for every tracked task to finish
    pub async fn join_all(&self) {
        let handles: Vec<(String, JoinHandle<()>)> = self.tasks().drain().collect();

        for (task_id, handle) in handles {
            if let Err(e) = handle.await {
                tracing::error!("Task {} panicked: {}", task_id, e);
            }
        }
    }
}
