//! Traversal engine - budgeted depth-first walk over a domain
//!
//! The walk starts at the domain root and, for every document:
//! 1. Counts a step against the iteration budget
//! 2. Applies the budget/visited guard
//! 3. Fetches the raw bytes and marks the document visited
//! 4. Re-extracts and stores the text if the content fingerprint changed
//! 5. Extracts anchor hrefs and classifies them
//! 6. Descends into every followed link, in document order, before moving on
//!
//! Pending documents live on an explicit stack instead of the call stack, so
//! pathological sites cannot exhaust the thread stack. Children are pushed in
//! reverse so they pop in document order, which keeps the walk depth-first.

use crate::crawler::budget::Budget;
use crate::crawler::change::{fingerprint, needs_extraction};
use crate::crawler::parser::extract_hrefs;
use crate::crawler::stats::CrawlStats;
use crate::crawler::CrawlContext;
use crate::storage::DocumentRecord;
use crate::url::classify_link;
use crate::{CrawlError, CrawlResult};
use std::collections::HashSet;
use std::time::Instant;

/// Final state of a traversal run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Counters reported to the task record
    pub stats: CrawlStats,

    /// Traversal steps taken, including guarded skips
    pub iterations: u32,

    /// Documents fetched successfully during the run
    pub visited: usize,
}

/// Result of a single traversal step
#[derive(Debug)]
enum StepOutcome {
    /// The document was fetched; descend into these documents next
    Visited { follow: Vec<String> },

    /// The document was already visited during this run
    Skipped,

    /// A ceiling was reached; no later step can pass the guard
    Exhausted,

    /// A recoverable failure, counted against the error budget
    Failed(CrawlError),
}

/// Mutable accumulator of one run
struct CrawlRun {
    budget: Budget,
    visited: HashSet<String>,
    indexed: u32,
    started: Instant,
}

impl CrawlRun {
    fn new() -> Self {
        Self {
            budget: Budget::new(),
            visited: HashSet::new(),
            indexed: 0,
            started: Instant::now(),
        }
    }

    fn snapshot(&self) -> CrawlStats {
        CrawlStats::snapshot(self.indexed, self.budget.errors(), self.started)
    }
}

/// Crawls one domain
pub struct Spider {
    fqdn: String,
    context: CrawlContext,
}

impl Spider {
    /// Creates a spider for `fqdn` (e.g. `example.com`, no scheme)
    pub fn new(fqdn: impl Into<String>, context: CrawlContext) -> Self {
        Self {
            fqdn: fqdn.into(),
            context,
        }
    }

    /// Runs the traversal from the domain root until the pending documents
    /// run out or a budget ceiling is reached
    ///
    /// Never fails: every per-document failure is counted and the walk goes
    /// on with the next pending document.
    pub async fn crawl(&self) -> CrawlOutcome {
        let mut run = CrawlRun::new();
        let mut pending = vec![self.fqdn.clone()];

        tracing::info!("Starting crawl of {}", self.fqdn);

        while let Some(doc) = pending.pop() {
            match self.step(&doc, &mut run).await {
                StepOutcome::Visited { follow } => pending.extend(follow.into_iter().rev()),
                StepOutcome::Skipped => {}
                StepOutcome::Exhausted => {
                    tracing::info!(
                        "Crawl budget exhausted for {} ({} iterations, {} errors)",
                        self.fqdn,
                        run.budget.iterations(),
                        run.budget.errors()
                    );
                    break;
                }
                StepOutcome::Failed(e) => {
                    tracing::warn!("Failed to process {}: {}", doc, e);
                    run.budget.record_error();
                }
            }
        }

        let stats = run.snapshot();
        tracing::info!(
            "Crawl of {} finished: indexed={}, errors={}, time={}s",
            self.fqdn,
            stats.indexed,
            stats.errors,
            stats.time
        );

        CrawlOutcome {
            stats,
            iterations: run.budget.iterations(),
            visited: run.visited.len(),
        }
    }

    async fn step(&self, doc: &str, run: &mut CrawlRun) -> StepOutcome {
        run.budget.record_iteration();

        if !run.budget.allows(run.visited.contains(doc)) {
            return if run.budget.is_exhausted() {
                StepOutcome::Exhausted
            } else {
                StepOutcome::Skipped
            };
        }

        match self.visit(doc, run).await {
            Ok(follow) => StepOutcome::Visited { follow },
            Err(e) => StepOutcome::Failed(e),
        }
    }

    /// Fetches, indexes and scans one document, returning the documents to
    /// descend into
    async fn visit(&self, doc: &str, run: &mut CrawlRun) -> CrawlResult<Vec<String>> {
        tracing::debug!("Crawling doc: {}", doc);

        let body = self.context.fetcher.fetch(doc).await?;
        run.visited.insert(doc.to_string());

        let hash = fingerprint(&body);
        let stored = self.context.store.document(doc)?;
        if needs_extraction(stored.as_ref(), &hash) {
            let text = self.context.extractor.extract(&body).await?;
            self.context.store.put_document(&DocumentRecord {
                doc: doc.to_string(),
                text,
                hash,
            })?;
            run.indexed += 1;
        } else {
            tracing::debug!("Unchanged since last crawl: {}", doc);
        }

        let html = String::from_utf8_lossy(&body);
        let hrefs = extract_hrefs(&html).map_err(|message| CrawlError::Parse {
            url: doc.to_string(),
            message,
        })?;

        Ok(hrefs
            .iter()
            .filter_map(|href| classify_link(href, &self.fqdn, doc).into_doc())
            .collect())
    }
}
