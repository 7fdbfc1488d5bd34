//! Crawl budget governor
//!
//! Two monotonically increasing counters bound every traversal run: the
//! number of traversal steps taken and the number of recoverable failures.

/// Maximum number of traversal steps for one run
pub const ITERATION_CEILING: u32 = 2500;

/// Maximum number of failures tolerated for one run
pub const ERROR_CEILING: u32 = 100;

/// Guard evaluated before a document is fetched
///
/// # Examples
///
/// ```
/// use crawldex::crawler::should_continue;
///
/// assert!(should_continue(1, 0, false));
/// assert!(!should_continue(1, 0, true));
/// assert!(!should_continue(2500, 0, false));
/// assert!(!should_continue(10, 100, false));
/// ```
pub fn should_continue(iterations: u32, errors: u32, already_visited: bool) -> bool {
    errors < ERROR_CEILING && iterations < ITERATION_CEILING && !already_visited
}

/// Live counters of one traversal run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budget {
    iterations: u32,
    errors: u32,
}

impl Budget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one traversal step, whether or not it ends up fetching anything
    pub fn record_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
    }

    /// Counts one recoverable failure
    pub fn record_error(&mut self) {
        self.errors = self.errors.saturating_add(1);
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Returns true once either ceiling has been reached
    ///
    /// The counters never decrease, so an exhausted budget stays exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.errors >= ERROR_CEILING || self.iterations >= ITERATION_CEILING
    }

    /// Applies the guard to the current counters
    pub fn allows(&self, already_visited: bool) -> bool {
        should_continue(self.iterations, self.errors, already_visited)
    }
}
