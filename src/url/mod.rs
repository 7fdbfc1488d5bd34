//! Link handling module for Crawldex
//!
//! This module turns raw anchor hrefs found on a crawled document into the
//! next document URLs the traversal should descend into.
//!
//! Document URLs inside Crawldex are scheme-less (`example.com/dir/page`); the
//! fetcher adds the scheme when it issues the request.

mod classify;

pub use classify::{classify_link, normalize_href};

/// Recursion cases for a followed link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `https://<domain>...` - the protocol is stripped
    AbsoluteSameDomain,
    /// `/path` - appended to the crawled domain
    RootRelative,
    /// `path` - appended to the current document URL
    Relative,
}

/// Outcome of classifying one anchor href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Descend into `doc`
    Follow { kind: LinkKind, doc: String },
    /// Not a link to crawl (empty, foreign domain, mailto, ...)
    Skip,
}

impl LinkTarget {
    /// Returns the next document URL, if any
    pub fn into_doc(self) -> Option<String> {
        match self {
            Self::Follow { doc, .. } => Some(doc),
            Self::Skip => None,
        }
    }
}
