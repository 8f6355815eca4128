//! Cursor bookkeeping for the gamepass listing endpoint.
//!
//! The upstream returns an opaque `nextPageToken`; an empty or missing token
//! ends the sequence. A misbehaving upstream could hand back the same token
//! forever, so the tracker also stops on a repeated token or after a fixed
//! number of pages.

use std::collections::HashSet;

/// What to do after a page has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// Request the next page with this token.
    Fetch(String),
    /// Upstream signalled the last page.
    Exhausted,
    /// Stopped early; whatever was collected is kept.
    Halted(HaltReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    PageLimit(usize),
    RepeatedCursor(String),
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HaltReason::PageLimit(max) => write!(f, "page limit of {max} reached"),
            HaltReason::RepeatedCursor(token) => write!(f, "cursor '{token}' was already seen"),
        }
    }
}

/// Tracks pages fetched and tokens seen for one universe.
#[derive(Debug)]
pub struct CursorTracker {
    max_pages: usize,
    pages_fetched: usize,
    seen: HashSet<String>,
}

impl CursorTracker {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
            pages_fetched: 0,
            seen: HashSet::new(),
        }
    }

    /// Record one fetched page and its continuation token.
    pub fn advance(&mut self, next_page_token: Option<String>) -> PageStep {
        self.pages_fetched += 1;

        let token = match next_page_token {
            Some(token) if !token.is_empty() => token,
            _ => return PageStep::Exhausted,
        };

        if !self.seen.insert(token.clone()) {
            return PageStep::Halted(HaltReason::RepeatedCursor(token));
        }
        if self.pages_fetched >= self.max_pages {
            return PageStep::Halted(HaltReason::PageLimit(self.max_pages));
        }

        PageStep::Fetch(token)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
