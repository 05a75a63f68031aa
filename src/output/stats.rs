//! Live crawl counters
//!
//! Workers and the emitter update these concurrently; the supervisor takes a
//! [`StatsSnapshot`] once the crawl has ended.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every task of one crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    fetch_errors: AtomicU64,
    links_enqueued: AtomicU64,
    results_emitted: AtomicU64,
    duplicates_suppressed: AtomicU64,
}

/// Plain copy of the counters at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Pages fetched with a response, whatever the status
    pub pages_fetched: u64,

    /// Fetches that failed or returned an unusable status
    pub fetch_errors: u64,

    /// Links accepted into the frontier, excluding the seed
    pub links_enqueued: u64,

    /// Lines written to the output
    pub results_emitted: u64,

    /// Results dropped by `-unique`
    pub duplicates_suppressed: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_page(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_error(&self) {
        self.fetch_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_enqueued(&self) {
        self.links_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_emitted(&self) {
        self.results_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate(&self) {
        self.duplicates_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_errors: self.fetch_errors.load(Ordering::Relaxed),
            links_enqueued: self.links_enqueued.load(Ordering::Relaxed),
            results_emitted: self.results_emitted.load(Ordering::Relaxed),
            duplicates_suppressed: self.duplicates_suppressed.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pages fetched, {} fetch errors, {} links queued, {} results emitted, {} duplicates suppressed",
            self.pages_fetched,
            self.fetch_errors,
            self.links_enqueued,
            self.results_emitted,
            self.duplicates_suppressed
        )
    }
}
