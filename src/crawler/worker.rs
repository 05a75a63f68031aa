//! Fetch-parse worker
//!
//! Each worker loops: dequeue an item, fetch it, extract endpoints, emit
//! every endpoint and feed in-scope hrefs back to the frontier one level
//! deeper. Per-URL failures are logged and dropped here; nothing a single
//! page does can end the crawl.

use super::fetcher::{FetchError, FetchedPage, Fetcher};
use super::frontier::{Frontier, WorkItem};
use super::parser::extract_links;
use crate::config::CrawlJob;
use crate::output::{CrawlStats, Endpoint};
use crate::state::StopSignal;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One member of the worker pool
pub struct Worker {
    id: usize,
    job: Arc<CrawlJob>,
    frontier: Arc<Frontier>,
    fetcher: Arc<dyn Fetcher>,
    results: mpsc::Sender<Endpoint>,
    stats: Arc<CrawlStats>,
    stop: StopSignal,
}

impl Worker {
    pub fn new(
        id: usize,
        job: Arc<CrawlJob>,
        frontier: Arc<Frontier>,
        fetcher: Arc<dyn Fetcher>,
        results: mpsc::Sender<Endpoint>,
        stats: Arc<CrawlStats>,
        stop: StopSignal,
    ) -> Self {
        Self {
            id,
            job,
            frontier,
            fetcher,
            results,
            stats,
            stop,
        }
    }

    /// Runs until the frontier drains, closes, or a stop is signalled
    pub async fn run(self) {
        tracing::debug!("Worker {} started", self.id);

        loop {
            let item = tokio::select! {
                biased;
                _ = self.stop.stopped() => break,
                item = self.frontier.dequeue() => match item {
                    Some(item) => item,
                    None => break,
                },
            };

            let _done = Completion(&self.frontier);
            self.process(&item).await;
        }

        tracing::debug!("Worker {} finished", self.id);
    }

    async fn process(&self, item: &WorkItem) {
        tracing::debug!("Worker {} fetching {} (depth {})", self.id, item.url, item.depth);

        let page = match self.fetch(item).await {
            Ok(page) => page,
            Err(FetchError::Cancelled { .. }) => return,
            Err(e) => {
                tracing::warn!("{}", e);
                self.stats.record_fetch_error();
                return;
            }
        };
        self.stats.record_page();

        if !page.is_html() {
            tracing::debug!(
                "Not parsing {} ({})",
                page.final_url,
                page.content_type.as_deref().unwrap_or("")
            );
            return;
        }

        let body = truncate_body(&page.body, self.job.max_body_size);
        for link in extract_links(body, &page.final_url) {
            if link.source.is_followable() {
                let next = WorkItem::new(link.url.clone(), item.depth + 1);
                if self.frontier.enqueue(next).is_accepted() {
                    self.stats.record_enqueued();
                }
            }

            if !self.send(Endpoint::new(link.source, link.url.as_str())).await {
                return;
            }
        }
    }

    /// Fetches an item, giving up as soon as a stop is signalled
    async fn fetch(&self, item: &WorkItem) -> Result<FetchedPage, FetchError> {
        let page = tokio::select! {
            biased;
            _ = self.stop.stopped() => {
                return Err(FetchError::Cancelled { url: item.url.clone() });
            }
            page = self.fetcher.fetch(&item.url, &self.job.headers) => page?,
        };

        if !page.is_success() {
            return Err(FetchError::Status {
                url: page.final_url,
                status: page.status,
            });
        }

        Ok(page)
    }

    /// Hands a result to the emitter, waiting for room in the channel
    ///
    /// Returns false if the result could not be delivered and the rest of
    /// the page should be abandoned.
    async fn send(&self, endpoint: Endpoint) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        tokio::select! {
            biased;
            _ = self.stop.stopped() => false,
            sent = self.results.send(endpoint) => match sent {
                Ok(()) => true,
                Err(_) => {
                    tracing::warn!("Result channel closed, stopping crawl");
                    self.frontier.close();
                    false
                }
            },
        }
    }
}

/// Marks a dequeued item complete when dropped, including during a panic
struct Completion<'a>(&'a Frontier);

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        self.0.complete();
    }
}

/// Cuts a body to at most `limit` bytes, on a character boundary
fn truncate_body(body: &str, limit: Option<usize>) -> &str {
    match limit {
        Some(limit) if body.len() > limit => {
            let mut end = limit;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            &body[..end]
        }
        _ => body,
    }
}
