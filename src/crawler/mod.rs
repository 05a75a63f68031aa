//! Crawler module for the crawl engine
//!
//! This module contains the core crawling logic, including:
//! - The frontier, which admits and dispatches work items
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML parsing and endpoint extraction
//! - The worker pool and the supervisor that owns a crawl's lifecycle

mod fetcher;
mod frontier;
mod parser;
mod supervisor;
mod worker;

pub use fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher, MAX_REDIRECTS};
pub use frontier::{Admission, Frontier, WorkItem};
pub use parser::{extract_links, parse_html, resolve_link, Link, ParsedPage};
pub use supervisor::{CrawlOutcome, CrawlReport, Supervisor};
pub use worker::Worker;

use crate::config::CrawlJob;
use crate::state::VisitedSet;
use std::io::Write;
use std::sync::Arc;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client, sharing the visited set with the frontier
/// 2. Start a supervisor with its worker pool
/// 3. Stream every discovered endpoint to `writer`
///
/// # Arguments
///
/// * `job` - The resolved crawl job
/// * `writer` - The output sink, returned flushed once the crawl ends
///
/// # Returns
///
/// * `Ok((CrawlReport, W))` - Crawl completed or timed out
/// * `Err(ScoutError)` - The client could not be built or output failed
pub async fn crawl<W>(job: CrawlJob, writer: W) -> crate::Result<(CrawlReport, W)>
where
    W: Write + Send + 'static,
{
    let visited = Arc::new(VisitedSet::new());
    let fetcher = HttpFetcher::new(&job, visited.clone())?;
    let mut supervisor = Supervisor::with_visited(job, Arc::new(fetcher), visited);
    supervisor.run(writer).await
}
