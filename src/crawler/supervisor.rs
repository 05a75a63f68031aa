//! Crawl supervisor - lifecycle of a single crawl
//!
//! The supervisor seeds the frontier, starts the emitter and the worker
//! pool, then waits for whichever comes first: the frontier draining or the
//! timeout. It is the only place that ends a crawl:
//! - on drain it closes the frontier so idle workers exit
//! - on timeout it signals stop, so workers abandon in-flight fetches and
//!   the emitter writes only what was already queued
//!
//! In both cases every worker is joined before the emitter is awaited, and
//! the emitter is the sole owner of the output sink. The sink is therefore
//! flushed and returned exactly once, after the last possible writer is gone.

use super::fetcher::Fetcher;
use super::frontier::{Admission, Frontier, WorkItem};
use super::worker::Worker;
use crate::config::CrawlJob;
use crate::output::{CrawlStats, Emitter, StatsSnapshot};
use crate::state::{stop_channel, CrawlPhase, VisitedSet};
use crate::ScoutError;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Result channel slots per worker before senders wait for the emitter
const RESULTS_PER_WORKER: usize = 16;

/// How a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The frontier drained
    Completed,

    /// The timeout cut the crawl short
    TimedOut,
}

impl CrawlOutcome {
    pub fn phase(&self) -> CrawlPhase {
        match self {
            Self::Completed => CrawlPhase::Completed,
            Self::TimedOut => CrawlPhase::TimedOut,
        }
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

impl std::fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crawl {} in {:.2?}: {}",
            self.outcome.phase(),
            self.elapsed,
            self.stats
        )
    }
}

/// Owns the lifecycle of one crawl job
pub struct Supervisor {
    job: Arc<CrawlJob>,
    fetcher: Arc<dyn Fetcher>,
    visited: Arc<VisitedSet>,
    phase: CrawlPhase,
}

impl Supervisor {
    pub fn new(job: CrawlJob, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_visited(job, fetcher, Arc::new(VisitedSet::new()))
    }

    /// Creates a supervisor whose frontier admits through `visited`
    ///
    /// Pass the same set the fetcher's redirect policy claims URLs in.
    pub fn with_visited(
        job: CrawlJob,
        fetcher: Arc<dyn Fetcher>,
        visited: Arc<VisitedSet>,
    ) -> Self {
        Self {
            job: Arc::new(job),
            fetcher,
            visited,
            phase: CrawlPhase::Idle,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Runs the crawl to completion or timeout, writing results to `writer`
    ///
    /// A supervisor runs once; calling this again fails with
    /// [`ScoutError::InvalidTransition`].
    ///
    /// # Returns
    ///
    /// * `Ok((CrawlReport, W))` - The crawl ended; the writer is flushed
    /// * `Err(ScoutError)` - Writing output failed or a worker panicked
    pub async fn run<W>(&mut self, writer: W) -> crate::Result<(CrawlReport, W)>
    where
        W: Write + Send + 'static,
    {
        self.phase.transition(CrawlPhase::Running)?;
        let started = Instant::now();
        let job = self.job.clone();

        tracing::info!(
            "Crawling {} (depth {}, {} workers, scope {})",
            job.seed,
            job.max_depth,
            job.parallelism,
            job.scope
        );

        let stats = Arc::new(CrawlStats::new());
        let frontier = Arc::new(Frontier::with_visited(
            job.scope.clone(),
            job.max_depth,
            self.visited.clone(),
        ));
        let (stop_handle, stop) = stop_channel();
        let (tx, rx) = mpsc::channel(job.parallelism.max(1) * RESULTS_PER_WORKER);

        let emitter = Emitter::new(writer, job.output, job.unique, stats.clone());
        let emitter_task = tokio::spawn(emitter.run(rx, stop.clone()));

        // Seeded before any worker exists, so no worker can see an empty,
        // drained frontier at startup
        let admission = frontier.enqueue(WorkItem::seed(job.seed.clone()));
        if admission != Admission::Accepted {
            tracing::warn!("Seed {} not admitted: {:?}", job.seed, admission);
        }

        let mut workers = JoinSet::new();
        for id in 0..job.parallelism {
            let worker = Worker::new(
                id,
                job.clone(),
                frontier.clone(),
                self.fetcher.clone(),
                tx.clone(),
                stats.clone(),
                stop.clone(),
            );
            workers.spawn(worker.run());
        }
        drop(tx);

        let deadline = async {
            match job.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        let outcome = tokio::select! {
            _ = frontier.wait_settled() => CrawlOutcome::Completed,
            _ = deadline => CrawlOutcome::TimedOut,
        };

        if outcome == CrawlOutcome::TimedOut {
            tracing::warn!("[timeout] {}", job.seed);
            stop_handle.stop();
        }
        frontier.close();

        let mut worker_error = None;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
                worker_error.get_or_insert(ScoutError::Worker(e));
            }
        }

        // Every sender is gone; the emitter finishes on its own
        let emitted = emitter_task.await;
        self.phase.transition(outcome.phase())?;

        if let Some(e) = worker_error {
            return Err(e);
        }
        let writer = emitted??;

        let report = CrawlReport {
            outcome,
            stats: stats.snapshot(),
            elapsed: started.elapsed(),
        };
        tracing::debug!("Pipeline at exit: {:?}", frontier.snapshot());

        Ok((report, writer))
    }
}
