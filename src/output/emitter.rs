//! The single writer of crawl results
//!
//! Every endpoint found by any worker passes through one [`Emitter`], which
//! owns the output sink. Lines are therefore never interleaved, and the sink
//! is flushed and handed back exactly once by [`Emitter::finish`].

use super::endpoint::Endpoint;
use super::format::{format_endpoint, OutputMode};
use super::stats::CrawlStats;
use crate::state::{StopSignal, VisitedSet};
use std::io::{BufWriter, Write};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while writing results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Serializes endpoints to a writer, one line each
pub struct Emitter<W: Write> {
    writer: BufWriter<W>,
    mode: OutputMode,
    seen: Option<VisitedSet>,
    stats: Arc<CrawlStats>,
}

impl<W: Write> Emitter<W> {
    /// Creates an emitter; with `unique` set, repeated URLs are written once
    pub fn new(writer: W, mode: OutputMode, unique: bool, stats: Arc<CrawlStats>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            mode,
            seen: unique.then(VisitedSet::new),
            stats,
        }
    }

    /// Writes one endpoint
    ///
    /// Returns `Ok(false)` if the endpoint was suppressed as a duplicate.
    pub fn emit(&mut self, endpoint: &Endpoint) -> Result<bool, OutputError> {
        if let Some(seen) = &self.seen {
            if !seen.insert_new(&endpoint.url) {
                self.stats.record_duplicate();
                return Ok(false);
            }
        }

        let line = format_endpoint(endpoint, self.mode)?;
        writeln!(self.writer, "{}", line)?;
        self.stats.record_emitted();
        Ok(true)
    }

    /// Flushes buffered lines and returns the underlying writer
    pub fn finish(self) -> Result<W, OutputError> {
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Io(e.into_error()))
    }
}

impl<W: Write + Send + 'static> Emitter<W> {
    /// Drains the results channel until every sender is gone or a stop is
    /// signalled, then finishes the sink
    ///
    /// Results already queued when the stop arrives are still written;
    /// anything sent after that is not.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<Endpoint>,
        stop: StopSignal,
    ) -> Result<W, OutputError> {
        loop {
            tokio::select! {
                biased;

                _ = stop.stopped() => {
                    rx.close();
                    while let Ok(endpoint) = rx.try_recv() {
                        self.emit(&endpoint)?;
                    }
                    tracing::debug!("Emitter stopped");
                    break;
                }

                next = rx.recv() => match next {
                    Some(endpoint) => {
                        self.emit(&endpoint)?;
                    }
                    None => break,
                },
            }
        }

        rx.close();
        self.finish()
    }
}
