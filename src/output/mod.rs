//! Output module for streaming discovered endpoints
//!
//! This module handles:
//! - The `Endpoint` record and its `Source`
//! - Formatting a record as a plain, annotated, or JSON line
//! - The single `Emitter` task that owns the output sink
//! - Live crawl counters

mod emitter;
mod endpoint;
mod format;
pub mod stats;

pub use emitter::{Emitter, OutputError};
pub use endpoint::{Endpoint, Source};
pub use format::{format_endpoint, OutputMode};
pub use stats::{CrawlStats, StatsSnapshot};
