//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedSet`: Atomic test-and-insert deduplication of absolute URLs
//! - `CrawlPhase`: The supervisor's `Idle -> Running -> Completed | TimedOut` machine
//! - `PipelineState`: Snapshot of the frontier's termination counters
//! - `StopHandle` / `StopSignal`: Cooperative shutdown broadcast

mod pipeline;
mod stop;
mod visited;

// Re-export main types
pub use pipeline::{CrawlPhase, PipelineState};
pub use stop::{stop_channel, StopHandle, StopSignal};
pub use visited::VisitedSet;
