//! Lifecycle phase definitions for a crawl
//!
//! A crawl moves `Idle -> Running` once and then to exactly one terminal
//! phase. The supervisor records every transition through
//! [`CrawlPhase::transition`], so a second terminal transition is rejected.

use std::fmt;

/// Represents the lifecycle phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Created but not started
    Idle,

    /// Workers are running
    Running,

    // ===== Terminal Phases =====
    /// The frontier drained with all workers idle
    Completed,

    /// The timeout fired before the frontier drained
    TimedOut,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut)
    }

    /// Returns true if moving from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::TimedOut)
        )
    }

    /// Moves to `next`, or reports the illegal transition
    pub fn transition(&mut self, next: CrawlPhase) -> crate::Result<()> {
        if !self.can_transition_to(next) {
            return Err(crate::ScoutError::InvalidTransition {
                from: *self,
                to: next,
            });
        }

        tracing::debug!("Crawl phase: {} -> {}", self, next);
        *self = next;
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time view of the frontier's termination counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineState {
    /// Workers currently holding a dequeued item
    pub active_workers: usize,

    /// Items queued and not yet handed to a worker
    pub pending_items: usize,

    /// Whether the frontier has been closed by the supervisor
    pub closed: bool,
}

impl PipelineState {
    /// Returns true when no item is pending and no worker is mid-fetch
    pub fn is_drained(&self) -> bool {
        self.active_workers == 0 && self.pending_items == 0
    }
}
