//! The crawl frontier and dispatcher
//!
//! This module handles:
//! - Admission of work items (depth limit, scope, at-most-once dispatch)
//! - Handing queued items to idle workers
//! - Detecting when the crawl has drained
//!
//! An item is outstanding from the moment it is accepted until the worker
//! that dequeued it calls [`Frontier::complete`]. The frontier is drained
//! once nothing is queued and nothing is in flight; since only workers
//! holding an item can enqueue new ones, a drained frontier stays drained.

use crate::state::{PipelineState, VisitedSet};
use crate::url::Scope;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use url::Url;

/// A URL awaiting fetch, with its hop count from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub url: Url,
    pub depth: u32,
}

impl WorkItem {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    pub fn seed(url: Url) -> Self {
        Self::new(url, 0)
    }
}

/// Outcome of offering an item to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Queued for dispatch
    Accepted,

    /// Deeper than the configured maximum
    TooDeep,

    /// Host not in the crawl scope
    OutOfScope,

    /// Already dispatched earlier in this crawl
    AlreadyVisited,

    /// The frontier has been closed
    Closed,
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<WorkItem>,
    active: usize,
    closed: bool,
}

impl FrontierState {
    fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.active == 0
    }
}

/// Shared work queue for one crawl
pub struct Frontier {
    state: Mutex<FrontierState>,
    visited: Arc<VisitedSet>,
    scope: Scope,
    max_depth: u32,
    notify: Notify,
}

impl Frontier {
    pub fn new(scope: Scope, max_depth: u32) -> Self {
        Self::with_visited(scope, max_depth, Arc::new(VisitedSet::new()))
    }

    /// Creates a frontier admitting through an existing visited set
    ///
    /// Anything else that claims URLs in `visited` (redirect following)
    /// keeps those URLs from being dispatched.
    pub fn with_visited(scope: Scope, max_depth: u32, visited: Arc<VisitedSet>) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            visited,
            scope,
            max_depth,
            notify: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // A panicking worker cannot leave the counters half-updated
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Offers an item for dispatch
    ///
    /// The visited check and the push happen under one lock, so a URL
    /// discovered concurrently by several workers is dispatched once.
    pub fn enqueue(&self, item: WorkItem) -> Admission {
        if item.depth > self.max_depth {
            tracing::trace!("Rejecting {} (depth {} > {})", item.url, item.depth, self.max_depth);
            return Admission::TooDeep;
        }

        if !self.scope.allows(&item.url) {
            tracing::trace!("Rejecting {} (out of scope)", item.url);
            return Admission::OutOfScope;
        }

        {
            let mut state = self.lock();
            if state.closed {
                return Admission::Closed;
            }

            if !self.visited.insert_new(item.url.as_str()) {
                return Admission::AlreadyVisited;
            }

            tracing::trace!("Queued {} at depth {}", item.url, item.depth);
            state.queue.push_back(item);
        }

        self.notify.notify_waiters();
        Admission::Accepted
    }

    /// Waits for the next item
    ///
    /// Returns `None` once the frontier is drained or closed. Every `Some`
    /// must be matched by a call to [`Frontier::complete`].
    pub async fn dequeue(&self) -> Option<WorkItem> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking, so a wake-up between the check and
            // the await is not lost
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }

                if let Some(item) = state.queue.pop_front() {
                    state.active += 1;
                    return Some(item);
                }

                if state.active == 0 {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks one dequeued item as finished
    pub fn complete(&self) {
        let drained = {
            let mut state = self.lock();
            state.active = state.active.saturating_sub(1);
            state.is_drained()
        };

        if drained {
            tracing::debug!("Frontier drained");
            self.notify.notify_waiters();
        }
    }

    /// Stops all dispatch and discards queued items; idempotent
    pub fn close(&self) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.queue.clear();
        }
        self.notify.notify_waiters();
    }

    /// Resolves once the frontier is drained or closed
    pub async fn wait_settled(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let state = self.lock();
                if state.closed || state.is_drained() {
                    return;
                }
            }

            notified.await;
        }
    }

    pub fn snapshot(&self) -> PipelineState {
        let state = self.lock();
        PipelineState {
            active_workers: state.active,
            pending_items: state.queue.len(),
            closed: state.closed,
        }
    }

    /// Number of distinct URLs ever accepted
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
