//! Scheduler for managing the crawl frontier and concurrency
//!
//! This module handles:
//! - Priority queue management for pending requests
//! - Global concurrency limiting via semaphores
//!
//! Deeper stages are handed out first so that started branches finish (and
//! their records reach the sinks) before new branches open. Within a stage
//! requests leave in the order they were queued.

use crate::crawler::request::Request;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A request queued for fetching with priority information
#[derive(Debug, Clone)]
pub struct QueuedRequest {
    pub request: Request,

    /// Insertion order, used as the FIFO tie-breaker
    seq: u64,
}

impl QueuedRequest {
    fn depth(&self) -> u32 {
        self.request.kind().depth()
    }
}

// Greater depth pops first from the max-heap; equal depth pops lowest seq first
impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth()
            .cmp(&other.depth())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueuedRequest {}

/// A scheduled fetch with a semaphore permit
pub struct ScheduledFetch {
    /// The request to fetch
    pub request: Request,

    /// The semaphore permit for this fetch
    pub _permit: OwnedSemaphorePermit,
}

/// Scheduler manages the frontier queue and the concurrency ceiling
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Frontier priority queue of requests to fetch
    frontier: BinaryHeap<QueuedRequest>,

    next_seq: u64,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `max_concurrent` - Maximum number of fetches in flight at once
    pub fn new(max_concurrent: u32) -> Self {
        let permits = usize::try_from(max_concurrent.max(1)).unwrap_or(usize::MAX);
        Self {
            global_semaphore: Arc::new(Semaphore::new(permits)),
            frontier: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Adds a request to the frontier
    pub fn push(&mut self, request: Request) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.frontier.push(QueuedRequest { request, seq });
    }

    /// Gets the next request to fetch without waiting
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - A request and the permit it holds while in flight
    /// * `None` - The frontier is empty or every permit is taken
    pub fn try_next(&mut self) -> Option<ScheduledFetch> {
        if self.frontier.is_empty() {
            return None;
        }

        let permit = self.global_semaphore.clone().try_acquire_owned().ok()?;
        let queued = self.frontier.pop()?;

        tracing::trace!("Scheduling {} ({})", queued.request.url, queued.request.kind());

        Some(ScheduledFetch {
            request: queued.request,
            _permit: permit,
        })
    }

    /// Returns the number of requests in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Returns the number of fetches that could start right now
    pub fn available_permits(&self) -> usize {
        self.global_semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ListingContext, ReviewContext, Stage, StageKind};
    use url::Url;

    fn request(path: &str, stage: Stage) -> Request {
        Request::new(
            Url::parse(&format!("https://shop.example.com{}", path)).unwrap(),
            stage,
        )
    }

    #[test]
    fn test_new_scheduler() {
        let scheduler = Scheduler::new(2);

        assert_eq!(scheduler.frontier_size(), 0);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.available_permits(), 2);
    }

    #[test]
    fn test_try_next_empty_frontier() {
        let mut scheduler = Scheduler::new(2);
        assert!(scheduler.try_next().is_none());
    }

    #[test]
    fn test_concurrency_ceiling() {
        let mut scheduler = Scheduler::new(2);
        for i in 0..3 {
            scheduler.push(request(&format!("/p{}.html", i), Stage::CatalogPage));
        }

        let first = scheduler.try_next().unwrap();
        let _second = scheduler.try_next().unwrap();
        assert!(scheduler.try_next().is_none());
        assert_eq!(scheduler.frontier_size(), 1);

        drop(first);
        assert!(scheduler.try_next().is_some());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_deeper_stages_first_then_fifo() {
        let mut scheduler = Scheduler::new(10);
        scheduler.push(request("/page-1.html", Stage::CatalogPage));
        scheduler.push(request("/page-2.html", Stage::CatalogPage));
        scheduler.push(request(
            "/product1.html",
            Stage::ProductPage(ListingContext::default()),
        ));
        scheduler.push(request(
            "/review-1-page-1.html",
            Stage::ReviewPage(ReviewContext::new("1")),
        ));

        let order: Vec<(StageKind, String)> = std::iter::from_fn(|| scheduler.try_next())
            .map(|s| (s.request.kind(), s.request.url.path().to_string()))
            .collect();

        assert_eq!(
            order,
            vec![
                (StageKind::ReviewPage, "/review-1-page-1.html".to_string()),
                (StageKind::ProductPage, "/product1.html".to_string()),
                (StageKind::CatalogPage, "/page-1.html".to_string()),
                (StageKind::CatalogPage, "/page-2.html".to_string()),
            ]
        );
    }
}
