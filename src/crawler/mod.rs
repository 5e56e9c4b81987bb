//! Crawler module for the catalog → product → review crawl
//!
//! This module contains the core crawling logic, including:
//! - Pagination planning for catalog and review pages
//! - The stage transition function
//! - HTTP fetching with retry logic and optional rendering
//! - Request scheduling under a concurrency ceiling
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod planner;
mod request;
mod scheduler;
mod spider;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, user_agent_string, Fetch, HttpFetcher, Page};
pub use planner::{page_count, plan, PageScope, MAX_PAGES};
pub use request::{Request, StageOutput};
pub use scheduler::{ScheduledFetch, Scheduler};
pub use spider::Spider;
