//! State module for tracking where each request sits in the crawl
//!
//! This module provides the crawl's stage machine and the context values
//! carried between stages.
//!
//! # Components
//!
//! - `Stage`: the page kind a request fetches, carrying its inbound context
//! - `StageKind`: the context-free tag of a stage, used for logging and counts
//! - `ListingContext` / `ReviewContext`: values computed at one stage and
//!   consumed, unmodified, at a later one

mod context;
mod stage;

// Re-export main types
pub use context::{ListingContext, ReviewContext};
pub use stage::{Stage, StageKind};
