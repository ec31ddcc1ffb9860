//! State module for tracking crawl progress
//!
//! This module provides the state the coordinator keeps while a crawl runs.
//!
//! # Components
//!
//! - `CrawlPhase`: The lifecycle of a crawl (init, running, draining, done)
//! - `HostState`: Per-host request timing for politeness delays

mod crawl_phase;
mod host_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use host_state::HostState;
