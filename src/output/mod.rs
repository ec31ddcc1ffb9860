//! Output module for crawl summaries
//!
//! This module handles:
//! - The banner printed before a crawl starts
//! - The summary printed when it finishes

mod summary;

pub use summary::{
    print_start_banner, print_summary, write_start_banner, write_summary, CrawlSummary,
};
