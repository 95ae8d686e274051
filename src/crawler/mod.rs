//! Crawler module for keyword-driven image harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of search pages and images
//! - Result-anchor parsing into ordered candidates
//! - The per-keyword orchestration state machine

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{Coordinator, KeywordOutcome, RunSummary};
pub use fetcher::{build_http_client, download_image, fetch_search_page};
pub use parser::{parse_results, Candidate};

use crate::config::Config;
use crate::SeineError;

/// Runs a complete harvest over the given keywords
///
/// This is the main entry point for a run. It will:
/// 1. Prepare the output directory and metadata sink
/// 2. Build the HTTP client
/// 3. Crawl each keyword sequentially, sharing one dedup store
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `keywords` - Keywords in the order they should be crawled
///
/// # Returns
///
/// * `Ok(RunSummary)` - Totals for the run
/// * `Err(SeineError)` - A fatal (run-terminating) failure
pub async fn crawl(config: Config, keywords: &[String]) -> Result<RunSummary, SeineError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(keywords).await
}
