//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Pipeline stages that extract links from fetched pages
//! - The frontier: work queue, visited set and worker pool
//! - Overall crawl coordination

mod controller;
mod fetcher;
mod frontier;
mod processor;

pub use controller::{
    ensure_scheme, normalize_address, CrawlController, CrawlOutcome, CrawlerBuilder,
};
pub use fetcher::{
    build_fetcher, build_http_client, FetchedContent, Fetcher, HttpFetcher, RetryPolicy,
    RetryingFetcher,
};
pub use frontier::Frontier;
pub use processor::{run_pipeline, LinkExtractor, Pipeline, PipelineOutput, Processor};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Derive the scope from the configuration or the seed
/// 2. Build the HTTP fetcher and the link-extraction pipeline
/// 3. Run the frontier until no in-scope, unvisited address remains
/// 4. Return the visited set as a report
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Absolute address to start from
///
/// # Returns
///
/// * `Ok(Some(CrawlReport))` - Crawl completed
/// * `Ok(None)` - The seed was out of scope and nothing was crawled
/// * `Err(CrawlError)` - The crawl could not be set up
///
/// # Example
///
/// ```no_run
/// use scopecrawl::config::Config;
/// use scopecrawl::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// if let Some(report) = crawl(Config::default(), "https://www.example.com").await? {
///     println!("Visited {}", report.total());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, seed: &str) -> Result<Option<CrawlReport>, CrawlError> {
    let controller = CrawlerBuilder::new(config).build(seed)?;

    match controller.begin_crawl(seed).await {
        CrawlOutcome::Completed => Ok(Some(controller.report())),
        CrawlOutcome::SeedRejected => Ok(None),
    }
}
