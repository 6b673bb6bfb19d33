//! Counters describing one crawl run

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Addresses claimed by a worker
    pub visited: usize,

    /// Fetches that produced content (any status code)
    pub fetched: usize,

    /// Fetches that failed after all retries
    pub fetch_failures: usize,

    /// Pipeline stage failures
    pub processing_failures: usize,

    /// In-scope addresses newly queued from discovered links
    pub discovered: usize,

    /// Discovered addresses rejected by the scope
    pub out_of_scope: usize,

    /// Dequeued addresses another worker had already claimed
    pub duplicate_claims: usize,
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===");
    println!("  Visited: {}", stats.visited);
    println!("  Fetched: {}", stats.fetched);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Processing failures: {}", stats.processing_failures);
    println!("  Links queued: {}", stats.discovered);
    println!("  Out of scope: {}", stats.out_of_scope);
    println!("  Duplicate claims: {}", stats.duplicate_claims);
}
