//! Output module for reporting crawl results
//!
//! This module handles:
//! - Turning the final visited set into a stable, sorted report
//! - Printing the report one address per line with a total
//! - Printing run statistics

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};

use std::collections::HashSet;

/// Final result of a crawl, ready for display
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Visited addresses in lexical order
    pub visited: Vec<String>,

    /// Counters collected during the run
    pub stats: CrawlStatistics,
}

impl CrawlReport {
    pub fn new(visited: HashSet<String>, stats: CrawlStatistics) -> Self {
        let mut visited: Vec<String> = visited.into_iter().collect();
        visited.sort();
        Self { visited, stats }
    }

    pub fn total(&self) -> usize {
        self.visited.len()
    }

    /// Renders the address list and total line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for address in &self.visited {
            out.push_str(" - ");
            out.push_str(address);
            out.push('\n');
        }
        out.push_str(&format!("Visited {} URIs in total.\n", self.total()));
        out
    }
}

/// Prints the visited addresses followed by the total count
pub fn print_report(report: &CrawlReport) {
    println!("\n----- CRAWL COMPLETE -----");
    print!("{}", report.render());
}
