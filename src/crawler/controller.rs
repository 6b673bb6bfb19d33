//! Crawl controller - orchestration of scope, pipeline and frontier
//!
//! The controller is a thin facade: it rejects out-of-scope seeds, seeds the
//! frontier, runs it to completion and exposes the visited set.

use crate::config::Config;
use crate::crawler::fetcher::{build_fetcher, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::processor::{LinkExtractor, Pipeline, Processor};
use crate::output::{CrawlReport, CrawlStatistics};
use crate::scope::{DomainScope, Scope};
use crate::CrawlError;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// Result of `begin_crawl`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The frontier ran to termination
    Completed,

    /// The seed was out of scope; nothing was scheduled
    SeedRejected,
}

/// Main crawl controller
pub struct CrawlController {
    scope: Arc<dyn Scope>,
    pipeline: Pipeline,
    frontier: Frontier,
}

impl CrawlController {
    /// Creates a controller from explicit parts
    ///
    /// # Arguments
    ///
    /// * `scope` - Decides which addresses may be crawled
    /// * `pipeline` - Stages run over every fetched page
    /// * `frontier` - Scheduler that owns the queue and the visited set
    pub fn new(scope: Arc<dyn Scope>, pipeline: Pipeline, frontier: Frontier) -> Self {
        Self {
            scope,
            pipeline,
            frontier,
        }
    }

    /// Starts the crawl from `seed` and waits for it to finish
    ///
    /// The seed is normalized like discovered links, so `https://teya.com`
    /// and `https://teya.com/` are one address. An out-of-scope seed is
    /// reported as `SeedRejected` and leaves the frontier untouched.
    pub async fn begin_crawl(&self, seed: &str) -> CrawlOutcome {
        let seed = normalize_address(seed);
        if !self.scope.is_in_scope(&seed) {
            tracing::warn!(seed = %seed, "Seed URL not in scope");
            return CrawlOutcome::SeedRejected;
        }

        tracing::info!(seed = %seed, "Starting crawl");
        self.frontier.schedule(&seed);
        self.frontier
            .start(self.pipeline.clone(), self.scope.clone())
            .await;

        CrawlOutcome::Completed
    }

    /// Addresses visited so far; final after `begin_crawl` returns
    pub fn visited_uris(&self) -> HashSet<String> {
        self.frontier.visited()
    }

    pub fn stats(&self) -> CrawlStatistics {
        self.frontier.stats()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Builds the final report for display
    pub fn report(&self) -> CrawlReport {
        CrawlReport::new(self.visited_uris(), self.stats())
    }
}

/// Factory wiring a controller from configuration
///
/// Defaults: a `DomainScope` for the configured domain (or the seed's
/// domain), a single `LinkExtractor` stage, and the retrying HTTP fetcher.
pub struct CrawlerBuilder {
    config: Config,
    scope: Option<Arc<dyn Scope>>,
    pipeline: Option<Pipeline>,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl CrawlerBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scope: None,
            pipeline: None,
            fetcher: None,
        }
    }

    pub fn scope(mut self, scope: Arc<dyn Scope>) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Builds the controller for a crawl starting at `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlController)` - Ready to `begin_crawl`
    /// * `Err(CrawlError)` - No usable scope domain, or the HTTP client failed to build
    pub fn build(self, seed: &str) -> Result<CrawlController, CrawlError> {
        let scope: Arc<dyn Scope> = match self.scope {
            Some(scope) => scope,
            None => Arc::new(match &self.config.scope.domain {
                Some(domain) => DomainScope::new(domain)?,
                None => DomainScope::from_seed(seed)?,
            }),
        };

        let pipeline = match self.pipeline {
            Some(pipeline) => pipeline,
            None => {
                let links: Arc<dyn Processor> = Arc::new(LinkExtractor::new());
                vec![links]
            }
        };

        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(build_fetcher(&self.config.fetcher)?),
        };

        let frontier = Frontier::new(self.config.crawler.clone(), fetcher);
        Ok(CrawlController::new(scope, pipeline, frontier))
    }
}

/// Prepends `https://` to a seed that has no http(s) scheme
///
/// # Examples
///
/// ```
/// use scopecrawl::crawler::ensure_scheme;
///
/// assert_eq!(ensure_scheme("teya.com"), "https://teya.com");
/// assert_eq!(ensure_scheme("http://teya.com"), "http://teya.com");
/// ```
pub fn ensure_scheme(seed: &str) -> String {
    let seed = seed.trim();
    let lower = seed.to_ascii_lowercase();
    if lower.starts_with(HTTP_PREFIX) || lower.starts_with(HTTPS_PREFIX) {
        seed.to_string()
    } else {
        format!("{}{}", HTTPS_PREFIX, seed)
    }
}

/// Puts an address into the form links take after extraction
///
/// Parsing adds the root path and lowercases scheme and host; fragments are
/// dropped. Unparseable input is returned unchanged so the scope can reject it.
///
/// # Examples
///
/// ```
/// use scopecrawl::crawler::normalize_address;
///
/// assert_eq!(normalize_address("https://Teya.com"), "https://teya.com/");
/// assert_eq!(normalize_address("https://teya.com/a#top"), "https://teya.com/a");
/// ```
pub fn normalize_address(address: &str) -> String {
    match Url::parse(address.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => address.to_string(),
    }
}
