//! Configuration module for Scopecrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use scopecrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.threads);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, ScopeConfig, DEFAULT_THREADS};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
