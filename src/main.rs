//! Scopecrawl main entry point
//!
//! This is the command-line interface for the Scopecrawl web crawler.

use anyhow::Context;
use clap::Parser;
use scopecrawl::config::{load_config, validate, Config, DEFAULT_THREADS};
use scopecrawl::crawler::{crawl, ensure_scheme};
use scopecrawl::output::{print_report, print_statistics};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scopecrawl: a concurrent, domain-bounded web crawler
///
/// Starting from a seed URL, Scopecrawl follows every link that stays on the
/// seed's domain (or its subdomains) and prints every page it visited.
#[derive(Parser, Debug)]
#[command(name = "scopecrawl")]
#[command(version)]
#[command(about = "A concurrent, domain-bounded web crawler", long_about = None)]
struct Cli {
    /// Seed URL; "https://" is assumed when no scheme is given
    #[arg(value_name = "SEED")]
    seed: String,

    /// Number of worker threads (default 5)
    #[arg(value_name = "THREADS")]
    threads: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print run statistics after the visited list
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(raw) = cli.threads.as_deref() {
        config.crawler.threads = parse_threads(raw);
    }
    validate(&config).context("Invalid crawler configuration")?;

    let seed = ensure_scheme(&cli.seed);
    tracing::info!(
        "Starting crawl for seed URL: {} with {} workers",
        seed,
        config.crawler.threads
    );

    match crawl(config, &seed).await? {
        Some(report) => {
            print_report(&report);
            if cli.stats {
                print_statistics(&report.stats);
            }
        }
        None => {
            println!("Seed URL {} is not in scope; nothing was crawled.", seed);
        }
    }

    Ok(())
}

/// Parses the thread-count argument, falling back to the default on bad input
fn parse_threads(raw: &str) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(threads) if threads > 0 => threads,
        _ => {
            tracing::warn!(
                "Invalid thread count '{}', using default of {}",
                raw,
                DEFAULT_THREADS
            );
            DEFAULT_THREADS
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scopecrawl=info,warn"),
            1 => EnvFilter::new("scopecrawl=debug,info"),
            2 => EnvFilter::new("scopecrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
