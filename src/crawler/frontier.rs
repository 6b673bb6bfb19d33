//! Frontier: the work queue, visited set and worker pool of a crawl run
//!
//! This module handles:
//! - At-most-once visitation through an atomic claim on the visited set
//! - A shared multi-producer, multi-consumer queue of candidate addresses
//! - A fixed pool of workers running fetch -> pipeline -> schedule
//! - Termination once no queued or in-flight work remains
//! - A wall-clock ceiling with a forced-stop grace period

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::processor::{run_pipeline, Pipeline, Processor};
use crate::output::CrawlStatistics;
use crate::scope::Scope;
use crate::state::{FrontierState, SharedFrontierState};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Per-run counters, updated by every worker
#[derive(Debug, Default)]
struct FrontierStats {
    fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    processing_failures: AtomicUsize,
    discovered: AtomicUsize,
    out_of_scope: AtomicUsize,
    duplicate_claims: AtomicUsize,
}

impl FrontierStats {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, visited: usize) -> CrawlStatistics {
        CrawlStatistics {
            visited,
            fetched: self.fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            processing_failures: self.processing_failures.load(Ordering::Relaxed),
            discovered: self.discovered.load(Ordering::Relaxed),
            out_of_scope: self.out_of_scope.load(Ordering::Relaxed),
            duplicate_claims: self.duplicate_claims.load(Ordering::Relaxed),
        }
    }
}

/// State shared between the frontier handle and its workers
struct Shared {
    visited: Mutex<HashSet<String>>,
    queue_tx: mpsc::UnboundedSender<String>,
    queue_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
    /// Addresses queued or being processed
    outstanding: AtomicUsize,
    state: SharedFrontierState,
    /// Fired when `outstanding` drops to zero while running
    exhausted: CancellationToken,
    /// Fired when the run ceiling expires
    shutdown: CancellationToken,
    stats: FrontierStats,
}

impl Shared {
    fn visited_set(&self) -> MutexGuard<'_, HashSet<String>> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_visited(&self, address: &str) -> bool {
        self.visited_set().contains(address)
    }

    /// Atomically records `address` as visited; false if it already was
    fn claim(&self, address: &str) -> bool {
        self.visited_set().insert(address.to_string())
    }

    fn enqueue(&self, address: String) {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        if self.queue_tx.send(address).is_err() {
            // Receiver lives as long as `self`; this only happens mid-teardown.
            self.finish_one();
        }
    }

    fn finish_one(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            tracing::debug!("No outstanding work left");
            self.exhausted.cancel();
        }
    }

    async fn dequeue(&self) -> Option<String> {
        self.queue_rx.lock().await.recv().await
    }
}

/// Releases one unit of outstanding work when dropped, even on panic
struct WorkGuard<'a> {
    shared: &'a Shared,
}

impl Drop for WorkGuard<'_> {
    fn drop(&mut self) {
        self.shared.finish_one();
    }
}

/// Scheduler owning the work queue, the visited set and the worker pool
///
/// A frontier serves exactly one run. `schedule` seeds it, `start` drives it
/// to termination, and `visited` reads the result.
pub struct Frontier {
    shared: Arc<Shared>,
    fetcher: Arc<dyn Fetcher>,
    config: CrawlerConfig,
}

impl Frontier {
    /// Creates an idle frontier
    ///
    /// # Arguments
    ///
    /// * `config` - Worker count, idle wait, run ceiling and shutdown grace
    /// * `fetcher` - Content source every worker fetches through
    pub fn new(config: CrawlerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();

        Self {
            shared: Arc::new(Shared {
                visited: Mutex::new(HashSet::new()),
                queue_tx,
                queue_rx: tokio::sync::Mutex::new(queue_rx),
                outstanding: AtomicUsize::new(0),
                state: SharedFrontierState::new(),
                exhausted: CancellationToken::new(),
                shutdown: CancellationToken::new(),
                stats: FrontierStats::default(),
            }),
            fetcher,
            config,
        }
    }

    /// Enqueues an address unless it was already visited
    ///
    /// Ignored once the frontier has begun draining.
    pub fn schedule(&self, address: &str) {
        let state = self.shared.state.get();
        if !state.accepts_work() {
            tracing::debug!(address, %state, "Ignoring schedule on a finished frontier");
            return;
        }

        if self.shared.is_visited(address) {
            return;
        }

        self.shared.enqueue(address.to_string());
    }

    /// Runs the crawl until no work remains or the run ceiling expires
    ///
    /// Only the first call does anything; later calls return immediately.
    pub async fn start(&self, pipeline: Pipeline, scope: Arc<dyn Scope>) {
        if !self
            .shared
            .state
            .advance(FrontierState::Idle, FrontierState::Running)
        {
            tracing::debug!(state = %self.shared.state.get(), "Frontier already started");
            return;
        }

        let threads = self.config.threads.max(1);
        tracing::info!(
            threads,
            queued = self.shared.outstanding.load(Ordering::Acquire),
            "Starting frontier"
        );

        if self.shared.outstanding.load(Ordering::Acquire) == 0 {
            self.shared.exhausted.cancel();
        }

        let pipeline: Arc<[Arc<dyn Processor>]> = pipeline.into();
        let mut workers = JoinSet::new();
        for id in 0..threads {
            workers.spawn(worker_loop(
                id,
                self.shared.clone(),
                self.fetcher.clone(),
                pipeline.clone(),
                scope.clone(),
                self.config.idle_timeout(),
            ));
        }

        let finished = tokio::time::timeout(self.config.max_run(), join_all(&mut workers))
            .await
            .is_ok();

        if !finished {
            tracing::warn!(
                max_run = ?self.config.max_run(),
                "Run ceiling reached, stopping workers"
            );
            self.shared
                .state
                .advance(FrontierState::Running, FrontierState::Draining);
            self.shared.shutdown.cancel();

            let grace = self.config.shutdown_grace();
            if tokio::time::timeout(grace, join_all(&mut workers))
                .await
                .is_err()
            {
                tracing::warn!(?grace, "Workers did not stop in time, aborting them");
                workers.abort_all();
                join_all(&mut workers).await;
            }
        }

        self.shared
            .state
            .advance(FrontierState::Running, FrontierState::Draining);
        self.shared
            .state
            .advance(FrontierState::Draining, FrontierState::Terminated);

        tracing::info!(
            visited = self.shared.visited_set().len(),
            "Frontier terminated"
        );
    }

    /// Snapshot of every address claimed so far
    ///
    /// Final only once `state()` is `Terminated`.
    pub fn visited(&self) -> HashSet<String> {
        self.shared.visited_set().clone()
    }

    pub fn state(&self) -> FrontierState {
        self.shared.state.get()
    }

    /// Addresses queued or in flight
    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> CrawlStatistics {
        let visited = self.shared.visited_set().len();
        self.shared.stats.snapshot(visited)
    }
}

/// Waits for every worker, logging the ones that panicked
async fn join_all(workers: &mut JoinSet<()>) {
    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            if e.is_panic() {
                tracing::error!("Worker panicked: {}", e);
            }
        }
    }
}

async fn worker_loop(
    id: usize,
    shared: Arc<Shared>,
    fetcher: Arc<dyn Fetcher>,
    pipeline: Arc<[Arc<dyn Processor>]>,
    scope: Arc<dyn Scope>,
    idle_timeout: Duration,
) {
    tracing::debug!(worker = id, "Worker started");

    loop {
        let next = tokio::select! {
            biased;
            _ = shared.shutdown.cancelled() => break,
            _ = shared.exhausted.cancelled() => break,
            received = tokio::time::timeout(idle_timeout, shared.dequeue()) => received,
        };

        match next {
            Ok(Some(address)) => {
                let _guard = WorkGuard { shared: &*shared };
                process_address(&shared, fetcher.as_ref(), &pipeline, scope.as_ref(), address)
                    .await;
            }
            Ok(None) => break,
            Err(_) => {
                if shared.outstanding.load(Ordering::Acquire) == 0 {
                    break;
                }
                tracing::trace!(worker = id, "Queue idle while work is in flight");
            }
        }
    }

    shared
        .state
        .advance(FrontierState::Running, FrontierState::Draining);
    tracing::debug!(worker = id, "Worker exiting");
}

/// Claim-then-fetch for one address
///
/// Every failure here is contained: the address stays visited and the
/// worker moves on.
async fn process_address(
    shared: &Shared,
    fetcher: &dyn Fetcher,
    pipeline: &[Arc<dyn Processor>],
    scope: &dyn Scope,
    address: String,
) {
    if !shared.claim(&address) {
        FrontierStats::bump(&shared.stats.duplicate_claims);
        tracing::trace!(address = %address, "Already claimed by another worker");
        return;
    }

    let content = match fetcher.fetch(&address, &shared.shutdown).await {
        Ok(content) => content,
        Err(e) if e.is_cancelled() => {
            tracing::debug!(address = %address, "Fetch abandoned on shutdown");
            return;
        }
        Err(e) => {
            FrontierStats::bump(&shared.stats.fetch_failures);
            tracing::warn!(address = %address, error = %e, "Failed to fetch");
            return;
        }
    };
    FrontierStats::bump(&shared.stats.fetched);

    let output = match panic::catch_unwind(AssertUnwindSafe(|| {
        run_pipeline(pipeline, &content, &address)
    })) {
        Ok(output) => output,
        Err(_) => {
            FrontierStats::bump(&shared.stats.processing_failures);
            tracing::warn!(address = %address, "Pipeline panicked");
            return;
        }
    };
    drop(content);

    if output.failures > 0 {
        shared
            .stats
            .processing_failures
            .fetch_add(output.failures, Ordering::Relaxed);
    }

    tracing::debug!(
        address = %address,
        found = output.discovered.len(),
        "Processed"
    );

    for discovered in output.discovered {
        if !scope.is_in_scope(&discovered) {
            FrontierStats::bump(&shared.stats.out_of_scope);
            continue;
        }

        if shared.is_visited(&discovered) {
            continue;
        }

        FrontierStats::bump(&shared.stats.discovered);
        shared.enqueue(discovered);
    }
}
