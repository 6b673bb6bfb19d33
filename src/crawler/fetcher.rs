//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler, including:
//! - The `Fetcher` contract the frontier calls through
//! - A reqwest-backed single-attempt fetcher with a per-attempt timeout
//! - A fixed-delay retry policy whose delay honors cancellation
//! - A wrapper that applies the retry policy to any fetcher

use crate::config::FetcherConfig;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Result of one successful fetch attempt
///
/// Non-2xx responses are still content: the status code travels with the
/// body and the pipeline decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    status_code: u16,
    body: String,
}

impl FetchedContent {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Produces content for an address
///
/// Implementations must stop promptly once `cancel` fires and report it as
/// `FetchError::Cancelled` instead of returning partial results.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str, cancel: &CancellationToken)
        -> FetchResult<FetchedContent>;
}

/// Fixed-delay retry policy for transient fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,

    /// Pause between two attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// Runs `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `op` receives the 1-based attempt number. The last error is returned
    /// once attempts are exhausted. Cancellation during the delay ends the
    /// loop with `FetchError::Cancelled`.
    pub async fn run<T, F, Fut>(
        &self,
        address: &str,
        cancel: &CancellationToken,
        mut op: F,
    ) -> FetchResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = FetchResult<T>>,
    {
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled {
                    address: address.to_string(),
                });
            }

            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        address,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Fetch attempt failed, retrying"
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => {
                            return Err(FetchError::Cancelled {
                                address: address.to_string(),
                            });
                        }
                        _ = tokio::time::sleep(self.delay) => {}
                    }

                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetcherConfig::default())
    }
}

/// Applies a `RetryPolicy` around another fetcher
#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: Fetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for RetryingFetcher<F> {
    async fn fetch(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> FetchResult<FetchedContent> {
        self.policy
            .run(address, cancel, |_| self.inner.fetch(address, cancel))
            .await
    }
}

/// Single-attempt fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> FetchResult<FetchedContent> {
        let url = Url::parse(address).map_err(|_| FetchError::InvalidAddress {
            address: address.to_string(),
        })?;

        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| classify_error(address, e))?;

            let status_code = response.status().as_u16();
            let body = response.text().await.map_err(|e| FetchError::Body {
                address: address.to_string(),
                source: e,
            })?;

            tracing::trace!(address, status_code, bytes = body.len(), "Fetched");
            Ok::<_, FetchError>(FetchedContent::new(status_code, body))
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled {
                address: address.to_string(),
            }),
            result = request => result,
        }
    }
}

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `config` - Fetcher configuration (timeout, user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.timeout_ms);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the default fetcher: HTTP with the configured retry policy
pub fn build_fetcher(
    config: &FetcherConfig,
) -> Result<RetryingFetcher<HttpFetcher>, reqwest::Error> {
    Ok(RetryingFetcher::new(
        HttpFetcher::new(config)?,
        RetryPolicy::from_config(config),
    ))
}

fn classify_error(address: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            address: address.to_string(),
        }
    } else {
        FetchError::Http {
            address: address.to_string(),
            source: error,
        }
    }
}
