//! Shared HTTP transport with status-based retry
//!
//! Only responses whose status is in the retry list are retried; connection
//! errors and timeouts surface on the first attempt.

use crate::config::RetryConfig;
use crate::error::{EnrichError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Longest pause between two attempts
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Retry rule for transient HTTP statuses
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub total: u32,
    pub backoff_factor: f64,
    pub status_forcelist: Vec<u16>,
}

impl RetryPolicy {
    /// Single attempt, never retry
    pub fn none() -> Self {
        Self {
            total: 0,
            backoff_factor: 0.0,
            status_forcelist: Vec::new(),
        }
    }

    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.status_forcelist.contains(&status.as_u16())
    }

    /// Pause before the given retry (1-based)
    ///
    /// The first retry goes out immediately; after that the wait doubles from
    /// `2 * backoff_factor` seconds.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let secs = self.backoff_factor * 2f64.powi(retry as i32 - 1);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs.min(BACKOFF_MAX.as_secs_f64()))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            total: config.total,
            backoff_factor: config.backoff_factor,
            status_forcelist: config.status_forcelist.clone(),
        }
    }
}

/// A configured client plus its retry rule
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vocab-enrich/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, retry })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// GET a URL and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let mut retries = 0;

        loop {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                return Ok(serde_json::from_str(&body)?);
            }

            if retries < self.retry.total && self.retry.is_retryable(status) {
                retries += 1;
                let wait = retry_after(&response).unwrap_or_else(|| self.retry.backoff(retries));
                warn!(
                    "{} returned {}, retrying after {:?} (attempt {}/{})",
                    url, status, wait, retries, self.retry.total
                );
                sleep(wait).await;
                continue;
            }

            debug!("{} failed with {}", url, status);
            return Err(EnrichError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
    }
}

/// `Retry-After` in whole seconds, honoured only for throttling statuses
fn retry_after(response: &Response) -> Option<Duration> {
    if !matches!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    ) {
        return None;
    }
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| Duration::from_secs(secs).min(BACKOFF_MAX))
}
