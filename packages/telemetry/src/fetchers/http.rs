//! HTTP fetcher with timeout and retry.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult, FetchError, FetchResult};
use crate::traits::fetcher::{Fetcher, RawDocument};
use crate::types::config::FetchPolicy;
use crate::types::target::Target;

/// Fetches a target's page with a plain GET.
///
/// Transient outcomes (connection failures and the policy's retry statuses)
/// are retried with exponential backoff up to `max_attempts`. Timeouts and
/// any other status fail immediately.
///
/// # Example
///
/// ```rust,ignore
/// use telemetry::fetchers::HttpFetcher;
/// use telemetry::FetchPolicy;
///
/// let fetcher = HttpFetcher::new(FetchPolicy::default())?;
/// let document = fetcher.fetch(&target).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl HttpFetcher {
    /// Create a fetcher whose client enforces the policy's timeouts.
    pub fn new(policy: FetchPolicy) -> ConfigResult<Self> {
        policy.validate()?;

        let client = reqwest::Client::builder()
            .timeout(policy.timeout)
            .connect_timeout(policy.connect_timeout)
            .user_agent(policy.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::InvalidPolicy(format!("HTTP client: {}", e)))?;

        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Make a single GET request.
    async fn attempt(&self, address: &str, attempt: u32) -> FetchResult<RawDocument> {
        debug!(address = %address, attempt, "HTTP fetch starting");

        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(|e| transport_error(address, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                address: address.to_string(),
                status: status.as_u16(),
                attempts: attempt,
            });
        }

        let content = response
            .text()
            .await
            .map_err(|e| transport_error(address, e))?;

        Ok(RawDocument {
            address: address.to_string(),
            content,
            status: status.as_u16(),
            attempts: attempt,
            fetched_at: Utc::now(),
        })
    }
}

fn transport_error(address: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            address: address.to_string(),
        }
    } else {
        FetchError::Network {
            address: address.to_string(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> FetchResult<RawDocument> {
        let address = target.address();
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(address, attempt).await {
                Ok(document) => {
                    info!(
                        address = %address,
                        attempts = attempt,
                        content_length = document.content_length(),
                        "Fetched target"
                    );
                    return Ok(document);
                }
                Err(e) if attempt < max_attempts && e.is_transient(&self.policy.retry_statuses) => {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        address = %address,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(address = %address, attempt, error = %e, "Fetch failed");
                    return Err(e);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
