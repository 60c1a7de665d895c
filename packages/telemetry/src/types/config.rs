//! Configuration types for fetching and scheduling.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Statuses worth another attempt.
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Timeout and retry policy applied to every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchPolicy {
    /// Overall per-attempt timeout (connect + read).
    ///
    /// Default: 10 seconds.
    pub timeout: Duration,

    /// Connection establishment timeout.
    ///
    /// Default: 5 seconds.
    pub connect_timeout: Duration,

    /// Total attempts including the first one.
    ///
    /// Default: 3.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles for each further retry.
    ///
    /// Default: 500 ms.
    pub backoff_base: Duration,

    /// Statuses that trigger a retry. Anything else fails immediately.
    pub retry_statuses: Vec<u16>,

    /// User-Agent header sent with each request.
    pub user_agent: String,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            user_agent: "SolarTelemetry/1.0".to_string(),
        }
    }
}

impl FetchPolicy {
    /// Create a policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn with_retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }

    pub fn is_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Reject values that would make fetching unbounded or impossible.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidPolicy(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidPolicy(
                "timeouts must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Backend used to run per-target units concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Cooperative tokio tasks
    #[default]
    Task,
    /// Blocking thread pool, one thread per unit
    Thread,
}

impl FromStr for ExecutorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" | "tasks" | "async" => Ok(ExecutorKind::Task),
            "thread" | "threads" => Ok(ExecutorKind::Thread),
            other => Err(ConfigError::UnknownExecutor(other.to_string())),
        }
    }
}
