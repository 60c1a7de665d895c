use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use telemetry::{ExecutorKind, FetchPolicy, FieldId};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub targets_file: Option<PathBuf>,
    pub fetch_policy: FetchPolicy,
    pub executor: ExecutorKind,
    pub aggregate_fields: Vec<FieldId>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = FetchPolicy::default();

        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let timeout = match lookup("FETCH_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.parse().context("FETCH_TIMEOUT_SECS must be a number")?),
            None => defaults.timeout,
        };
        let connect_timeout = match lookup("FETCH_CONNECT_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .context("FETCH_CONNECT_TIMEOUT_SECS must be a number")?,
            ),
            None => defaults.connect_timeout,
        };
        let max_attempts = match lookup("FETCH_MAX_ATTEMPTS") {
            Some(v) => v.parse().context("FETCH_MAX_ATTEMPTS must be a number")?,
            None => defaults.max_attempts,
        };
        let backoff = match lookup("FETCH_BACKOFF_MS") {
            Some(v) => Duration::from_millis(v.parse().context("FETCH_BACKOFF_MS must be a number")?),
            None => defaults.backoff_base,
        };
        let user_agent = lookup("FETCH_USER_AGENT").unwrap_or_else(|| defaults.user_agent.clone());

        let fetch_policy = FetchPolicy::new()
            .with_timeout(timeout)
            .with_connect_timeout(connect_timeout)
            .with_max_attempts(max_attempts)
            .with_backoff_base(backoff)
            .with_user_agent(user_agent);
        fetch_policy.validate().context("Invalid fetch policy")?;

        let executor = match lookup("TELEMETRY_EXECUTOR") {
            Some(v) => v.parse().context("TELEMETRY_EXECUTOR must be task or thread")?,
            None => ExecutorKind::default(),
        };

        let aggregate_fields = match lookup("AGGREGATE_FIELDS") {
            Some(v) => v
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<FieldId>())
                .collect::<Result<Vec<_>, _>>()
                .context("AGGREGATE_FIELDS contains an unknown field")?,
            None => FieldId::DEFAULT_AGGREGATES.to_vec(),
        };

        Ok(Self {
            port,
            targets_file: lookup("TELEMETRY_TARGETS_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            fetch_policy,
            executor,
            aggregate_fields,
        })
    }
}
