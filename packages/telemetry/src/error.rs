//! Typed errors for the telemetry library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Only configuration problems ever surface to callers of the pipeline.
//! Transport errors ([`FetchError`]) are contained per target and folded
//! into [`FieldValue::Error`](crate::types::field::FieldValue) values.

use thiserror::Error;

use crate::types::field::{ErrorKind, FieldId};

/// Top-level pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The target registry or fetch policy could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Registry file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Registry file is not valid JSON for the expected shape
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Address is not an absolute http(s) URL
    #[error("invalid target address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Field identifier is not part of the known set
    #[error("unknown field identifier: {0}")]
    UnknownField(String),

    /// Same identifier listed twice for one target
    #[error("duplicate field identifier {field} for {address}")]
    DuplicateField { address: String, field: String },

    /// Target lists no fields
    #[error("target {address} requests no fields")]
    NoFields { address: String },

    /// Element tag is not a usable selector
    #[error("invalid element tag: {0}")]
    InvalidTag(String),

    /// Fetch policy value out of range
    #[error("invalid fetch policy: {0}")]
    InvalidPolicy(String),

    /// Executor name not recognised
    #[error("unknown executor backend: {0}")]
    UnknownExecutor(String),
}

/// Errors that can occur while fetching one target.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, reset, DNS failure or a broken body stream
    #[error("network failure fetching {address}: {message}")]
    Network { address: String, message: String },

    /// Request exceeded the configured timeout
    #[error("timeout fetching {address}")]
    Timeout { address: String },

    /// Non-success status, either non-retryable or after retries ran out
    #[error("HTTP {status} from {address} after {attempts} attempt(s)")]
    HttpStatus {
        address: String,
        status: u16,
        attempts: u32,
    },
}

impl FetchError {
    /// Taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network { .. } => ErrorKind::Network,
            FetchError::Timeout { .. } => ErrorKind::Timeout,
            FetchError::HttpStatus { .. } => ErrorKind::HttpStatus,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Timeouts are never retried; a hung source costs one timeout, not
    /// `max_attempts` of them.
    pub fn is_transient(&self, retry_statuses: &[u16]) -> bool {
        match self {
            FetchError::Network { .. } => true,
            FetchError::Timeout { .. } => false,
            FetchError::HttpStatus { status, .. } => retry_statuses.contains(status),
        }
    }
}

/// A unit of work that ended without producing a result.
#[derive(Debug, Clone, Error)]
pub enum UnitError {
    /// The unit panicked
    #[error("unit panicked: {0}")]
    Panicked(String),

    /// The runtime dropped the unit before it finished
    #[error("unit cancelled")]
    Cancelled,
}

impl From<tokio::task::JoinError> for UnitError {
    fn from(err: tokio::task::JoinError) -> Self {
        if !err.is_panic() {
            return UnitError::Cancelled;
        }
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        UnitError::Panicked(message)
    }
}

/// Why a field value contributed nothing to an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The field was absent from the page
    #[error("field {0} missing")]
    Missing(FieldId),

    /// The target could not be fetched
    #[error("field carries {0} error")]
    Errored(ErrorKind),

    /// Text is not an integer once grouping separators are removed
    #[error("not an integer: {0:?}")]
    NotNumeric(String),

    /// Target did not request this field
    #[error("field not requested")]
    Absent,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
