//! Fetcher trait for retrieving raw markup from a target.
//!
//! # Usage
//!
//! ```rust,ignore
//! use telemetry::traits::fetcher::Fetcher;
//!
//! let document = fetcher.fetch(&target).await?;
//! let values = extractor.extract(&document.content, target.fields());
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::FetchResult;
use crate::types::target::Target;

/// Raw markup returned by a successful fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Address that was requested
    pub address: String,

    /// Response body
    pub content: String,

    /// Final HTTP status
    pub status: u16,

    /// Attempts made, including the successful one
    pub attempts: u32,

    /// When the body finished downloading
    pub fetched_at: DateTime<Utc>,
}

impl RawDocument {
    /// Create a document for a first-attempt 200 response.
    pub fn new(address: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            content: content.into(),
            status: 200,
            attempts: 1,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn content_length(&self) -> usize {
        self.content.len()
    }
}

/// Retrieves the markup for one target.
///
/// Implementations own the timeout and retry policy. A returned error is
/// final: the orchestrator never retries.
///
/// - `HttpFetcher` - reqwest with timeout and backoff
/// - `MockFetcher` - canned documents and failures for tests
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the target's address.
    async fn fetch(&self, target: &Target) -> FetchResult<RawDocument>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, target: &Target) -> FetchResult<RawDocument> {
        (**self).fetch(target).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_document_builder() {
        let doc = RawDocument::new("http://station.example", "<span id=\"x\">1</span>")
            .with_status(200)
            .with_attempts(2);

        assert_eq!(doc.address, "http://station.example");
        assert_eq!(doc.attempts, 2);
        assert_eq!(doc.content_length(), 21);
    }
}
