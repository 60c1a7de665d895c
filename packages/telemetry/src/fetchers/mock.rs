//! Mock fetcher for testing.
//!
//! Provides canned documents and failures keyed by target address.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{Fetcher, RawDocument};
use crate::types::target::Target;

/// What the mock returns for one address.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this body
    Content(String),
    /// Connection-level failure with this message
    Network(String),
    /// Request timed out
    Timeout,
    /// Final non-success status
    Status(u16),
    /// The fetch panics with this message
    Panic(String),
}

#[derive(Debug, Clone)]
struct Canned {
    response: MockResponse,
    delay: Duration,
}

/// Mock fetcher for testing.
///
/// # Example
///
/// ```rust
/// use telemetry::fetchers::{MockFetcher, MockResponse};
///
/// let mock = MockFetcher::new()
///     .with_content("http://a.example", "<span id=\"lbl_daily_pw\">10</span>")
///     .with_response("http://b.example", MockResponse::Timeout);
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    /// Canned responses indexed by address
    responses: Arc<RwLock<HashMap<String, Canned>>>,
    /// Addresses in the order they were fetched
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response for an address.
    pub fn set_response(&self, address: impl Into<String>, response: MockResponse) {
        let mut responses = self.responses.write().unwrap();
        let entry = responses.entry(address.into()).or_insert(Canned {
            response: response.clone(),
            delay: Duration::ZERO,
        });
        entry.response = response;
    }

    /// Delay the response for an address (applies before success or failure).
    pub fn set_delay(&self, address: impl Into<String>, delay: Duration) {
        let mut responses = self.responses.write().unwrap();
        let entry = responses.entry(address.into()).or_insert(Canned {
            response: MockResponse::Content(String::new()),
            delay,
        });
        entry.delay = delay;
    }

    /// Respond to `address` with a 200 and `content` (builder pattern).
    pub fn with_content(self, address: impl Into<String>, content: impl Into<String>) -> Self {
        self.set_response(address, MockResponse::Content(content.into()));
        self
    }

    /// Respond to `address` with `response` (builder pattern).
    pub fn with_response(self, address: impl Into<String>, response: MockResponse) -> Self {
        self.set_response(address, response);
        self
    }

    /// Delay the response for `address` (builder pattern).
    pub fn with_delay(self, address: impl Into<String>, delay: Duration) -> Self {
        self.set_delay(address, delay);
        self
    }

    /// Get the number of fetches made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get the addresses fetched, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, target: &Target) -> FetchResult<RawDocument> {
        let address = target.address().to_string();
        self.calls.write().unwrap().push(address.clone());

        let canned = self.responses.read().unwrap().get(&address).cloned();
        let Some(canned) = canned else {
            return Err(FetchError::Network {
                address,
                message: "no canned response".to_string(),
            });
        };

        if !canned.delay.is_zero() {
            tokio::time::sleep(canned.delay).await;
        }

        match canned.response {
            MockResponse::Content(content) => Ok(RawDocument::new(address, content)),
            MockResponse::Network(message) => Err(FetchError::Network { address, message }),
            MockResponse::Timeout => Err(FetchError::Timeout { address }),
            MockResponse::Status(status) => Err(FetchError::HttpStatus {
                address,
                status,
                attempts: 1,
            }),
            MockResponse::Panic(message) => panic!("{}", message),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
