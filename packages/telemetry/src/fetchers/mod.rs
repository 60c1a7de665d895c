//! Fetcher implementations.
//!
//! # Available Fetchers
//!
//! - `HttpFetcher` - reqwest GET with timeout and retry policy
//! - `MockFetcher` - For testing
//!
//! # Example
//!
//! ```rust,ignore
//! use telemetry::fetchers::HttpFetcher;
//! use telemetry::FetchPolicy;
//!
//! let fetcher = HttpFetcher::new(FetchPolicy::default())?;
//! let document = fetcher.fetch(&target).await?;
//! ```

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::{MockFetcher, MockResponse};

// Re-export from traits for convenience
pub use crate::traits::fetcher::{Fetcher, RawDocument};
