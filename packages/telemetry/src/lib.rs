//! Solar Telemetry Pipeline
//!
//! Fetches live telemetry pages from several monitoring stations at once,
//! reads a fixed set of labeled fields from each, and sums the numeric ones
//! across stations.
//!
//! # Guarantees
//!
//! - One result per target, in registry order, whatever finishes first
//! - A failing, slow or panicking target never changes another target's result
//! - A field absent from a page is reported as `Missing`, not as a failure
//! - Aggregates always complete; unusable values count as zero
//!
//! # Usage
//!
//! ```rust,ignore
//! use telemetry::{ExecutorKind, FetchPolicy, FieldId, Pipeline, PipelineContext, TargetRegistry};
//!
//! let context = PipelineContext::http(FetchPolicy::default(), ExecutorKind::Task)?;
//! let pipeline = Pipeline::new(context);
//!
//! let report = pipeline.report(&TargetRegistry::builtin()).await?;
//! for result in &report.results {
//!     println!("{}: {:?}", result.address, result.get(FieldId::DailyPower));
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Fetcher, Executor)
//! - [`types`] - Targets, field values, reports, policies
//! - [`pipeline`] - Extraction, orchestration and aggregation
//! - [`fetchers`] - Fetcher implementations (HttpFetcher, MockFetcher)
//! - [`executors`] - Executor backends (TaskExecutor, ThreadExecutor)
//! - [`testing`] - Markup builders and scenarios for tests

pub mod error;
pub mod executors;
pub mod fetchers;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, FetchError, ParseFailure, PipelineError, UnitError};
pub use traits::{
    executor::{Executor, Unit, UnitOutcome},
    fetcher::{Fetcher, RawDocument},
};
pub use types::{
    config::{ExecutorKind, FetchPolicy, DEFAULT_RETRY_STATUSES},
    field::{ErrorKind, FieldId, FieldValue},
    report::{Report, TargetResult, TargetStatus},
    target::{Target, TargetRegistry, DEFAULT_TAG},
};

// Re-export pipeline components
pub use pipeline::{
    aggregate, parse_numeric, run_unit, Extractor, Orchestrator, Pipeline, PipelineContext,
    UnitState,
};

// Re-export implementations
pub use executors::{executor_for, TaskExecutor, ThreadExecutor};
pub use fetchers::{HttpFetcher, MockFetcher, MockResponse};
