//! Fetch-extract-aggregate pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Fan-out of one fetch+extract unit per target (orchestrate)
//! - Field extraction from markup (extract)
//! - Cross-target sums (aggregate)
//!
//! Everything it needs is passed in through a [`PipelineContext`]; there is no
//! global client or registry.

pub mod aggregate;
pub mod extract;
pub mod orchestrate;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::{ConfigResult, Result};
use crate::executors::{executor_for, TaskExecutor};
use crate::fetchers::HttpFetcher;
use crate::traits::{executor::Executor, fetcher::Fetcher};
use crate::types::{
    config::{ExecutorKind, FetchPolicy},
    field::FieldId,
    report::Report,
    target::TargetRegistry,
};

pub use aggregate::{aggregate, parse_numeric};
pub use extract::Extractor;
pub use orchestrate::{run_unit, Orchestrator, UnitState};

/// Service context: the collaborators shared by every unit of a run.
#[derive(Clone)]
pub struct PipelineContext {
    fetcher: Arc<dyn Fetcher>,
    executor: Arc<dyn Executor>,
    aggregate_fields: Vec<FieldId>,
}

impl PipelineContext {
    /// Create a context around `fetcher` with the task executor and the
    /// default aggregate fields.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            executor: Arc::new(TaskExecutor::new()),
            aggregate_fields: FieldId::DEFAULT_AGGREGATES.to_vec(),
        }
    }

    /// Create an HTTP-backed context from a policy.
    pub fn http(policy: FetchPolicy, executor: ExecutorKind) -> ConfigResult<Self> {
        let fetcher = HttpFetcher::new(policy)?;
        Ok(Self::new(Arc::new(fetcher)).with_executor(executor_for(executor)))
    }

    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_aggregate_fields(mut self, fields: impl Into<Vec<FieldId>>) -> Self {
        self.aggregate_fields = fields.into();
        self
    }

    pub fn aggregate_fields(&self) -> &[FieldId] {
        &self.aggregate_fields
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }
}

/// The main entry point: registry in, report out.
///
/// # Example
///
/// ```rust,ignore
/// let context = PipelineContext::http(FetchPolicy::default(), ExecutorKind::Task)?;
/// let pipeline = Pipeline::new(context);
///
/// let report = pipeline.report(&TargetRegistry::builtin()).await?;
/// println!("today: {} kWh", report.total(FieldId::DailyPower));
/// ```
#[derive(Clone)]
pub struct Pipeline {
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(context: PipelineContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Fetch, extract and aggregate every target in `registry`.
    ///
    /// Fails only when the registry's tag cannot be used for extraction;
    /// per-target failures are recorded inside the report.
    pub async fn report(&self, registry: &TargetRegistry) -> Result<Report> {
        let extractor = Extractor::new(registry.tag())?;
        let orchestrator = Orchestrator::new(
            Arc::clone(&self.context.fetcher),
            Arc::clone(&self.context.executor),
        );

        let results = orchestrator.run(registry.targets(), &extractor).await;
        let aggregates = aggregate(&results, &self.context.aggregate_fields);

        info!(
            targets = results.len(),
            aggregates = ?aggregates,
            "Report assembled"
        );

        Ok(Report::new(results, aggregates))
    }

    /// Load the registry (file or built-in) and build a report.
    ///
    /// A registry that cannot be read is the only fatal error.
    pub async fn report_from(&self, registry_path: Option<&Path>) -> Result<Report> {
        let registry = TargetRegistry::load_or_builtin(registry_path)?;
        self.report(&registry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::MockFetcher;

    #[test]
    fn test_context_defaults() {
        let context = PipelineContext::new(Arc::new(MockFetcher::new()));

        assert_eq!(context.fetcher().name(), "mock");
        assert_eq!(context.executor().name(), "task");
        assert_eq!(context.aggregate_fields(), FieldId::DEFAULT_AGGREGATES.as_slice());
    }

    #[test]
    fn test_http_context_uses_selected_executor() {
        let context = PipelineContext::http(FetchPolicy::default(), ExecutorKind::Thread)
            .unwrap()
            .with_aggregate_fields(vec![FieldId::TotalPrice]);
        let pipeline = Pipeline::new(context);

        assert_eq!(pipeline.context().executor().name(), "thread");
        assert_eq!(pipeline.context().fetcher().name(), "http");
        assert_eq!(pipeline.context().aggregate_fields(), &[FieldId::TotalPrice]);
    }

    #[test]
    fn test_http_context_rejects_invalid_policy() {
        let policy = FetchPolicy::default().with_max_attempts(0);
        assert!(PipelineContext::http(policy, ExecutorKind::Task).is_err());
    }
}
