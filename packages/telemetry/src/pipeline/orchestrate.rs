//! Concurrent fan-out of fetch+extract units, one per target.
//!
//! Each unit moves through `Pending -> Fetching -> (Extracting | Failed) -> Done`.
//! Retries live in the fetcher; this layer only converts failures into
//! per-field error values and keeps results in registry order.

use futures::FutureExt;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::pipeline::extract::Extractor;
use crate::traits::executor::{Executor, Unit};
use crate::traits::fetcher::Fetcher;
use crate::types::field::ErrorKind;
use crate::types::report::TargetResult;
use crate::types::target::Target;

/// Lifecycle of a single unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Pending,
    Fetching,
    Extracting,
    Failed,
    Done,
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitState::Pending => "pending",
            UnitState::Fetching => "fetching",
            UnitState::Extracting => "extracting",
            UnitState::Failed => "failed",
            UnitState::Done => "done",
        };
        f.write_str(name)
    }
}

fn transition(address: &str, state: UnitState) {
    debug!(address = %address, state = %state, "Unit state");
}

/// Fetch one target and extract its fields. Never returns an error: transport
/// failures become a result whose fields all carry the same error value.
pub async fn run_unit(fetcher: &dyn Fetcher, extractor: &Extractor, target: &Target) -> TargetResult {
    let address = target.address();
    let started = Instant::now();

    transition(address, UnitState::Fetching);
    let result = match fetcher.fetch(target).await {
        Ok(document) => {
            transition(address, UnitState::Extracting);
            let fields = extractor.extract(&document.content, target.fields());
            TargetResult::extracted(target, fields, started.elapsed())
        }
        Err(e) => {
            transition(address, UnitState::Failed);
            TargetResult::failed(target, e.kind(), e.to_string(), started.elapsed())
        }
    };
    transition(address, UnitState::Done);

    result
}

/// Fans out one unit per target on an [`Executor`] and joins them.
#[derive(Clone)]
pub struct Orchestrator {
    fetcher: Arc<dyn Fetcher>,
    executor: Arc<dyn Executor>,
}

impl Orchestrator {
    pub fn new(fetcher: Arc<dyn Fetcher>, executor: Arc<dyn Executor>) -> Self {
        Self { fetcher, executor }
    }

    /// Run every target concurrently.
    ///
    /// The output has exactly one result per target, at the target's index,
    /// whatever order the units finish in and however many of them fail.
    pub async fn run(&self, targets: &[Target], extractor: &Extractor) -> Vec<TargetResult> {
        info!(
            targets = targets.len(),
            fetcher = self.fetcher.name(),
            executor = self.executor.name(),
            "Starting fan-out"
        );
        let started = Instant::now();

        let extractor = Arc::new(extractor.clone());
        let units: Vec<Unit> = targets
            .iter()
            .map(|target| {
                transition(target.address(), UnitState::Pending);
                let fetcher = Arc::clone(&self.fetcher);
                let extractor = Arc::clone(&extractor);
                let target = target.clone();
                async move { run_unit(fetcher.as_ref(), &extractor, &target).await }.boxed()
            })
            .collect();

        let mut outcomes = self.executor.run_all(units).await.into_iter();

        // Each target owns the slot at its index; an outcome that is an
        // error or absent still yields a full-shaped result.
        let results: Vec<TargetResult> = targets
            .iter()
            .map(|target| match outcomes.next() {
                Some(Ok(result)) => result,
                Some(Err(e)) => {
                    warn!(address = %target.address(), error = %e, "Unit aborted");
                    TargetResult::failed(target, ErrorKind::Internal, e.to_string(), started.elapsed())
                }
                None => {
                    warn!(address = %target.address(), "Executor returned no outcome");
                    TargetResult::failed(
                        target,
                        ErrorKind::Internal,
                        "no outcome from executor",
                        started.elapsed(),
                    )
                }
            })
            .collect();

        info!(
            targets = results.len(),
            failed = results.iter().filter(|r| r.is_failed()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fan-out complete"
        );

        results
    }
}
