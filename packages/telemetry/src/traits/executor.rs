//! Executor trait for running per-target units concurrently.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::UnitError;
use crate::types::report::TargetResult;

/// One fetch+extract unit of work for a single target.
pub type Unit = BoxFuture<'static, TargetResult>;

/// Outcome of one unit: its result, or the reason it produced none.
pub type UnitOutcome = std::result::Result<TargetResult, UnitError>;

/// Runs a batch of units concurrently and joins them.
///
/// Implementations must:
/// - start every unit without waiting for earlier ones to finish
/// - return exactly one outcome per unit, at the unit's input index
/// - contain a panicking unit so its siblings keep running
///
/// - `TaskExecutor` - cooperative tokio tasks
/// - `ThreadExecutor` - blocking thread pool
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run all units; `outcomes[i]` belongs to `units[i]`.
    async fn run_all(&self, units: Vec<Unit>) -> Vec<UnitOutcome>;

    /// Get the executor name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
