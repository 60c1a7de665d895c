//! Cooperative task executor.

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use crate::error::UnitError;
use crate::traits::executor::{Executor, Unit, UnitOutcome};

/// Spawns each unit as its own tokio task and joins them all.
///
/// Units share the runtime's worker threads; they only yield at network
/// I/O and backoff sleeps.
#[derive(Debug, Default, Clone)]
pub struct TaskExecutor;

impl TaskExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Executor for TaskExecutor {
    async fn run_all(&self, units: Vec<Unit>) -> Vec<UnitOutcome> {
        debug!(units = units.len(), "Spawning tasks");

        let handles: Vec<_> = units.into_iter().map(tokio::spawn).collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.map_err(UnitError::from))
            .collect()
    }

    fn name(&self) -> &str {
        "task"
    }
}
