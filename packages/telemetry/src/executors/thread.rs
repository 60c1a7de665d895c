//! Thread-pool executor.

use async_trait::async_trait;
use futures::future::join_all;
use tokio::runtime::Handle;
use tracing::debug;

use crate::error::UnitError;
use crate::traits::executor::{Executor, Unit, UnitOutcome};

/// Runs each unit to completion on its own blocking-pool thread.
///
/// Every thread drives its unit with `Handle::block_on`, so network I/O still
/// goes through the shared runtime's reactor and the shared HTTP client stays
/// usable. A unit that blocks its thread never stalls a sibling.
#[derive(Debug, Default, Clone)]
pub struct ThreadExecutor;

impl ThreadExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Executor for ThreadExecutor {
    async fn run_all(&self, units: Vec<Unit>) -> Vec<UnitOutcome> {
        debug!(units = units.len(), "Dispatching units to blocking threads");

        let runtime = Handle::current();
        let handles: Vec<_> = units
            .into_iter()
            .map(|unit| {
                let runtime = runtime.clone();
                tokio::task::spawn_blocking(move || runtime.block_on(unit))
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.map_err(UnitError::from))
            .collect()
    }

    fn name(&self) -> &str {
        "thread"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field::{ErrorKind, FieldId};
    use crate::types::report::TargetResult;
    use crate::types::target::Target;
    use futures::FutureExt;
    use std::time::{Duration, Instant};

    fn result_for(n: usize) -> TargetResult {
        let target = Target::new(format!("http://s{}.example", n), [FieldId::TodayPrice]).unwrap();
        TargetResult::failed(&target, ErrorKind::Network, "x", Duration::ZERO)
    }

    async fn explode() -> TargetResult {
        panic!("thread unit exploded")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_units_run_in_parallel() {
        let units: Vec<Unit> = (0..3)
            .map(|n| {
                async move {
                    // Blocks the OS thread, not just the task
                    std::thread::sleep(Duration::from_millis(200));
                    result_for(n)
                }
                .boxed()
            })
            .collect();

        let start = Instant::now();
        let outcomes = ThreadExecutor::new().run_all(units).await;
        let elapsed = start.elapsed();

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.is_ok()));
        assert!(
            elapsed < Duration::from_millis(550),
            "units were serialized: {:?}",
            elapsed
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_order_and_panic_isolation() {
        let units: Vec<Unit> = vec![
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                result_for(0)
            }
            .boxed(),
            explode().boxed(),
            async { result_for(2) }.boxed(),
        ];

        let outcomes = ThreadExecutor::new().run_all(units).await;

        assert_eq!(outcomes[0].as_ref().unwrap().address, "http://s0.example");
        assert!(matches!(&outcomes[1], Err(UnitError::Panicked(_))));
        assert_eq!(outcomes[2].as_ref().unwrap().address, "http://s2.example");
    }
}
