//! Executor backends.
//!
//! # Available Executors
//!
//! - `TaskExecutor` - one tokio task per unit (default)
//! - `ThreadExecutor` - one blocking-pool thread per unit
//!
//! Both keep outcome order equal to input order and turn a panicking unit
//! into a [`UnitError`](crate::error::UnitError) instead of unwinding into
//! the caller.

mod task;
mod thread;

use std::sync::Arc;

pub use task::TaskExecutor;
pub use thread::ThreadExecutor;

pub use crate::traits::executor::{Executor, Unit, UnitOutcome};
use crate::types::config::ExecutorKind;

/// Build the backend named by `kind`.
pub fn executor_for(kind: ExecutorKind) -> Arc<dyn Executor> {
    match kind {
        ExecutorKind::Task => Arc::new(TaskExecutor::new()),
        ExecutorKind::Thread => Arc::new(ThreadExecutor::new()),
    }
}
