// src/exec/timer_task.rs

//! Body of a single step timer.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::engine::CompletionSender;
use crate::types::StepId;

/// Counts a timer as in flight until it fires or is aborted.
#[derive(Debug)]
pub struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl InFlightGuard {
    pub fn acquire(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self { counter }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Sleep for `after`, then record the completion of `step`.
///
/// Runs outside the control loop: it only appends one event and does no
/// logging or graph access. A closed queue means the run is gone, so the
/// event is dropped.
pub async fn run_timer(
    step: StepId,
    after: Duration,
    completions: CompletionSender,
    guard: InFlightGuard,
) {
    tokio::time::sleep(after).await;
    drop(guard);
    let _ = completions.notify(step);
}
