// src/exec/backend.rs

//! Pluggable timer backend abstraction.
//!
//! The scheduler asks a `TimerBackend` to deliver a completion event for a
//! step after a delay, instead of spawning timers itself. Production uses
//! [`TokioTimerBackend`]; tests can swap in backends that fail or fire
//! immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::trace;

use crate::engine::CompletionSender;
use crate::errors::{ChefdagError, Result};
use crate::exec::timer_task::{InFlightGuard, run_timer};
use crate::types::StepId;

/// Trait abstracting how per-step timers are scheduled.
pub trait TimerBackend: Send {
    /// Arrange for `completions.notify(step)` to be called after `after`.
    ///
    /// Failing to schedule is fatal for the run; implementations must not
    /// silently drop a step.
    fn schedule(
        &mut self,
        step: StepId,
        after: Duration,
        completions: CompletionSender,
    ) -> Result<TimerHandle>;
}

/// In-flight timer owned by the scheduler while its step is `Running`.
#[derive(Debug)]
pub struct TimerHandle {
    step: StepId,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    pub fn from_task(step: StepId, task: &JoinHandle<()>) -> Self {
        Self {
            step,
            abort: Some(task.abort_handle()),
        }
    }

    /// A handle with nothing to cancel (e.g. a timer that already fired).
    pub fn untracked(step: StepId) -> Self {
        Self { step, abort: None }
    }

    pub fn is_finished(&self) -> bool {
        self.abort.as_ref().is_none_or(AbortHandle::is_finished)
    }

    /// Cancel the timer if it has not fired yet.
    pub fn release(self) {
        if self.is_finished() {
            return;
        }
        if let Some(abort) = self.abort {
            trace!(step = self.step, "aborting outstanding timer");
            abort.abort();
        }
    }
}

/// Timers backed by `tokio::time::sleep`, one lightweight task per step.
#[derive(Debug, Clone, Default)]
pub struct TokioTimerBackend {
    max_in_flight: Option<usize>,
    in_flight: Arc<AtomicUsize>,
}

impl TokioTimerBackend {
    pub fn new(max_in_flight: Option<usize>) -> Self {
        Self {
            max_in_flight,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Timers scheduled but not yet fired or aborted.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl TimerBackend for TokioTimerBackend {
    fn schedule(
        &mut self,
        step: StepId,
        after: Duration,
        completions: CompletionSender,
    ) -> Result<TimerHandle> {
        let runtime = Handle::try_current().map_err(|e| ChefdagError::TimerResourceExhausted {
            step,
            reason: e.to_string(),
        })?;

        if let Some(max) = self.max_in_flight {
            let current = self.in_flight();
            if current >= max {
                return Err(ChefdagError::TimerResourceExhausted {
                    step,
                    reason: format!("{current} timers already in flight (limit {max})"),
                });
            }
        }

        let guard = InFlightGuard::acquire(Arc::clone(&self.in_flight));
        let task = runtime.spawn(run_timer(step, after, completions, guard));

        Ok(TimerHandle::from_task(step, &task))
    }
}
