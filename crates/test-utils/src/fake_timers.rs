use std::sync::{Arc, Mutex};
use std::time::Duration;

use chefdag::engine::CompletionSender;
use chefdag::errors::{ChefdagError, Result};
use chefdag::exec::{TimerBackend, TimerHandle};
use chefdag::types::StepId;

/// A timer backend that:
/// - records which steps were scheduled, and with which delay
/// - reports completion immediately, ignoring the delay.
#[derive(Debug, Clone, Default)]
pub struct ImmediateTimers {
    scheduled: Arc<Mutex<Vec<(StepId, Duration)>>>,
}

impl ImmediateTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Vec<(StepId, Duration)> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl TimerBackend for ImmediateTimers {
    fn schedule(
        &mut self,
        step: StepId,
        after: Duration,
        completions: CompletionSender,
    ) -> Result<TimerHandle> {
        self.scheduled.lock().unwrap().push((step, after));
        completions.notify(step);
        Ok(TimerHandle::untracked(step))
    }
}

/// A timer backend that accepts the first `capacity` timers, never fires
/// them, and then reports exhaustion.
#[derive(Debug, Clone)]
pub struct ExhaustedTimers {
    capacity: usize,
    accepted: Vec<StepId>,
}

impl ExhaustedTimers {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            accepted: Vec::new(),
        }
    }
}

impl TimerBackend for ExhaustedTimers {
    fn schedule(
        &mut self,
        step: StepId,
        _after: Duration,
        _completions: CompletionSender,
    ) -> Result<TimerHandle> {
        if self.accepted.len() >= self.capacity {
            return Err(ChefdagError::TimerResourceExhausted {
                step,
                reason: format!("fake backend limited to {} timers", self.capacity),
            });
        }
        self.accepted.push(step);
        Ok(TimerHandle::untracked(step))
    }
}

/// A timer backend that accepts every timer and never fires any of them.
#[derive(Debug, Clone, Default)]
pub struct SilentTimers;

impl TimerBackend for SilentTimers {
    fn schedule(
        &mut self,
        step: StepId,
        _after: Duration,
        _completions: CompletionSender,
    ) -> Result<TimerHandle> {
        Ok(TimerHandle::untracked(step))
    }
}
