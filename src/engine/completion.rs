// src/engine/completion.rs

//! Hand-off of "step finished" events from timer tasks to the control loop.
//!
//! Producers only append a small fixed-size [`CompletionEvent`]; they never
//! touch the graph or produce output. The loop drains the queue as one batch
//! per poll cycle.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::Instant;

use crate::types::StepId;

/// A step's timer has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub step: StepId,
    pub fired_at: Instant,
}

/// Producer half, cloned into every timer task.
#[derive(Debug, Clone)]
pub struct CompletionSender {
    tx: mpsc::Sender<CompletionEvent>,
}

impl CompletionSender {
    /// Record that `step` finished. Never blocks.
    ///
    /// Returns `false` if the queue is closed (the run was torn down) or
    /// full, which cannot happen while each step completes at most once.
    pub fn notify(&self, step: StepId) -> bool {
        self.tx
            .try_send(CompletionEvent {
                step,
                fired_at: Instant::now(),
            })
            .is_ok()
    }
}

/// Consumer half, owned by the control loop.
#[derive(Debug)]
pub struct CompletionQueue {
    rx: mpsc::Receiver<CompletionEvent>,
}

impl CompletionQueue {
    /// Take every event accumulated so far, in arrival order.
    pub fn drain(&mut self) -> Vec<CompletionEvent> {
        let mut batch = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => batch.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        batch
    }
}

/// Create a completion queue able to hold `capacity` events without blocking.
///
/// Size it to the number of steps: every step completes exactly once.
pub fn completion_channel(capacity: usize) -> (CompletionSender, CompletionQueue) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (CompletionSender { tx }, CompletionQueue { rx })
}
