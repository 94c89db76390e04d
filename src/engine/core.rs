// src/engine/core.rs

//! Pure core of the scheduler loop.
//!
//! [`CoreScheduler`] owns the dependency graph and the completion counter.
//! It decides which steps start and applies completion batches, but it has
//! no timers, channels or clocks, so it can be driven step by step in tests.
//! The async shell around it lives in [`runtime`](super::runtime).

use std::time::Duration;

use tracing::debug;

use crate::dag::DependencyGraph;
use crate::errors::{ChefdagError, Result};
use crate::types::{Notice, StepId, StepState};

/// A step the core has just moved to `Running`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledStep {
    pub id: StepId,
    /// Duration in time units.
    pub duration: u64,
    /// The "starting" notice to publish once the timer is requested.
    pub notice: Notice,
}

#[derive(Debug)]
pub struct CoreScheduler {
    graph: DependencyGraph,
    completed: usize,
    /// Wall time of one duration unit, reported in "starting" notices.
    time_unit: Duration,
}

impl CoreScheduler {
    pub fn new(graph: DependencyGraph) -> Self {
        let completed = graph.completed_count();
        Self {
            graph,
            completed,
            time_unit: Duration::from_secs(1),
        }
    }

    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn total(&self) -> usize {
        self.graph.count()
    }

    pub fn completed_count(&self) -> usize {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.completed == self.graph.count()
    }

    /// Move every ready step to `Running`, in ascending id order.
    pub fn start_ready(&mut self) -> Result<Vec<ScheduledStep>> {
        let mut ready: Vec<StepId> = self.graph.ready_steps().iter().map(|s| s.id()).collect();
        ready.sort_unstable();

        let mut scheduled = Vec::with_capacity(ready.len());
        for id in ready {
            let step = self
                .graph
                .get_mut(id)
                .ok_or(ChefdagError::UnknownStep { step: id })?;

            if step.is_running() {
                continue;
            }

            let notice = step.start(self.time_unit)?;
            debug!(step = id, duration = step.duration(), "step marked Running");
            scheduled.push(ScheduledStep {
                id,
                duration: step.duration(),
                notice,
            });
        }

        Ok(scheduled)
    }

    /// Apply one batch of completions, in order.
    ///
    /// Each step is moved to `Completed` and its id stripped from every
    /// remaining dependency set before its notice is returned.
    pub fn apply_completions(&mut self, batch: &[StepId]) -> Result<Vec<Notice>> {
        let mut notices = Vec::with_capacity(batch.len());

        for &id in batch {
            let step = self
                .graph
                .get_mut(id)
                .ok_or(ChefdagError::UnknownStep { step: id })?;

            let notice = step.complete()?;
            self.completed += 1;
            let unblocked = self.graph.remove_dependency(id);

            debug!(
                step = id,
                unblocked,
                completed = self.completed,
                total = self.graph.count(),
                "step completed"
            );
            notices.push(notice);
        }

        Ok(notices)
    }

    /// Steps currently `Running`, ascending.
    pub fn running_steps(&self) -> Vec<StepId> {
        self.ids_where(|state| state == StepState::Running)
    }

    /// Steps that never started (`Pending` or `Ready`), ascending.
    pub fn not_started(&self) -> Vec<StepId> {
        self.ids_where(|state| matches!(state, StepState::Pending | StepState::Ready))
    }

    /// Unfinished, but nothing is running and nothing can start.
    ///
    /// Unreachable for a validated graph whose timers all fire.
    pub fn is_stalled(&self) -> bool {
        !self.is_finished()
            && self.graph.ready_steps().is_empty()
            && !self.graph.steps().any(|s| s.is_running())
    }

    fn ids_where(&self, pred: impl Fn(StepState) -> bool) -> Vec<StepId> {
        let mut ids: Vec<StepId> = self
            .graph
            .steps()
            .filter(|s| pred(s.state()))
            .map(|s| s.id())
            .collect();
        ids.sort_unstable();
        ids
    }
}
