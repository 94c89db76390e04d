// src/engine/report.rs

use std::time::Duration;

use crate::types::StepId;

/// Timeline of one step, relative to the start of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTiming {
    pub id: StepId,
    pub description: String,
    /// Duration in time units.
    pub duration: u64,
    /// When the loop started the step's timer.
    pub started_at: Duration,
    /// When the timer fired.
    pub fired_at: Duration,
    /// When the loop drained the completion and updated the graph.
    pub completed_at: Duration,
}

/// Result of a run that reached completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub total_steps: usize,
    pub completed: usize,
    /// Wall time from loop start until the last completion was applied.
    pub elapsed: Duration,
    /// Number of poll cycles the loop executed.
    pub cycles: u64,
    /// Step ids in the order their timers were started.
    pub start_order: Vec<StepId>,
    /// Per-step timeline, ascending by id.
    pub steps: Vec<StepTiming>,
}

impl Report {
    pub fn timing(&self, id: StepId) -> Option<&StepTiming> {
        self.steps.iter().find(|t| t.id == id)
    }
}
