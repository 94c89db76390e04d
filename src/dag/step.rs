// src/dag/step.rs

//! A single schedulable recipe step and its lifecycle.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::errors::{ChefdagError, Result};
use crate::types::{Notice, StepId, StepState};

/// Stored lifecycle state (internal).
///
/// `Ready` is deliberately absent; see [`Step::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Pending,
    Running,
    Completed,
}

/// One step of a recipe.
#[derive(Debug, Clone)]
pub struct Step {
    id: StepId,
    description: String,
    duration: u64,
    /// Outstanding dependencies; shrinks as they complete.
    dependencies: BTreeSet<StepId>,
    /// Dependencies as declared in the input. Never mutated.
    prerequisites: BTreeSet<StepId>,
    state: RunState,
}

impl Step {
    pub fn new(
        id: StepId,
        dependencies: impl IntoIterator<Item = StepId>,
        duration: u64,
        description: impl Into<String>,
    ) -> Self {
        let dependencies: BTreeSet<StepId> = dependencies.into_iter().collect();
        Self {
            id,
            description: description.into(),
            duration,
            prerequisites: dependencies.clone(),
            dependencies,
            state: RunState::Pending,
        }
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Dependencies that have not completed yet.
    pub fn dependencies(&self) -> &BTreeSet<StepId> {
        &self.dependencies
    }

    /// Dependencies as originally declared.
    pub fn prerequisites(&self) -> &BTreeSet<StepId> {
        &self.prerequisites
    }

    pub fn state(&self) -> StepState {
        match self.state {
            RunState::Pending if self.dependencies.is_empty() => StepState::Ready,
            RunState::Pending => StepState::Pending,
            RunState::Running => StepState::Running,
            RunState::Completed => StepState::Completed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == RunState::Pending && self.dependencies.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    /// `Pending/Ready -> Running`. Returns the "starting" notice.
    ///
    /// `time_unit` is only carried into the notice, for rendering.
    pub fn start(&mut self, time_unit: Duration) -> Result<Notice> {
        match self.state {
            RunState::Running | RunState::Completed => {
                return Err(ChefdagError::DoubleStart { step: self.id });
            }
            RunState::Pending if !self.dependencies.is_empty() => {
                return Err(ChefdagError::StepNotReady {
                    step: self.id,
                    outstanding: self.dependencies.iter().copied().collect(),
                });
            }
            RunState::Pending => {}
        }

        self.state = RunState::Running;
        Ok(Notice::Starting {
            id: self.id,
            description: self.description.clone(),
            duration: self.duration,
            time_unit,
        })
    }

    /// `Running -> Completed`. Returns the completion notice.
    pub fn complete(&mut self) -> Result<Notice> {
        match self.state {
            RunState::Completed => return Err(ChefdagError::DoubleComplete { step: self.id }),
            RunState::Pending => return Err(ChefdagError::StepNotRunning { step: self.id }),
            RunState::Running => {}
        }

        self.state = RunState::Completed;
        Ok(Notice::Completed {
            id: self.id,
            description: self.description.clone(),
        })
    }

    /// Drop `id` from the outstanding dependencies. Returns whether it was present.
    pub(crate) fn remove_dependency(&mut self, id: StepId) -> bool {
        self.dependencies.remove(&id)
    }
}
