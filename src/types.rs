// src/types.rs

use std::fmt;
use std::time::Duration;

/// Identifier of a recipe step, as given in the input file.
pub type StepId = u64;

/// Public, read-only view of a step's lifecycle state.
///
/// `Ready` is never stored: it is computed for `Pending` steps whose
/// dependency set has become empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepState {
    Pending,
    Ready,
    Running,
    Completed,
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepState::Pending => "pending",
            StepState::Ready => "ready",
            StepState::Running => "running",
            StepState::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Human-readable progress notice emitted by the scheduler.
///
/// Notices are emitted from the control loop only, and always after the
/// corresponding state transition has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Starting {
        id: StepId,
        description: String,
        /// Duration in time units.
        duration: u64,
        /// Wall time of one unit.
        time_unit: Duration,
    },
    Completed {
        id: StepId,
        description: String,
    },
}

impl Notice {
    pub fn step(&self) -> StepId {
        match self {
            Notice::Starting { id, .. } | Notice::Completed { id, .. } => *id,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Starting {
                id,
                description,
                duration,
                time_unit,
            } if *time_unit == Duration::from_secs(1) => write!(
                f,
                "Starting Step: {id} - {description} (duration {duration}s)"
            ),
            Notice::Starting {
                id,
                description,
                duration,
                time_unit,
            } => write!(
                f,
                "Starting Step: {id} - {description} (duration {duration} x {time_unit:?})"
            ),
            Notice::Completed { id, description } => {
                write!(f, "Completed Step: {id} - {description}")
            }
        }
    }
}
