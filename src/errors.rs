// src/errors.rs

//! Crate-wide error type and `Result` alias.

use std::time::Duration;

use thiserror::Error;

use crate::types::StepId;

#[derive(Error, Debug)]
pub enum ChefdagError {
    #[error("Malformed record{}: {reason}", line_suffix(.line))]
    MalformedRecord { line: Option<usize>, reason: String },

    #[error("Step {step} depends on unknown step {dependency}")]
    UnknownDependency { step: StepId, dependency: StepId },

    #[error("Cyclic dependency between steps {steps:?}")]
    CyclicDependency { steps: Vec<StepId> },

    #[error("Step {step} was started twice")]
    DoubleStart { step: StepId },

    #[error("Step {step} was completed twice")]
    DoubleComplete { step: StepId },

    #[error("Step {step} started with outstanding dependencies {outstanding:?}")]
    StepNotReady {
        step: StepId,
        outstanding: Vec<StepId>,
    },

    #[error("Step {step} completed without having been started")]
    StepNotRunning { step: StepId },

    #[error("Completion received for unknown step {step}")]
    UnknownStep { step: StepId },

    #[error("Could not schedule timer for step {step}: {reason}")]
    TimerResourceExhausted { step: StepId, reason: String },

    #[error(
        "Deadline of {deadline:?} exceeded; never started: {not_started:?}, never completed: {not_completed:?}"
    )]
    DeadlineExceeded {
        deadline: Duration,
        not_started: Vec<StepId>,
        not_completed: Vec<StepId>,
    },

    #[error("Scheduler stalled with no running timers; pending steps: {pending:?}")]
    SchedulerStalled { pending: Vec<StepId> },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChefdagError {
    pub fn malformed(line: Option<usize>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" at line {n}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ChefdagError>;
