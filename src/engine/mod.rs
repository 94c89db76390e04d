// src/engine/mod.rs

//! Scheduling engine.
//!
//! This module ties together:
//! - the pure core state machine ([`core`]) that starts ready steps and
//!   applies completion batches to the dependency graph
//! - the completion queue ([`completion`]) that timer tasks append to
//! - the async polling loop ([`runtime`]) that drives the core, requests
//!   timers and publishes notices
//! - the notice sinks ([`notice`]) and the final [`report`]

use std::time::Duration;

pub mod completion;
pub mod core;
pub mod notice;
pub mod report;
pub mod runtime;

pub use completion::{CompletionEvent, CompletionQueue, CompletionSender, completion_channel};
pub use core::{CoreScheduler, ScheduledStep};
pub use notice::{ChannelNotices, NoticeSink, NullNotices, StdoutNotices};
pub use report::{Report, StepTiming};
pub use runtime::Scheduler;

/// Tunables for the scheduler loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Time between polls; also the worst-case extra latency of each
    /// observed state transition.
    pub poll_interval: Duration,
    /// Wall time of one step duration unit.
    pub time_unit: Duration,
    /// Abort the run once this much time has passed.
    pub deadline: Option<Duration>,
    /// Cap on concurrently scheduled timers.
    pub max_in_flight_timers: Option<usize>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            time_unit: Duration::from_secs(1),
            deadline: None,
            max_in_flight_timers: None,
        }
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl SchedulerOptions {
    /// Wall-clock delay for a step lasting `units` time units (saturating).
    pub fn step_delay(&self, units: u64) -> Duration {
        let nanos = self.time_unit.as_nanos().saturating_mul(u128::from(units));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
