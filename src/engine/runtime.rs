// src/engine/runtime.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::errors::{ChefdagError, Result};
use crate::exec::{TimerBackend, TimerHandle};
use crate::types::StepId;

use super::completion::{CompletionQueue, CompletionSender, completion_channel};
use super::core::CoreScheduler;
use super::notice::NoticeSink;
use super::report::{Report, StepTiming};
use super::{SchedulerOptions, saturating_millis};

/// `tokio::time::interval` panics on a zero period.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Partial timeline of a step that has not completed yet.
#[derive(Debug, Clone)]
struct Started {
    description: String,
    duration: u64,
    started_at: Duration,
}

/// The scheduler loop: a cooperative polling shell around [`CoreScheduler`].
///
/// Each poll cycle it
/// 1. waits for the next tick of `poll_interval`;
/// 2. drains the completion queue and applies the whole batch to the core,
///    publishing "completed" notices after the state update;
/// 3. starts every ready step (ascending id), publishing a "starting"
///    notice and requesting a timer from the [`TimerBackend`].
///
/// A completion is therefore observed, and its dependents started, at most
/// one poll interval after the timer fired. All graph mutation and output
/// happen here, never in timer tasks.
pub struct Scheduler<T: TimerBackend, N: NoticeSink> {
    core: CoreScheduler,
    timers: T,
    notices: N,
    options: SchedulerOptions,
    completion_tx: CompletionSender,
    completion_rx: CompletionQueue,
    handles: HashMap<StepId, TimerHandle>,
    started: HashMap<StepId, Started>,
    finished: BTreeMap<StepId, StepTiming>,
    start_order: Vec<StepId>,
    cycles: u64,
}

impl<T: TimerBackend, N: NoticeSink> fmt::Debug for Scheduler<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("core", &self.core)
            .field("options", &self.options)
            .field("in_flight", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl<T: TimerBackend, N: NoticeSink> Scheduler<T, N> {
    pub fn new(core: CoreScheduler, timers: T, notices: N, options: SchedulerOptions) -> Self {
        let core = core.with_time_unit(options.time_unit);
        let (completion_tx, completion_rx) = completion_channel(core.total());
        Self {
            core,
            timers,
            notices,
            options,
            completion_tx,
            completion_rx,
            handles: HashMap::new(),
            started: HashMap::new(),
            finished: BTreeMap::new(),
            start_order: Vec::new(),
            cycles: 0,
        }
    }

    /// Drive every step to `Completed`.
    ///
    /// Outstanding timers are released whether the run succeeds or fails.
    pub async fn run(mut self) -> Result<Report> {
        let run_start = Instant::now();
        info!(
            steps = self.core.total(),
            poll_interval_ms = saturating_millis(self.options.poll_interval),
            "scheduler started"
        );

        let result = self.drive(run_start).await;
        self.release_timers();

        match &result {
            Ok(report) => info!(
                completed = report.completed,
                elapsed_ms = saturating_millis(report.elapsed),
                cycles = report.cycles,
                "all steps completed"
            ),
            Err(err) => error!(error = %err, "scheduler aborted"),
        }

        result
    }

    async fn drive(&mut self, run_start: Instant) -> Result<Report> {
        let mut ticker = time::interval(self.options.poll_interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.cycles += 1;

            // Drain before recomputing readiness so steps unblocked by this
            // batch start in the same cycle.
            self.apply_completions(run_start)?;

            if self.core.is_finished() {
                break;
            }

            self.start_ready(run_start)?;

            if let Some(deadline) = self.options.deadline {
                if run_start.elapsed() >= deadline {
                    return Err(ChefdagError::DeadlineExceeded {
                        deadline,
                        not_started: self.core.not_started(),
                        not_completed: self.core.running_steps(),
                    });
                }
            }

            if self.core.is_stalled() {
                return Err(ChefdagError::SchedulerStalled {
                    pending: self.core.not_started(),
                });
            }
        }

        Ok(Report {
            total_steps: self.core.total(),
            completed: self.core.completed_count(),
            elapsed: run_start.elapsed(),
            cycles: self.cycles,
            start_order: self.start_order.clone(),
            steps: self.finished.values().cloned().collect(),
        })
    }

    fn start_ready(&mut self, run_start: Instant) -> Result<()> {
        for scheduled in self.core.start_ready()? {
            let id = scheduled.id;
            let started_at = run_start.elapsed();
            let delay = self.options.step_delay(scheduled.duration);

            let description = self
                .core
                .graph()
                .get(id)
                .map(|s| s.description().to_string())
                .unwrap_or_default();

            self.notices.emit(scheduled.notice);

            let handle = self
                .timers
                .schedule(id, delay, self.completion_tx.clone())?;

            debug!(
                step = id,
                delay_ms = saturating_millis(delay),
                started_at_ms = saturating_millis(started_at),
                "timer scheduled"
            );

            self.handles.insert(id, handle);
            self.start_order.push(id);
            self.started.insert(
                id,
                Started {
                    description,
                    duration: scheduled.duration,
                    started_at,
                },
            );
        }
        Ok(())
    }

    fn apply_completions(&mut self, run_start: Instant) -> Result<()> {
        let batch = self.completion_rx.drain();
        if batch.is_empty() {
            return Ok(());
        }

        let ids: Vec<StepId> = batch.iter().map(|e| e.step).collect();
        debug!(?ids, "draining completion batch");

        let notices = self.core.apply_completions(&ids)?;
        let completed_at = run_start.elapsed();

        for (event, notice) in batch.into_iter().zip(notices) {
            if let Some(handle) = self.handles.remove(&event.step) {
                handle.release();
            }

            if let Some(started) = self.started.remove(&event.step) {
                self.finished.insert(
                    event.step,
                    StepTiming {
                        id: event.step,
                        description: started.description,
                        duration: started.duration,
                        started_at: started.started_at,
                        fired_at: event.fired_at.saturating_duration_since(run_start),
                        completed_at,
                    },
                );
            }

            self.notices.emit(notice);
        }

        Ok(())
    }

    fn release_timers(&mut self) {
        if !self.handles.is_empty() {
            debug!(count = self.handles.len(), "releasing outstanding timers");
        }
        for (_, handle) in self.handles.drain() {
            handle.release();
        }
    }
}
