// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{ChefdagError, Result};
use crate::types::StepId;

/// One parsed input row: `{id, dependencies, duration, description}`.
///
/// Records are only syntactically checked; uniqueness, unknown dependencies
/// and cycles are rejected when the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub id: StepId,
    pub dependencies: Vec<StepId>,
    pub duration: u64,
    pub description: String,
    /// 1-based source line, when the record came from a line-oriented file.
    pub line: Option<usize>,
}

impl StepRecord {
    pub fn new(
        id: StepId,
        dependencies: Vec<StepId>,
        duration: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            dependencies,
            duration,
            description: description.into(),
            line: None,
        }
    }
}

/// A loaded recipe: scheduler settings plus step records.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub settings: SchedulerSection,
    pub records: Vec<StepRecord>,
}

/// TOML recipe as read from disk.
///
/// ```toml
/// [config]
/// poll_interval_ms = 100
/// time_unit_ms = 1000
///
/// [step.1]
/// duration = 2
/// description = "Boil water"
///
/// [step.2]
/// after = [1]
/// duration = 3
/// description = "Cook pasta"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipeFile {
    #[serde(default)]
    pub config: SchedulerSection,

    /// Keys are step ids; they are parsed as integers on conversion.
    #[serde(default)]
    pub step: BTreeMap<String, StepConfig>,
}

/// `[step.<id>]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    #[serde(default)]
    pub after: Vec<i64>,

    /// Signed so that negative values surface as `MalformedRecord` rather
    /// than a generic TOML type error.
    pub duration: i64,

    #[serde(default)]
    pub description: String,
}

/// `[config]` section controlling the scheduler loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerSection {
    /// Worst-case extra latency per state transition.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Length of one step duration unit. Defaults to one second.
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,

    /// Abort the run if it has not finished after this many seconds.
    #[serde(default)]
    pub deadline_secs: Option<u64>,

    /// Cap on concurrently scheduled timers.
    #[serde(default)]
    pub max_in_flight_timers: Option<usize>,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_time_unit_ms() -> u64 {
    1000
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            time_unit_ms: default_time_unit_ms(),
            deadline_secs: None,
            max_in_flight_timers: None,
        }
    }
}

impl SchedulerSection {
    /// Validate the section and convert it into runtime options.
    pub fn options(&self) -> Result<crate::engine::SchedulerOptions> {
        if self.poll_interval_ms == 0 {
            return Err(ChefdagError::ConfigError(
                "[config].poll_interval_ms must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.time_unit_ms == 0 {
            return Err(ChefdagError::ConfigError(
                "[config].time_unit_ms must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.max_in_flight_timers == Some(0) {
            return Err(ChefdagError::ConfigError(
                "[config].max_in_flight_timers must be >= 1 (got 0)".to_string(),
            ));
        }

        Ok(crate::engine::SchedulerOptions {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            time_unit: Duration::from_millis(self.time_unit_ms),
            deadline: self.deadline_secs.map(Duration::from_secs),
            max_in_flight_timers: self.max_in_flight_timers,
        })
    }
}

impl TryFrom<RawRecipeFile> for Recipe {
    type Error = ChefdagError;

    fn try_from(raw: RawRecipeFile) -> std::result::Result<Self, Self::Error> {
        let mut records = Vec::with_capacity(raw.step.len());

        for (key, step) in raw.step {
            let id: StepId = key.trim().parse().map_err(|_| {
                ChefdagError::malformed(
                    None,
                    format!("[step.{key}]: id must be a non-negative integer"),
                )
            })?;

            if step.duration < 0 {
                return Err(ChefdagError::malformed(
                    None,
                    format!("[step.{key}]: negative duration {}", step.duration),
                ));
            }

            let mut dependencies = Vec::with_capacity(step.after.len());
            for dep in step.after {
                let dep = StepId::try_from(dep).map_err(|_| {
                    ChefdagError::malformed(
                        None,
                        format!("[step.{key}]: negative dependency id {dep}"),
                    )
                })?;
                dependencies.push(dep);
            }

            records.push(StepRecord::new(
                id,
                dependencies,
                step.duration as u64,
                step.description,
            ));
        }

        Ok(Recipe {
            settings: raw.config,
            records,
        })
    }
}
