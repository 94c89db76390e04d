// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::SchedulerSection;

/// Command-line arguments for `chefdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "chefdag",
    version,
    about = "Run recipe steps as soon as their dependencies have completed.",
    long_about = "Run recipe steps as soon as their dependencies have completed.\n\n\
        The input is either a CSV file with the columns\n\
        `Step, Dependencies, Time, Description` or a TOML recipe\n\
        (`.toml`) with an optional [config] section and [step.<id>] tables."
)]
pub struct CliArgs {
    /// Recipe file (CSV, or TOML if the extension is `.toml`).
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Poll interval of the scheduler loop, in milliseconds.
    ///
    /// Overrides `[config].poll_interval_ms`.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Length of one duration unit, in milliseconds.
    ///
    /// Overrides `[config].time_unit_ms` (default 1000, i.e. seconds).
    #[arg(long, value_name = "MS")]
    pub time_unit_ms: Option<u64>,

    /// Abort if the recipe has not finished after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CHEFDAG_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the recipe and print the plan without running it.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Apply command-line overrides on top of the file settings.
    pub fn apply_overrides(&self, settings: &mut SchedulerSection) {
        if let Some(ms) = self.poll_interval_ms {
            settings.poll_interval_ms = ms;
        }
        if let Some(ms) = self.time_unit_ms {
            settings.time_unit_ms = ms;
        }
        if let Some(secs) = self.deadline_secs {
            settings.deadline_secs = Some(secs);
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
