// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{Recipe, StepRecord, load_recipe};
use crate::dag::DependencyGraph;
use crate::engine::{
    CoreScheduler, NoticeSink, Report, Scheduler, SchedulerOptions, StdoutNotices,
    saturating_millis,
};
use crate::exec::TokioTimerBackend;

/// Build and validate the dependency graph for a set of records.
///
/// Nothing is scheduled if this fails.
pub fn build_graph(records: Vec<StepRecord>) -> errors::Result<DependencyGraph> {
    DependencyGraph::build(records)
}

/// Run every step of `graph` to completion using tokio timers.
///
/// Notices are published to `notices` from the control loop only.
pub async fn run_to_completion<N: NoticeSink>(
    graph: DependencyGraph,
    options: SchedulerOptions,
    notices: N,
) -> errors::Result<Report> {
    let timers = TokioTimerBackend::new(options.max_in_flight_timers);
    let scheduler = Scheduler::new(CoreScheduler::new(graph), timers, notices, options);
    scheduler.run().await
}

/// High-level entry point used by `main.rs`.
///
/// Loads the recipe, applies CLI overrides, builds the graph, and either
/// prints the plan (`--dry-run`) or runs it with notices on stdout.
pub async fn run(args: CliArgs) -> Result<()> {
    let Recipe {
        mut settings,
        records,
    } = load_recipe(&args.input)
        .with_context(|| format!("loading recipe from {}", args.input.display()))?;

    args.apply_overrides(&mut settings);
    let options = settings.options()?;
    let graph = build_graph(records)?;

    let critical = graph.critical_path();
    info!(
        steps = graph.count(),
        critical_path = ?critical.steps,
        critical_length = critical.length,
        "recipe loaded"
    );

    if args.dry_run {
        print_dry_run(&graph, &options);
        return Ok(());
    }

    let report = run_to_completion(graph, options, StdoutNotices).await?;
    info!(
        completed = report.completed,
        elapsed_ms = saturating_millis(report.elapsed),
        "recipe finished"
    );

    println!("Enjoy!");
    Ok(())
}

/// Print steps in dependency order plus the critical path.
fn print_dry_run(graph: &DependencyGraph, options: &SchedulerOptions) {
    println!("chefdag dry-run");
    println!("  poll_interval = {:?}", options.poll_interval);
    println!("  time_unit = {:?}", options.time_unit);
    if let Some(deadline) = options.deadline {
        println!("  deadline = {deadline:?}");
    }
    println!();

    println!("steps ({}):", graph.count());
    for id in graph.topological_order() {
        let Some(step) = graph.get(*id) else {
            continue;
        };
        println!("  - {id}: {} ({})", step.description(), step.duration());
        if !step.prerequisites().is_empty() {
            println!("      after: {:?}", step.prerequisites());
        }
    }
    println!();

    let critical = graph.critical_path();
    println!(
        "critical path: {:?} (length {})",
        critical.steps, critical.length
    );
}
