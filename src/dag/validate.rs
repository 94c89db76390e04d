// src/dag/validate.rs

use std::collections::HashSet;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::config::model::StepRecord;
use crate::errors::{ChefdagError, Result};
use crate::types::StepId;

/// Reject records that cannot form a valid dependency graph.
///
/// Checks, in order: duplicate ids, unknown dependencies, cycles
/// (self-dependencies included). Returns a topological order of the ids.
pub fn validate_records(records: &[StepRecord]) -> Result<Vec<StepId>> {
    ensure_unique_ids(records)?;
    validate_dependencies(records)?;
    validate_dag(records)
}

fn ensure_unique_ids(records: &[StepRecord]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(ChefdagError::malformed(
                record.line,
                format!("duplicate step id {}", record.id),
            ));
        }
    }
    Ok(())
}

fn validate_dependencies(records: &[StepRecord]) -> Result<()> {
    let ids: HashSet<StepId> = records.iter().map(|r| r.id).collect();
    for record in records {
        for dep in &record.dependencies {
            if !ids.contains(dep) {
                return Err(ChefdagError::UnknownDependency {
                    step: record.id,
                    dependency: *dep,
                });
            }
        }
    }
    Ok(())
}

fn validate_dag(records: &[StepRecord]) -> Result<Vec<StepId>> {
    // Edge direction: dep -> step. Nodes are inserted in ascending id order
    // so the returned order is stable across runs.
    let mut graph: DiGraphMap<StepId, ()> = DiGraphMap::new();

    let mut ids: Vec<StepId> = records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    for id in ids {
        graph.add_node(id);
    }

    for record in records {
        for dep in &record.dependencies {
            graph.add_edge(*dep, record.id, ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order),
        Err(_cycle) => Err(ChefdagError::CyclicDependency {
            steps: cyclic_steps(&graph),
        }),
    }
}

/// Every step that sits on some cycle, ascending.
fn cyclic_steps(graph: &DiGraphMap<StepId, ()>) -> Vec<StepId> {
    let mut steps: Vec<StepId> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flatten()
        .collect();
    steps.sort_unstable();
    steps
}
