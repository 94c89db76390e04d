#![allow(dead_code)]

use chefdag::config::StepRecord;
use chefdag::dag::DependencyGraph;
use chefdag::types::StepId;

/// Builder for a list of `StepRecord`s to simplify test setup.
#[derive(Debug, Default)]
pub struct RecipeBuilder {
    records: Vec<StepRecord>,
}

impl RecipeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, step: StepRecordBuilder) -> Self {
        self.records.push(step.build());
        self
    }

    /// Shorthand for `with_step(StepRecordBuilder::new(id).after_all(deps).duration(duration))`.
    pub fn step(self, id: StepId, deps: &[StepId], duration: u64) -> Self {
        self.with_step(
            StepRecordBuilder::new(id)
                .after_all(deps)
                .duration(duration),
        )
    }

    pub fn records(self) -> Vec<StepRecord> {
        self.records
    }

    pub fn build(self) -> DependencyGraph {
        DependencyGraph::build(self.records).expect("Failed to build valid graph from builder")
    }
}

/// Builder for a single `StepRecord`.
#[derive(Debug)]
pub struct StepRecordBuilder {
    record: StepRecord,
}

impl StepRecordBuilder {
    pub fn new(id: StepId) -> Self {
        Self {
            record: StepRecord::new(id, Vec::new(), 0, format!("step {id}")),
        }
    }

    pub fn after(mut self, dep: StepId) -> Self {
        self.record.dependencies.push(dep);
        self
    }

    pub fn after_all(mut self, deps: &[StepId]) -> Self {
        self.record.dependencies.extend_from_slice(deps);
        self
    }

    pub fn duration(mut self, duration: u64) -> Self {
        self.record.duration = duration;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.record.description = description.to_string();
        self
    }

    pub fn build(self) -> StepRecord {
        self.record
    }
}
