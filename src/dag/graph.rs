// src/dag/graph.rs

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::model::StepRecord;
use crate::dag::step::Step;
use crate::dag::validate::validate_records;
use crate::errors::Result;
use crate::types::{StepId, StepState};

/// Longest chain of dependent steps by cumulative duration.
///
/// Its `length` lower-bounds the wall time of a run, in duration units.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CriticalPath {
    pub length: u64,
    /// Step ids along the chain, first to last.
    pub steps: Vec<StepId>,
}

/// Owning collection of all steps of a recipe.
///
/// Built once from validated records; afterwards the step set is fixed and
/// only step states and outstanding dependency sets change.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    steps: HashMap<StepId, Step>,
    /// Topological order of ids, computed during validation.
    order: Vec<StepId>,
}

impl DependencyGraph {
    /// Build a graph from parsed records.
    ///
    /// Fails on duplicate ids, unknown dependencies, or cycles. Nothing is
    /// constructed if any record is rejected.
    pub fn build(records: Vec<StepRecord>) -> Result<Self> {
        let order = validate_records(&records)?;

        let steps = records
            .into_iter()
            .map(|r| {
                let step = Step::new(r.id, r.dependencies, r.duration, r.description);
                (step.id(), step)
            })
            .collect::<HashMap<_, _>>();

        debug!(steps = steps.len(), "dependency graph built");

        Ok(Self { steps, order })
    }

    /// Total number of steps; fixed for the life of the graph.
    pub fn count(&self) -> usize {
        self.steps.len()
    }

    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: StepId) -> Option<&mut Step> {
        self.steps.get_mut(&id)
    }

    pub fn state_of(&self, id: StepId) -> Option<StepState> {
        self.steps.get(&id).map(Step::state)
    }

    /// All steps, in unspecified order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.values()
    }

    /// All step ids, ascending.
    pub fn step_ids(&self) -> Vec<StepId> {
        let mut ids: Vec<StepId> = self.steps.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Steps that are `Pending` with no outstanding dependencies.
    ///
    /// The order is unspecified; callers that act on the result sort it.
    pub fn ready_steps(&self) -> Vec<&Step> {
        self.steps.values().filter(|s| s.is_ready()).collect()
    }

    /// Remove `id` from the outstanding dependencies of every step that has
    /// not completed yet.
    ///
    /// Idempotent, and a no-op for ids that were never part of the graph.
    /// Returns how many steps actually lost the dependency.
    pub fn remove_dependency(&mut self, id: StepId) -> usize {
        let mut affected = 0;
        for step in self.steps.values_mut().filter(|s| !s.is_completed()) {
            if step.remove_dependency(id) {
                affected += 1;
                trace!(step = step.id(), dependency = id, "dependency satisfied");
            }
        }
        affected
    }

    pub fn completed_count(&self) -> usize {
        self.steps.values().filter(|s| s.is_completed()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.steps.values().all(Step::is_completed)
    }

    /// Ids in an order where every step follows all of its prerequisites.
    pub fn topological_order(&self) -> &[StepId] {
        &self.order
    }

    /// Compute the critical path over the declared prerequisites.
    ///
    /// Ties are broken towards the lower step id. The length saturates at
    /// `u64::MAX`.
    pub fn critical_path(&self) -> CriticalPath {
        let mut finish: HashMap<StepId, u64> = HashMap::with_capacity(self.steps.len());
        let mut via: HashMap<StepId, StepId> = HashMap::new();
        let mut end: Option<(StepId, u64)> = None;

        for id in &self.order {
            let Some(step) = self.steps.get(id) else {
                continue;
            };

            let mut start = 0;
            for prereq in step.prerequisites() {
                let f = finish.get(prereq).copied().unwrap_or(0);
                if f > start || !via.contains_key(id) {
                    start = start.max(f);
                    via.insert(*id, *prereq);
                }
            }

            let done = start.saturating_add(step.duration());
            finish.insert(*id, done);

            end = match end {
                Some((best_id, best)) if best > done || (best == done && best_id < *id) => {
                    Some((best_id, best))
                }
                _ => Some((*id, done)),
            };
        }

        let Some((last, length)) = end else {
            return CriticalPath::default();
        };

        let mut steps = vec![last];
        let mut cursor = last;
        while let Some(prev) = via.get(&cursor) {
            steps.push(*prev);
            cursor = *prev;
        }
        steps.reverse();

        CriticalPath { length, steps }
    }
}
