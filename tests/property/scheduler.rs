use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use chefdag::engine::CoreScheduler;
use chefdag::types::StepId;
use chefdag_test_utils::builders::{RecipeBuilder, StepRecordBuilder};

// Strategy to generate a valid recipe.
// Acyclic by construction: step N may only depend on steps 0..N-1.
fn recipe_strategy(max_steps: usize) -> impl Strategy<Value = RecipeBuilder> {
    (1..=max_steps).prop_flat_map(|num_steps| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_steps),
            num_steps,
        );
        let durations = proptest::collection::vec(0..10u64, num_steps);

        (deps_strat, durations).prop_map(|(raw_deps, durations)| {
            let mut builder = RecipeBuilder::new();
            for (i, (potential_deps, duration)) in raw_deps.into_iter().zip(durations).enumerate() {
                let mut step = StepRecordBuilder::new(i as StepId).duration(duration);
                if i > 0 {
                    let deps: BTreeSet<StepId> =
                        potential_deps.iter().map(|d| (d % i) as StepId).collect();
                    for dep in deps {
                        step = step.after(dep);
                    }
                }
                builder = builder.with_step(step);
            }
            builder
        })
    })
}

proptest! {
    #[test]
    fn every_step_completes_after_its_prerequisites(
        recipe in recipe_strategy(12),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..64),
    ) {
        let graph = recipe.build();
        let prerequisites: HashMap<StepId, BTreeSet<StepId>> = graph
            .steps()
            .map(|s| (s.id(), s.prerequisites().clone()))
            .collect();
        let total = graph.count();
        let mut core = CoreScheduler::new(graph);

        let mut completed: BTreeSet<StepId> = BTreeSet::new();
        let mut running: Vec<StepId> = Vec::new();
        let mut pick = picks.iter().cycle();
        let mut cycles = 0;

        while !core.is_finished() {
            cycles += 1;
            prop_assert!(cycles <= total * 2 + 1, "scheduler did not terminate");

            for scheduled in core.start_ready().unwrap() {
                for p in &prerequisites[&scheduled.id] {
                    prop_assert!(
                        completed.contains(p),
                        "step {} started before prerequisite {}",
                        scheduled.id,
                        p
                    );
                }
                running.push(scheduled.id);
            }

            prop_assert!(!core.is_stalled());
            prop_assert!(!running.is_empty());

            // Finish a random subset of running steps, at least one.
            let first = running.remove(pick.next().unwrap().index(running.len()));
            let mut batch = vec![first];
            if let Some(extra) = pick.next() {
                if !running.is_empty() && extra.index(2) == 0 {
                    batch.push(running.remove(extra.index(running.len())));
                }
            }

            core.apply_completions(&batch).unwrap();
            completed.extend(batch);
        }

        prop_assert_eq!(core.completed_count(), total);
        prop_assert_eq!(completed.len(), total);
        prop_assert!(running.is_empty());
    }
}
