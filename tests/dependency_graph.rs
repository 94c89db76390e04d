// tests/dependency_graph.rs

use chefdag::build_graph;
use chefdag::config::StepRecord;
use chefdag::errors::ChefdagError;
use chefdag::types::StepState;
use chefdag_test_utils::builders::{RecipeBuilder, StepRecordBuilder};

fn ready_ids(graph: &chefdag::dag::DependencyGraph) -> Vec<u64> {
    let mut ids: Vec<u64> = graph.ready_steps().iter().map(|s| s.id()).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn build_counts_steps_and_finds_roots() {
    let graph = RecipeBuilder::new()
        .step(1, &[], 2)
        .step(2, &[1], 3)
        .step(3, &[1], 1)
        .step(4, &[], 5)
        .build();

    assert_eq!(graph.count(), 4);
    assert_eq!(ready_ids(&graph), vec![1, 4]);
    assert_eq!(graph.state_of(2), Some(StepState::Pending));
    assert_eq!(graph.state_of(99), None);
    assert_eq!(graph.step_ids(), vec![1, 2, 3, 4]);
}

#[test]
fn unknown_dependency_fails_construction() {
    let records = RecipeBuilder::new().step(1, &[], 1).step(2, &[9], 1).records();

    match build_graph(records) {
        Err(ChefdagError::UnknownDependency { step, dependency }) => {
            assert_eq!(step, 2);
            assert_eq!(dependency, 9);
        }
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
}

#[test]
fn two_step_cycle_is_rejected() {
    let records = RecipeBuilder::new().step(1, &[2], 1).step(2, &[1], 1).records();

    match build_graph(records) {
        Err(ChefdagError::CyclicDependency { steps }) => assert_eq!(steps, vec![1, 2]),
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn cycle_report_excludes_steps_outside_the_cycle() {
    // 1 -> 2 -> 3 -> 2, and 4 hangs off 3.
    let records = RecipeBuilder::new()
        .step(1, &[], 1)
        .step(2, &[1, 3], 1)
        .step(3, &[2], 1)
        .step(4, &[3], 1)
        .records();

    match build_graph(records) {
        Err(ChefdagError::CyclicDependency { steps }) => assert_eq!(steps, vec![2, 3]),
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn self_dependency_is_a_cycle() {
    let records = RecipeBuilder::new().step(5, &[5], 1).records();

    assert!(matches!(
        build_graph(records),
        Err(ChefdagError::CyclicDependency { steps }) if steps == vec![5]
    ));
}

#[test]
fn duplicate_id_is_malformed() {
    let mut records = RecipeBuilder::new().step(1, &[], 1).records();
    let mut dup = StepRecord::new(1, vec![], 2, "again");
    dup.line = Some(3);
    records.push(dup);

    match build_graph(records) {
        Err(ChefdagError::MalformedRecord { line, reason }) => {
            assert_eq!(line, Some(3));
            assert!(reason.contains("duplicate step id 1"));
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn empty_recipe_builds_an_empty_graph() {
    let graph = build_graph(Vec::new()).expect("empty graph is valid");

    assert_eq!(graph.count(), 0);
    assert!(graph.is_complete());
    assert!(graph.ready_steps().is_empty());
}

#[test]
fn remove_dependency_unblocks_dependents() {
    let mut graph = RecipeBuilder::new()
        .step(1, &[], 1)
        .step(2, &[1], 1)
        .step(3, &[1, 2], 1)
        .build();

    assert_eq!(graph.remove_dependency(1), 2);
    assert_eq!(ready_ids(&graph), vec![1, 2]);
    assert_eq!(graph.state_of(3), Some(StepState::Pending));

    // Original prerequisites are never touched.
    let step3 = graph.get(3).unwrap();
    assert_eq!(step3.dependencies().iter().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(step3.prerequisites().iter().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn remove_dependency_is_idempotent() {
    let build = || {
        RecipeBuilder::new()
            .step(1, &[], 1)
            .step(2, &[1], 1)
            .step(3, &[2], 1)
            .build()
    };

    let mut once = build();
    once.remove_dependency(1);

    let mut twice = build();
    twice.remove_dependency(1);
    assert_eq!(twice.remove_dependency(1), 0);

    for id in [1, 2, 3] {
        assert_eq!(
            once.get(id).unwrap().dependencies(),
            twice.get(id).unwrap().dependencies()
        );
        assert_eq!(once.state_of(id), twice.state_of(id));
    }
}

#[test]
fn remove_unknown_dependency_is_a_no_op() {
    let mut graph = RecipeBuilder::new().step(1, &[], 1).step(2, &[1], 1).build();

    assert_eq!(graph.remove_dependency(42), 0);
    assert_eq!(ready_ids(&graph), vec![1]);
}

#[test]
fn topological_order_puts_prerequisites_first() {
    let graph = RecipeBuilder::new()
        .step(3, &[2], 1)
        .step(2, &[1], 1)
        .step(1, &[], 1)
        .step(4, &[1], 1)
        .build();

    let order = graph.topological_order();
    let pos = |id| order.iter().position(|x| *x == id).unwrap();

    assert_eq!(order.len(), 4);
    assert!(pos(1) < pos(2));
    assert!(pos(2) < pos(3));
    assert!(pos(1) < pos(4));
}

#[test]
fn critical_path_follows_longest_chain() {
    let graph = RecipeBuilder::new()
        .step(1, &[], 2)
        .step(2, &[1], 3)
        .step(3, &[1], 1)
        .step(4, &[], 4)
        .build();

    let critical = graph.critical_path();
    assert_eq!(critical.length, 5);
    assert_eq!(critical.steps, vec![1, 2]);
}

#[test]
fn critical_path_breaks_ties_towards_lower_ids() {
    let graph = RecipeBuilder::new()
        .with_step(StepRecordBuilder::new(1).duration(2))
        .with_step(StepRecordBuilder::new(2).duration(2))
        .with_step(StepRecordBuilder::new(3).after(1).after(2).duration(1))
        .build();

    let critical = graph.critical_path();
    assert_eq!(critical.length, 3);
    assert_eq!(critical.steps, vec![1, 3]);
}

#[test]
fn critical_path_of_empty_graph_is_empty() {
    let graph = build_graph(Vec::new()).unwrap();
    let critical = graph.critical_path();

    assert_eq!(critical.length, 0);
    assert!(critical.steps.is_empty());
}

#[test]
fn critical_path_length_saturates_on_huge_durations() {
    let huge = i64::MAX as u64;
    let graph = RecipeBuilder::new()
        .step(1, &[], huge)
        .step(2, &[1], huge)
        .step(3, &[2], huge)
        .build();

    let critical = graph.critical_path();

    assert_eq!(critical.length, u64::MAX);
    assert_eq!(critical.steps, vec![1, 2, 3]);
}
