//! Property tests: after any sequence of valid operations the graph
//! satisfies its structural invariants.
//!
//! Checked after every applied operation:
//!   - the root is alive and the table holds exactly the live ids
//!   - every live node is reachable from the root via owning edges
//!   - every owning edge has a matching back-reference and vice versa
//!
//! Cycle-closing citations are filtered out with `would_create_cycle`
//! before applying, since the reachability invariant only holds for the
//! acyclic discipline the graph documents.

use citegraph_core::{CitationGraph, Paper};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(u8, Vec<u8>),
    Cite(u8, u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1u8..16, proptest::collection::vec(0u8..16, 1..4))
            .prop_map(|(id, parents)| Op::Create(id, parents)),
        2 => (0u8..16, 0u8..16).prop_map(|(child, parent)| Op::Cite(child, parent)),
        2 => (0u8..16).prop_map(Op::Remove),
    ]
}

fn pid(i: u8) -> String {
    if i == 0 {
        "root".to_string()
    } else {
        format!("p{i}")
    }
}

fn check_invariants(g: &CitationGraph<Paper>) {
    let live: Vec<String> = g.ids().cloned().collect();

    // Root alive, table consistent with exists/len.
    assert!(live.contains(g.root_id()));
    assert_eq!(live.len(), g.len());
    for id in &live {
        assert!(g.exists(id));
    }

    // Liveness == reachability from the root over owning edges.
    let mut reachable = g.descendants(g.root_id()).expect("root is live");
    reachable.insert(g.root_id().clone());
    assert_eq!(
        reachable.iter().cloned().collect::<Vec<_>>(),
        {
            let mut sorted = live.clone();
            sorted.sort();
            sorted
        },
        "live set must equal the root-reachable set"
    );

    // Edge symmetry: every owning edge has its back-reference, every
    // surviving back-reference has its owning edge.
    for id in &live {
        for child in g.children_of(id).expect("live id") {
            assert!(
                g.parents_of(&child).expect("child is live").contains(id),
                "owning edge {id} -> {child} missing its back-reference"
            );
        }
        for parent in g.parents_of(id).expect("live id") {
            assert!(
                g.children_of(&parent).expect("parent is live").contains(id),
                "back-reference {id} -> {parent} missing its owning edge"
            );
        }
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn invariants_hold_under_random_operations(ops in proptest::collection::vec(op_strategy(), 0..48)) {
        let mut g: CitationGraph<Paper> = CitationGraph::new("root".to_string());

        for op in ops {
            match op {
                Op::Create(id, parents) => {
                    let parent_ids: Vec<String> = parents.into_iter().map(pid).collect();
                    // Errors (duplicate id, missing parent) are part of the
                    // contract; the graph must be untouched either way.
                    let _ = g.create(pid(id), &parent_ids);
                }
                Op::Cite(child, parent) => {
                    let (child, parent) = (pid(child), pid(parent));
                    let closes_cycle = g
                        .would_create_cycle(&child, &parent)
                        .unwrap_or(true);
                    if !closes_cycle {
                        g.add_citation(&child, &parent).expect("both ends validated");
                    }
                }
                Op::Remove(id) => {
                    let _ = g.remove(&pid(id));
                }
            }
            check_invariants(&g);
        }
    }

    #[test]
    fn failed_creates_leave_state_identical(id in 1u8..8, good in 1u8..8) {
        let mut g: CitationGraph<Paper> = CitationGraph::new("root".to_string());
        g.create(pid(good), &["root".to_string()]).expect("fresh id under root");

        let before_children = g.children_of(&pid(good)).expect("live");
        let before_len = g.len();

        // A parent list with a guaranteed-missing id must change nothing,
        // even though pid(good) precedes it in the list.
        let result = g.create(pid(id).repeat(2) + "-new", &[pid(good), "missing".to_string()]);
        prop_assert!(result.is_err());
        prop_assert_eq!(g.children_of(&pid(good)).expect("live"), before_children);
        prop_assert_eq!(g.len(), before_len);

        check_invariants(&g);
    }
}
