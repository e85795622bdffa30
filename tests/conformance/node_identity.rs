use std::collections::HashSet;

use kgdash::engine::materialize_rows;
use kgdash::ColorMap;

use crate::test_utils::{named, triple};

#[test]
fn node_identifiers_are_unique() {
    let rows = vec![
        triple(named("a", "Agent", "A"), "ASKS", named("b", "Agent", "B")),
        triple(named("b", "Agent", "B"), "ASKS", named("a", "Agent", "A")),
        triple(named("a", "Agent", "A"), "TELLS", named("c", "Task", "C")),
    ];
    let g = materialize_rows(&rows, &ColorMap::default());
    let ids: HashSet<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), g.node_count());
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 3);
}

#[test]
fn first_occurrence_attributes_win() {
    let rows = vec![
        triple(named("x", "PullRequest", "first"), "LINKS", named("y", "Task", "Y")),
        triple(named("x", "Memory", "second"), "LINKS", named("y", "Task", "Y")),
    ];
    let g = materialize_rows(&rows, &ColorMap::default());
    let x = g.node("x").unwrap();
    assert_eq!(x.label, "first");
    assert_eq!(x.color, "#FF6B6B");
}
