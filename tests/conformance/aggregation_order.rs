use kgdash::engine::aggregate::{
    aggregate_coordination, aggregate_workflow, rows_from_table, WORKFLOW_COLUMNS,
};
use kgdash::{AggregationRow, Row};

#[test]
fn workflow_rows_count_once_each_in_source_order() {
    let rows = vec![
        Row::new().with("PR", "PR-001").with("Action", "IMPLEMENTS").with("Target", "Task"),
        Row::new().with("PR", "PR-002").with("Action", "DEPENDS_ON").with("Target", "PR"),
    ];
    let out = aggregate_workflow(rows_from_table(&rows, WORKFLOW_COLUMNS));
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].source, "PR-001");
    assert!(out.iter().all(|r| r.count == 1));
}

#[test]
fn coordination_weights_descend() {
    let out = aggregate_coordination(vec![
        AggregationRow::new("a", "X", "b").with_count(1),
        AggregationRow::new("b", "X", "c").with_count(5),
        AggregationRow::new("c", "X", "d").with_count(3),
    ]);
    let weights: Vec<u64> = out.iter().map(|r| r.count).collect();
    assert_eq!(weights, vec![5, 3, 1]);
}
