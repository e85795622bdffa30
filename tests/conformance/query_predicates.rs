use kgdash::GraphFilter;

#[test]
fn empty_selections_are_literal_true() {
    let f = GraphFilter::new();
    assert_eq!(f.node_predicate(), "true");
    assert_eq!(f.rel_predicate(), "true");
}

#[test]
fn selections_never_appear_in_query_text() {
    let q = GraphFilter::new()
        .node_types(["Agent\" OR 1=1"])
        .search("'; DROP")
        .to_query()
        .unwrap();
    assert!(!q.text.contains("1=1"));
    assert!(!q.text.contains("DROP"));
    assert_eq!(q.params.len(), 3);
}
