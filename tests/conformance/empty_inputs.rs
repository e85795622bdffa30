use kgdash::engine::materialize_rows;
use kgdash::{ColorMap, FlowDiagram, GraphFilter, GraphVisualizer, Layout};

use crate::test_utils::Canned;

#[test]
fn empty_triples_make_empty_graph() {
    let g = materialize_rows(&[], &ColorMap::default());
    assert_eq!((g.node_count(), g.edge_count()), (0, 0));
}

#[test]
fn empty_flow_has_no_links_and_a_marker() {
    let d = FlowDiagram::from_rows(&[]);
    assert!(d.links.is_empty());
    assert!(d.annotation.is_some());
}

#[test]
fn empty_backend_renders_a_page() {
    let viz = GraphVisualizer::new(Canned(Vec::new()));
    let html = viz
        .create_interactive_graph(&GraphFilter::new(), Layout::Random)
        .unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(viz.workflow().is_empty());
}
