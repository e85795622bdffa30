use kgdash::Layout;

#[test]
fn unknown_layout_matches_force_directed() {
    assert_eq!(
        Layout::from_name("Spiral").config(),
        Layout::from_name("Force-directed").config()
    );
}

#[test]
fn every_named_layout_resolves() {
    for name in ["Force-directed", "Hierarchical", "Circular", "Random"] {
        assert_eq!(Layout::from_name(name).name(), name);
    }
}
