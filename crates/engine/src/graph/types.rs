//! Core render types for the interactive graph.

use petgraph::algo::{condensation, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use kgdash_core::{VizError, VizResult};

/// Color used for entity types missing from the color map.
pub const DEFAULT_NODE_COLOR: &str = "#999999";

/// Type label used when a row value is not an entity.
pub const FALLBACK_TYPE_LABEL: &str = "Node";

/// Edge label used when a row value carries no relationship type.
pub const FALLBACK_REL_TYPE: &str = "RELATED";

/// A node ready for the interactive renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    /// Entity identifier.
    pub id: String,
    /// Display label (`name` or the identifier).
    pub label: String,
    /// Fill color, `#rrggbb`.
    pub color: String,
    /// Hover text: `"{type}: {description}"`.
    pub title: String,
    /// Entity type label.
    #[serde(skip)]
    pub type_label: String,
}

/// A directed edge between two rendered nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    /// Source node identifier.
    pub from: String,
    /// Target node identifier.
    pub to: String,
    /// Relationship type.
    pub label: String,
}

/// Deduplicated node set plus edge list.
///
/// Each identifier is registered once; edges may only reference registered
/// nodes. Parallel edges are kept.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl RenderGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. Returns false (and keeps the existing entry) when the
    /// identifier is already present.
    pub fn add_node(&mut self, node: RenderNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Append an edge. Both endpoints must already be registered.
    pub fn add_edge(&mut self, edge: RenderEdge) -> VizResult<()> {
        for endpoint in [&edge.from, &edge.to] {
            if !self.index.contains_key(endpoint) {
                return Err(VizError::invalid_input(format!(
                    "edge endpoint '{}' is not a node",
                    endpoint
                )));
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Append an edge whose endpoints the caller has just registered.
    pub(crate) fn push_edge(&mut self, edge: RenderEdge) {
        debug_assert!(self.contains_node(&edge.from) && self.contains_node(&edge.to));
        self.edges.push(edge);
    }

    /// True when a node with this identifier exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[RenderEdge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reorder nodes so that every edge source precedes its target where the
    /// edges allow it. When the edges form cycles, each strongly connected
    /// group is placed as a unit in topological order of the groups, its
    /// members in registration order.
    pub fn sort_by_edge_direction(&mut self) {
        let n = self.nodes.len();
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(n, self.edges.len());
        let ids: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();
        for e in &self.edges {
            if let (Some(&s), Some(&t)) = (self.index.get(&e.from), self.index.get(&e.to)) {
                if s != t {
                    graph.add_edge(ids[s], ids[t], ());
                }
            }
        }

        let order: Vec<usize> = match toposort(&graph, None) {
            Ok(sorted) => sorted.into_iter().map(|ix| graph[ix]).collect(),
            Err(cycle) => {
                tracing::debug!(
                    target: "kgdash::render",
                    node = %self.nodes[graph[cycle.node_id()]].id,
                    "edges form a cycle, ordering by component"
                );
                component_order(graph)
            }
        };

        let mut old: Vec<Option<RenderNode>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        self.nodes = order.into_iter().filter_map(|i| old[i].take()).collect();
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }
}

/// Registration indices ordered by the condensation of `graph`.
fn component_order(graph: DiGraph<usize, ()>) -> Vec<usize> {
    let n = graph.node_count();
    let condensed = condensation(graph, true);
    match toposort(&condensed, None) {
        Ok(sorted) => sorted
            .into_iter()
            .flat_map(|ix| {
                let mut members = condensed[ix].clone();
                members.sort_unstable();
                members
            })
            .collect(),
        Err(_) => (0..n).collect(),
    }
}

/// Entity type → node color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    colors: BTreeMap<String, String>,
    default_color: String,
}

impl Default for ColorMap {
    fn default() -> Self {
        let colors = [
            ("PullRequest", "#FF6B6B"),
            ("Agent", "#4ECDC4"),
            ("Task", "#45B7D1"),
            ("Knowledge", "#96CEB4"),
            ("Memory", "#FFEAA7"),
            ("Plugin", "#DDA0DD"),
            ("Tool", "#98D8C8"),
            ("Workflow", "#F7DC6F"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            colors,
            default_color: DEFAULT_NODE_COLOR.to_string(),
        }
    }
}

impl ColorMap {
    /// Map with no entries; every lookup yields the default color.
    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
            default_color: DEFAULT_NODE_COLOR.to_string(),
        }
    }

    /// Add or replace a type color, builder style.
    pub fn with_color(mut self, type_label: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(type_label.into(), color.into());
        self
    }

    /// Color for a type, or the default.
    pub fn lookup(&self, type_label: &str) -> &str {
        self.colors
            .get(type_label)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    /// True when the type has an explicit color.
    pub fn contains(&self, type_label: &str) -> bool {
        self.colors.contains_key(type_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> RenderNode {
        RenderNode {
            id: id.to_string(),
            label: id.to_string(),
            color: DEFAULT_NODE_COLOR.to_string(),
            title: "Node: ".to_string(),
            type_label: FALLBACK_TYPE_LABEL.to_string(),
        }
    }

    fn edge(from: &str, to: &str) -> RenderEdge {
        RenderEdge {
            from: from.to_string(),
            to: to.to_string(),
            label: FALLBACK_REL_TYPE.to_string(),
        }
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut g = RenderGraph::new();
        assert!(g.add_node(node("a")));
        let mut other = node("a");
        other.label = "changed".into();
        assert!(!g.add_node(other));
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.node("a").unwrap().label, "a");
    }

    #[test]
    fn edge_requires_both_endpoints() {
        let mut g = RenderGraph::new();
        g.add_node(node("a"));
        assert!(g.add_edge(edge("a", "b")).is_err());
        g.add_node(node("b"));
        g.add_edge(edge("a", "b")).unwrap();
        g.add_edge(edge("a", "b")).unwrap();
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn sort_places_sources_first() {
        let mut g = RenderGraph::new();
        for id in ["c", "b", "a"] {
            g.add_node(node(id));
        }
        g.add_edge(edge("a", "b")).unwrap();
        g.add_edge(edge("b", "c")).unwrap();
        g.sort_by_edge_direction();
        let ids: Vec<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(g.node("c").unwrap().id, "c");
    }

    #[test]
    fn sort_keeps_cycle_members() {
        let mut g = RenderGraph::new();
        for id in ["x", "y", "z"] {
            g.add_node(node(id));
        }
        g.add_edge(edge("x", "y")).unwrap();
        g.add_edge(edge("y", "x")).unwrap();
        g.add_edge(edge("z", "x")).unwrap();
        g.sort_by_edge_direction();
        let ids: Vec<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "x", "y"]);
        assert_eq!(g.node("y").unwrap().id, "y");
    }

    #[test]
    fn sort_orders_cycle_groups_by_their_edges() {
        let mut g = RenderGraph::new();
        for id in ["tail", "q", "p", "head"] {
            g.add_node(node(id));
        }
        g.add_edge(edge("head", "p")).unwrap();
        g.add_edge(edge("p", "q")).unwrap();
        g.add_edge(edge("q", "p")).unwrap();
        g.add_edge(edge("q", "tail")).unwrap();
        g.add_edge(edge("head", "head")).unwrap();
        g.sort_by_edge_direction();
        let ids: Vec<&str> = g.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["head", "q", "p", "tail"]);
        assert_eq!(g.node_count(), 4);
    }

    #[test]
    fn push_edge_appends_between_registered_nodes() {
        let mut g = RenderGraph::new();
        g.add_node(node("a"));
        g.add_node(node("b"));
        g.push_edge(edge("a", "b"));
        assert_eq!(g.edges().len(), 1);
        assert_eq!(g.edges()[0].to, "b");
    }

    #[test]
    fn color_map_defaults() {
        let colors = ColorMap::default();
        assert_eq!(colors.lookup("PullRequest"), "#FF6B6B");
        assert_eq!(colors.lookup("Agent"), "#4ECDC4");
        assert_eq!(colors.lookup("Unmapped"), DEFAULT_NODE_COLOR);
        assert!(colors.contains("Task"));
    }

    #[test]
    fn color_map_override() {
        let colors = ColorMap::empty().with_color("Task", "#000000");
        assert_eq!(colors.lookup("Task"), "#000000");
        assert_eq!(colors.lookup("Agent"), DEFAULT_NODE_COLOR);
    }
}
