//! Interactive graph pipeline.
//!
//! Filters become a parameterized query ([`filter`]), query rows become a
//! deduplicated render graph ([`materialize`]), a layout is chosen
//! ([`layout`]), and the result is rendered to HTML ([`render`]).
//! [`GraphVisualizer`] wires these together with the aggregation views,
//! diagrams and analytics behind one query collaborator.

pub mod filter;
pub mod layout;
pub mod materialize;
pub mod render;
pub mod types;

use kgdash_core::{GraphQuery, Query, Row, VizResult};

use crate::aggregate::{
    self, AggregationRow, DEFAULT_COORDINATION_PEER, DEFAULT_WORKFLOW_SOURCE,
};
use crate::analytics::{
    self, ActivityEntry, GraphMetrics, GraphStatistics, GrowthPoint, HealthReport, TypeUsage,
};
use crate::diagram::{BarChart, Figure, FlowDiagram, NetworkDiagram, SpringConfig};
use filter::GraphFilter;
use layout::Layout;
use materialize::materialize_rows;
use render::{render_via_artifact, InteractiveGraph};
use types::{ColorMap, RenderGraph};

const NODE_TYPES_QUERY: &str = "MATCH (n) RETURN DISTINCT labels(n)[0] AS type ORDER BY type";
const REL_TYPES_QUERY: &str = "MATCH ()-[r]->() RETURN DISTINCT type(r) AS type ORDER BY type";

/// Dashboard visualizations over one query collaborator.
///
/// Query failures never surface as errors from the view methods; they are
/// logged and the view comes back empty. Use [`GraphVisualizer::check_health`]
/// to tell an outage apart from an empty graph.
#[derive(Debug, Clone)]
pub struct GraphVisualizer<Q> {
    db: Q,
    colors: ColorMap,
    spring: SpringConfig,
    source_type: String,
    peer_type: String,
}

impl<Q: GraphQuery> GraphVisualizer<Q> {
    /// Stock colors, spring parameters and view types.
    pub fn new(db: Q) -> Self {
        Self {
            db,
            colors: ColorMap::default(),
            spring: SpringConfig::default(),
            source_type: DEFAULT_WORKFLOW_SOURCE.to_string(),
            peer_type: DEFAULT_COORDINATION_PEER.to_string(),
        }
    }

    /// Replace the color map.
    pub fn colors(mut self, colors: ColorMap) -> Self {
        self.colors = colors;
        self
    }

    /// Replace the spring layout parameters of network diagrams.
    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// Entity type whose outgoing relationships form the workflow view.
    pub fn workflow_source(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    /// Entity type whose mutual relationships form the coordination view.
    pub fn coordination_peer(mut self, peer_type: impl Into<String>) -> Self {
        self.peer_type = peer_type.into();
        self
    }

    /// The query collaborator.
    pub fn backend(&self) -> &Q {
        &self.db
    }

    /// The color map in use.
    pub fn color_map(&self) -> &ColorMap {
        &self.colors
    }

    // =========================================================================
    // Schema discovery
    // =========================================================================

    /// Distinct entity types, sorted.
    pub fn node_types(&self) -> Vec<String> {
        self.distinct_types(NODE_TYPES_QUERY)
    }

    /// Distinct relationship types, sorted.
    pub fn relationship_types(&self) -> Vec<String> {
        self.distinct_types(REL_TYPES_QUERY)
    }

    fn distinct_types(&self, text: &str) -> Vec<String> {
        let rows = self.rows(&Query::new(text), "type listing");
        let mut types: Vec<String> = rows
            .iter()
            .filter_map(|r| r.str_field("type").map(str::to_string))
            .collect();
        types.sort();
        types.dedup();
        types
    }

    // =========================================================================
    // Interactive graph
    // =========================================================================

    /// Query and materialize a render graph. Query failures give an empty graph.
    ///
    /// Fails only on an invalid filter.
    pub fn render_graph(&self, filter: &GraphFilter) -> VizResult<RenderGraph> {
        let query = filter.to_query()?;
        let rows = self.rows(&query, "graph");
        Ok(materialize_rows(&rows, &self.colors))
    }

    /// Build the interactive graph for a filter and layout.
    pub fn interactive_graph(
        &self,
        filter: &GraphFilter,
        layout: Layout,
    ) -> VizResult<InteractiveGraph> {
        let graph = self.render_graph(filter)?;
        tracing::debug!(
            target: "kgdash::render",
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            layout = %layout,
            "materialized graph"
        );
        Ok(InteractiveGraph::new(graph, layout))
    }

    /// Render the interactive graph to HTML through a temporary file.
    pub fn create_interactive_graph(&self, filter: &GraphFilter, layout: Layout) -> VizResult<String> {
        let graph = self.interactive_graph(filter, layout)?;
        render_via_artifact(&graph)
    }

    // =========================================================================
    // Aggregation views and diagrams
    // =========================================================================

    /// Workflow view over the configured source type.
    pub fn workflow(&self) -> Vec<AggregationRow> {
        aggregate::fetch_workflow(&self.db, &self.source_type)
    }

    /// Coordination view over the configured peer type.
    pub fn coordination(&self) -> Vec<AggregationRow> {
        aggregate::fetch_coordination(&self.db, &self.peer_type)
    }

    /// Flow diagram of workflow rows.
    pub fn sankey(&self, rows: &[AggregationRow]) -> FlowDiagram {
        FlowDiagram::from_rows(rows)
    }

    /// Network diagram of coordination rows.
    pub fn flow(&self, rows: &[AggregationRow]) -> NetworkDiagram {
        NetworkDiagram::with_config(rows, &self.spring)
    }

    /// Bar chart of structural metrics.
    pub fn metrics_chart(&self, metrics: &GraphMetrics) -> Figure {
        BarChart::metrics(metrics.to_pairs()).to_figure()
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// Overall counts.
    pub fn statistics(&self) -> GraphStatistics {
        analytics::graph_statistics(&self.db)
    }

    /// Most recently created entities.
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityEntry> {
        analytics::recent_activity(&self.db, limit)
    }

    /// Backend health.
    pub fn check_health(&self) -> HealthReport {
        analytics::check_health(&self.db)
    }

    /// Structural metrics.
    pub fn graph_metrics(&self) -> GraphMetrics {
        analytics::graph_metrics(&self.db)
    }

    /// Per-day creation counts.
    pub fn growth(&self) -> Vec<GrowthPoint> {
        analytics::growth(&self.db)
    }

    /// Node counts per type.
    pub fn usage_patterns(&self) -> Vec<TypeUsage> {
        analytics::usage_patterns(&self.db)
    }

    fn rows(&self, query: &Query, what: &str) -> Vec<Row> {
        match self.db.execute(query) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(target: "kgdash::query", error = %e, view = what, "query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgdash_core::{Entity, Relation, VizError};

    struct Fixed(Vec<Row>);

    impl GraphQuery for Fixed {
        fn execute(&self, _query: &Query) -> VizResult<Vec<Row>> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    impl GraphQuery for Down {
        fn execute(&self, _query: &Query) -> VizResult<Vec<Row>> {
            Err(VizError::transport("connection refused"))
        }
    }

    #[test]
    fn type_listings_are_sorted_and_skip_nulls() {
        let viz = GraphVisualizer::new(Fixed(vec![
            Row::new().with("type", "Task"),
            Row::new().with("type", serde_json::Value::Null),
            Row::new().with("type", "Agent"),
        ]));
        assert_eq!(viz.node_types(), vec!["Agent", "Task"]);
        assert!(GraphVisualizer::new(Down).relationship_types().is_empty());
    }

    #[test]
    fn outage_renders_an_empty_graph() {
        let viz = GraphVisualizer::new(Down);
        let g = viz.render_graph(&GraphFilter::new()).unwrap();
        assert!(g.is_empty());
        let html = viz
            .create_interactive_graph(&GraphFilter::new(), Layout::ForceDirected)
            .unwrap();
        assert!(html.contains("new vis.DataSet([])"));
    }

    #[test]
    fn invalid_filter_is_an_error() {
        let viz = GraphVisualizer::new(Fixed(Vec::new()));
        assert!(viz.render_graph(&GraphFilter::new().limit(0)).is_err());
    }

    #[test]
    fn interactive_graph_uses_stock_colors() {
        let row = Row::new()
            .with("n", Entity::new("pr-1", "PullRequest"))
            .with("r", Relation::new("IMPLEMENTS"))
            .with("m", Entity::new("t-1", "Task"));
        let viz = GraphVisualizer::new(Fixed(vec![row]));
        let ig = viz
            .interactive_graph(&GraphFilter::new(), Layout::Hierarchical)
            .unwrap();
        assert_eq!(ig.graph().node_count(), 2);
        assert_eq!(ig.graph().nodes()[0].color, "#FF6B6B");
        assert_eq!(ig.layout(), Layout::Hierarchical);
    }
}
