//! Public types for the kgdash API.
//!
//! This module re-exports types from the member crates with one flat
//! namespace.

// ============================================================================
// Values and collaborators
// ============================================================================

pub use kgdash_core::{Entity, Properties, Relation, Row, Value};
pub use kgdash_core::{GraphQuery, Params, Query};
pub use kgdash_core::{VizError, VizResult};
pub use kgdash_core::DashboardConfig;

// ============================================================================
// Interactive graph
// ============================================================================

pub use kgdash_engine::{ColorMap, RenderEdge, RenderGraph, RenderNode};
pub use kgdash_engine::{GraphFilter, Layout, LayoutConfig};
pub use kgdash_engine::{HtmlArtifact, InteractiveGraph};
pub use kgdash_engine::GraphVisualizer;

// ============================================================================
// Views, diagrams and analytics
// ============================================================================

pub use kgdash_engine::AggregationRow;
pub use kgdash_engine::{BarChart, Figure, FlowDiagram, FlowLink, NetworkDiagram, SpringConfig};
pub use kgdash_engine::{
    ActivityEntry, GraphMetrics, GraphStatistics, GrowthPoint, HealthReport, TypeUsage,
};

// ============================================================================
// Backends
// ============================================================================

pub use kgdash_conduit::ConduitClient;
pub use kgdash_neo4j::HttpGraph;
