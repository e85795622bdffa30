//! Query-to-visualization pipeline for kgdash.
//!
//! - [`graph`]: filters, materialization, layouts and HTML rendering, plus the
//!   [`GraphVisualizer`] facade
//! - [`aggregate`]: workflow and coordination views
//! - [`diagram`]: flow, network and bar chart figures
//! - [`analytics`]: statistics, health, metrics, growth and usage

#![warn(missing_docs)]

pub mod aggregate;
pub mod analytics;
pub mod diagram;
pub mod graph;

pub use aggregate::AggregationRow;
pub use analytics::{
    ActivityEntry, GraphMetrics, GraphStatistics, GrowthPoint, HealthReport, TypeUsage,
};
pub use diagram::{BarChart, Figure, FlowDiagram, FlowLink, NetworkDiagram, SpringConfig};
pub use graph::filter::GraphFilter;
pub use graph::layout::{Layout, LayoutConfig};
pub use graph::materialize::{materialize, materialize_rows, Triple, TripleColumns};
pub use graph::render::{render_via_artifact, with_artifact, HtmlArtifact, InteractiveGraph};
pub use graph::types::{ColorMap, RenderEdge, RenderGraph, RenderNode};
pub use graph::GraphVisualizer;
