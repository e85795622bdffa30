//! kgdash: knowledge-graph queries rendered as interactive charts.
//!
//! ```no_run
//! use kgdash::{DashboardConfig, GraphFilter, GraphVisualizer, HttpGraph, Layout};
//!
//! let config = DashboardConfig::load(None)?;
//! let viz = GraphVisualizer::new(HttpGraph::from_config(&config));
//! let filter = GraphFilter::new().node_types(["PullRequest"]).limit(config.node_limit);
//! let html = viz.create_interactive_graph(&filter, Layout::from_name("Hierarchical"))?;
//! # let _ = html;
//! # Ok::<(), kgdash::VizError>(())
//! ```

#![warn(missing_docs)]

pub mod types;

pub use types::*;

pub use kgdash_conduit as conduit;
pub use kgdash_engine as engine;
pub use kgdash_neo4j as neo4j;
