//! Shared foundations for kgdash.
//!
//! - [`VizError`] / [`VizResult`]: the error type every crate returns
//! - [`Value`], [`Entity`], [`Relation`], [`Row`]: query results, classified
//!   at the collaborator boundary
//! - [`GraphQuery`] / [`Query`]: the one capability the core needs from a
//!   graph database
//! - [`DashboardConfig`]: file and environment configuration

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod query;
pub mod value;

pub use config::DashboardConfig;
pub use error::{VizError, VizResult};
pub use query::{GraphQuery, Params, Query};
pub use value::{Entity, Properties, Relation, Row, Value, LABELS_KEY, REL_TYPE_KEY};
