//! Neo4j adapter for kgdash.
//!
//! [`HttpGraph`] implements [`kgdash_core::GraphQuery`] over the
//! transactional HTTP endpoint. Query results come back as rows whose cells
//! are classified into entities, relations and scalars by [`decode`].

#![warn(missing_docs)]

pub mod client;
pub mod decode;

pub use client::{HttpGraph, DEFAULT_TIMEOUT};
pub use decode::{classify, decode_response};
