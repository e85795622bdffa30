//! Conformance suite for the public kgdash API.
//!
//! Each module covers one observable behavior through the root facade only.
//!
//! ```bash
//! cargo test --test conformance
//! ```

mod test_utils;

mod aggregation_order;
mod empty_inputs;
mod layout_fallback;
mod node_identity;
mod query_predicates;
