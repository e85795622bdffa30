//! The graph query collaborator.
//!
//! The visualization core needs exactly one capability from the database:
//! run a parameterized query and hand back rows. Everything about the wire,
//! the driver and retry policy lives behind [`GraphQuery`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::VizResult;
use crate::value::Row;

/// Named query parameters.
pub type Params = BTreeMap<String, serde_json::Value>;

/// A query text plus its parameters.
///
/// User-supplied values belong in [`Query::params`], never in the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Query text with `$name` placeholders.
    pub text: String,
    /// Values bound to the placeholders.
    #[serde(default)]
    pub params: Params,
}

impl Query {
    /// A query without parameters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Params::new(),
        }
    }

    /// Bind a parameter, builder style.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Runs graph queries on behalf of the visualization core.
///
/// Implementations classify column values into [`crate::Value`] variants.
/// Callers own the collaborator's lifecycle and pass it in explicitly.
pub trait GraphQuery {
    /// Execute a query and return its rows.
    fn execute(&self, query: &Query) -> VizResult<Vec<Row>>;
}

impl<T: GraphQuery + ?Sized> GraphQuery for &T {
    fn execute(&self, query: &Query) -> VizResult<Vec<Row>> {
        (**self).execute(query)
    }
}

impl<T: GraphQuery + ?Sized> GraphQuery for Box<T> {
    fn execute(&self, query: &Query) -> VizResult<Vec<Row>> {
        (**self).execute(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;
    use serde_json::json;

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
    fn params_bind_in_order() {
        let q = Query::new("MATCH (n) RETURN n LIMIT $limit").param("limit", 10);
        assert_eq!(q.params.get("limit"), Some(&json!(10)));
        assert!(q.text.contains("$limit"));
    }

    #[test]
    fn trait_is_object_safe() {
        let backend: Box<dyn GraphQuery> = Box::new(Fixed(vec![Row::new().with("test", 1i64)]));
        let rows = backend.execute(&Query::new("RETURN 1 AS test")).unwrap();
        assert_eq!(rows[0].i64_field("test"), Some(1));
    }

    #[test]
    fn failure_propagates_through_reference() {
        let down = Down;
        let by_ref: &dyn GraphQuery = &down;
        assert!(by_ref.execute(&Query::new("RETURN 1")).is_err());
    }
}
