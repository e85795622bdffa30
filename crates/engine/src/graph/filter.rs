//! Query construction for the interactive graph.
//!
//! Filters become a parameterized Cypher query. Type labels, the search term
//! and the limit are bound as `$parameters`; none of them is ever spliced into
//! the query text.

use kgdash_core::{Query, VizError, VizResult, LABELS_KEY, REL_TYPE_KEY};

/// Predicate text that matches everything.
pub const MATCH_ALL: &str = "true";

/// Limit used when none is set.
pub const DEFAULT_LIMIT: usize = 100;

/// User-selected filters for the interactive graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFilter {
    node_types: Vec<String>,
    rel_types: Vec<String>,
    search: String,
    limit: usize,
}

impl Default for GraphFilter {
    fn default() -> Self {
        Self {
            node_types: Vec::new(),
            rel_types: Vec::new(),
            search: String::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl GraphFilter {
    /// No type restriction, no search, default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict source entities to these types. Duplicates are dropped.
    pub fn node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_types = dedup(types);
        self
    }

    /// Restrict relationships to these types. Duplicates are dropped.
    pub fn rel_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rel_types = dedup(types);
        self
    }

    /// Require the source entity's name or id to contain `term`.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Maximum number of triples returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Selected node types.
    pub fn selected_node_types(&self) -> &[String] {
        &self.node_types
    }

    /// Selected relationship types.
    pub fn selected_rel_types(&self) -> &[String] {
        &self.rel_types
    }

    /// The configured limit.
    pub fn result_limit(&self) -> usize {
        self.limit
    }

    /// Node predicate: `true`, or `$node_type_0 IN labels(n) OR ...`.
    pub fn node_predicate(&self) -> String {
        if self.node_types.is_empty() {
            return MATCH_ALL.to_string();
        }
        (0..self.node_types.len())
            .map(|i| format!("$node_type_{} IN labels(n)", i))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    /// Relationship predicate: `true`, or `type(r) = $rel_type_0 OR ...`.
    pub fn rel_predicate(&self) -> String {
        if self.rel_types.is_empty() {
            return MATCH_ALL.to_string();
        }
        (0..self.rel_types.len())
            .map(|i| format!("type(r) = $rel_type_{}", i))
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    /// Search clause, empty when there is no search term.
    pub fn search_clause(&self) -> &'static str {
        if self.search.is_empty() {
            ""
        } else {
            " AND (n.name CONTAINS $search OR n.id CONTAINS $search)"
        }
    }

    /// Build the query.
    ///
    /// Fails only when the limit is zero.
    pub fn to_query(&self) -> VizResult<Query> {
        if self.limit == 0 {
            return Err(VizError::invalid_input("Result limit must be at least 1"));
        }

        let text = format!(
            "MATCH (n)-[r]->(m)\n\
             WHERE ({node}){search}\n\
             AND ({rel})\n\
             WITH n, r, m\n\
             LIMIT $limit\n\
             RETURN n {{.*, {labels}: labels(n)}} AS n, \
             r {{.*, {rtype}: type(r)}} AS r, \
             m {{.*, {labels}: labels(m)}} AS m",
            node = self.node_predicate(),
            search = self.search_clause(),
            rel = self.rel_predicate(),
            labels = LABELS_KEY,
            rtype = REL_TYPE_KEY,
        );

        let mut query = Query::new(text).param("limit", self.limit as u64);
        for (i, t) in self.node_types.iter().enumerate() {
            query = query.param(format!("node_type_{}", i), t.as_str());
        }
        for (i, t) in self.rel_types.iter().enumerate() {
            query = query.param(format!("rel_type_{}", i), t.as_str());
        }
        if !self.search.is_empty() {
            query = query.param("search", self.search.as_str());
        }
        Ok(query)
    }
}

fn dedup<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.into();
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
