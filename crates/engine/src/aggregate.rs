//! Workflow and coordination aggregation views.
//!
//! Both views reduce relationships to `(source, action, target, count)` rows.
//! The database does the first grouping; rows are then merged and ordered in
//! process so the result is deterministic whatever the backend returns.

use std::collections::BTreeMap;

use kgdash_core::{GraphQuery, Query, Row, Value};
use serde::{Deserialize, Serialize};

/// Source type of the workflow view in the stock dashboard.
pub const DEFAULT_WORKFLOW_SOURCE: &str = "PullRequest";

/// Peer type of the coordination view in the stock dashboard.
pub const DEFAULT_COORDINATION_PEER: &str = "Agent";

/// Placeholder for a missing or null name column.
pub const UNNAMED: &str = "(unnamed)";

/// One grouped relationship count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRow {
    /// Source label (entity name).
    pub source: String,
    /// Relationship type.
    pub action: String,
    /// Target label (entity type for workflows, entity name for coordination).
    pub target: String,
    /// Number of relationships, at least 1.
    pub count: u64,
}

impl AggregationRow {
    /// A row with count 1.
    pub fn new(
        source: impl Into<String>,
        action: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            action: action.into(),
            target: target.into(),
            count: 1,
        }
    }

    /// Set the count, builder style.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    fn key(&self) -> (String, String, String) {
        (self.source.clone(), self.action.clone(), self.target.clone())
    }
}

/// Column names of an aggregation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationColumns {
    /// Source column.
    pub source: &'static str,
    /// Action column.
    pub action: &'static str,
    /// Target column.
    pub target: &'static str,
    /// Count column.
    pub count: &'static str,
}

/// Columns of the workflow table.
pub const WORKFLOW_COLUMNS: AggregationColumns = AggregationColumns {
    source: "PR",
    action: "Action",
    target: "Target",
    count: "Count",
};

/// Columns of the coordination table.
pub const COORDINATION_COLUMNS: AggregationColumns = AggregationColumns {
    source: "Source",
    action: "Interaction",
    target: "Target",
    count: "Weight",
};

/// Query grouping relationships out of entities of `source_type`.
pub fn workflow_query(source_type: &str) -> Query {
    Query::new(
        "MATCH (pr)-[r]->(s)\n\
         WHERE $source_type IN labels(pr)\n\
         RETURN pr.name AS PR, type(r) AS Action, labels(s)[0] AS Target, count(*) AS Count\n\
         ORDER BY PR, Action",
    )
    .param("source_type", source_type)
}

/// Query grouping relationships between entities of `peer_type`.
pub fn coordination_query(peer_type: &str) -> Query {
    Query::new(
        "MATCH (a1)-[r]->(a2)\n\
         WHERE $peer_type IN labels(a1) AND $peer_type IN labels(a2)\n\
         RETURN a1.name AS Source, type(r) AS Interaction, a2.name AS Target, count(*) AS Weight\n\
         ORDER BY Weight DESC",
    )
    .param("peer_type", peer_type)
}

/// Read aggregation rows from query rows.
///
/// A missing count counts as 1; rows with a count below 1 are dropped.
pub fn rows_from_table(rows: &[Row], columns: AggregationColumns) -> Vec<AggregationRow> {
    rows.iter()
        .filter_map(|row| {
            let count = match row.get(columns.count) {
                None => 1,
                Some(v) => v.as_i64().unwrap_or(1),
            };
            if count < 1 {
                return None;
            }
            Some(AggregationRow {
                source: label(row.get(columns.source)),
                action: label(row.get(columns.action)),
                target: label(row.get(columns.target)),
                count: count as u64,
            })
        })
        .collect()
}

fn label(value: Option<&Value>) -> String {
    match value {
        None => UNNAMED.to_string(),
        Some(v) if v.is_null() => UNNAMED.to_string(),
        Some(v) => match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_json().to_string(),
        },
    }
}

fn group<I>(rows: I) -> BTreeMap<(String, String, String), u64>
where
    I: IntoIterator<Item = AggregationRow>,
{
    let mut groups: BTreeMap<(String, String, String), u64> = BTreeMap::new();
    for row in rows {
        if row.count == 0 {
            continue;
        }
        *groups.entry(row.key()).or_insert(0) += row.count;
    }
    groups
}

fn ungroup(groups: BTreeMap<(String, String, String), u64>) -> Vec<AggregationRow> {
    groups
        .into_iter()
        .map(|((source, action, target), count)| AggregationRow {
            source,
            action,
            target,
            count,
        })
        .collect()
}

/// Merge rows by (source, action, target), ordered by source, then action,
/// then target.
pub fn aggregate_workflow<I>(rows: I) -> Vec<AggregationRow>
where
    I: IntoIterator<Item = AggregationRow>,
{
    ungroup(group(rows))
}

/// Merge rows by (source, action, target), ordered by count descending.
/// Equal counts keep key order.
pub fn aggregate_coordination<I>(rows: I) -> Vec<AggregationRow>
where
    I: IntoIterator<Item = AggregationRow>,
{
    let mut out = ungroup(group(rows));
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Run the workflow view. Query failures yield an empty view.
pub fn fetch_workflow(db: &dyn GraphQuery, source_type: &str) -> Vec<AggregationRow> {
    match db.execute(&workflow_query(source_type)) {
        Ok(rows) => aggregate_workflow(rows_from_table(&rows, WORKFLOW_COLUMNS)),
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, source_type, "workflow query failed");
            Vec::new()
        }
    }
}

/// Run the coordination view. Query failures yield an empty view.
pub fn fetch_coordination(db: &dyn GraphQuery, peer_type: &str) -> Vec<AggregationRow> {
    match db.execute(&coordination_query(peer_type)) {
        Ok(rows) => aggregate_coordination(rows_from_table(&rows, COORDINATION_COLUMNS)),
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, peer_type, "coordination query failed");
            Vec::new()
        }
    }
}
