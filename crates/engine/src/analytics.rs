//! Graph statistics, health and growth analytics.
//!
//! Every function here is best-effort: a failing query is logged and the
//! affected figures fall back to zero, `false`, or absent.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use kgdash_core::{GraphQuery, Query, Row, VizResult};
use serde::Serialize;

// =============================================================================
// Statistics
// =============================================================================

/// Overall counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    /// Number of nodes.
    pub node_count: i64,
    /// Number of relationships.
    pub relationship_count: i64,
    /// Number of distinct label sets.
    pub label_count: i64,
    /// Number of distinct relationship types.
    pub relationship_type_count: i64,
}

const STATISTICS_QUERIES: [(&str, &str); 4] = [
    ("node_count", "MATCH (n) RETURN count(n) AS count"),
    ("relationship_count", "MATCH ()-[r]->() RETURN count(r) AS count"),
    ("label_count", "MATCH (n) RETURN count(DISTINCT labels(n)) AS count"),
    (
        "relationship_type_count",
        "MATCH ()-[r]->() RETURN count(DISTINCT type(r)) AS count",
    ),
];

/// Count nodes, relationships, labels and relationship types.
pub fn graph_statistics(db: &dyn GraphQuery) -> GraphStatistics {
    let mut counts = [0i64; 4];
    for (slot, (name, text)) in counts.iter_mut().zip(STATISTICS_QUERIES) {
        *slot = match db.execute(&Query::new(text)) {
            Ok(rows) => rows.first().and_then(|r| r.i64_field("count")).unwrap_or(0),
            Err(e) => {
                tracing::warn!(target: "kgdash::query", error = %e, statistic = name, "statistics query failed");
                0
            }
        };
    }
    GraphStatistics {
        node_count: counts[0],
        relationship_count: counts[1],
        label_count: counts[2],
        relationship_type_count: counts[3],
    }
}

// =============================================================================
// Recent activity
// =============================================================================

/// A recently created entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// First label of the entity.
    pub entity_type: String,
    /// Entity name, when set.
    pub name: Option<String>,
    /// Creation timestamp as stored.
    pub created_at: String,
}

/// Entities with a `created_at` property, newest first.
pub fn recent_activity(db: &dyn GraphQuery, limit: usize) -> Vec<ActivityEntry> {
    let query = Query::new(
        "MATCH (n)\n\
         WHERE n.created_at IS NOT NULL\n\
         RETURN labels(n)[0] AS type, n.name AS name, toString(n.created_at) AS created_at\n\
         ORDER BY n.created_at DESC\n\
         LIMIT $limit",
    )
    .param("limit", limit as u64);

    match db.execute(&query) {
        Ok(rows) => rows
            .iter()
            .filter_map(|row| {
                Some(ActivityEntry {
                    entity_type: row.str_field("type").unwrap_or_default().to_string(),
                    name: row.str_field("name").map(str::to_string),
                    created_at: row.str_field("created_at")?.to_string(),
                })
            })
            .collect(),
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, "recent activity query failed");
            Vec::new()
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Result of a health probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// The backend answered at all.
    pub connection: bool,
    /// `RETURN 1` came back as 1.
    pub database_access: bool,
    /// At least one label exists.
    pub schema_present: bool,
}

impl HealthReport {
    /// Whether every check passed.
    pub fn is_healthy(&self) -> bool {
        self.connection && self.database_access && self.schema_present
    }

    /// Checks by display name.
    pub fn checks(&self) -> [(&'static str, bool); 3] {
        [
            ("Neo4j Connection", self.connection),
            ("Database Access", self.database_access),
            ("Schema Present", self.schema_present),
        ]
    }
}

/// Probe connectivity, query execution and schema presence.
pub fn check_health(db: &dyn GraphQuery) -> HealthReport {
    let mut report = HealthReport::default();

    let rows = match db.execute(&Query::new("RETURN 1 AS test")) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, "health probe failed");
            return report;
        }
    };
    report.connection = true;
    report.database_access = rows.first().and_then(|r| r.i64_field("test")) == Some(1);

    match db.execute(&Query::new("CALL db.labels()")) {
        Ok(labels) => report.schema_present = !labels.is_empty(),
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, "label listing failed");
        }
    }
    report
}

// =============================================================================
// Structural metrics
// =============================================================================

/// Structural metrics. A field is `None` when its query failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GraphMetrics {
    /// Average out-degree plus average in-degree.
    pub avg_degree: Option<f64>,
    /// Edges over possible directed edges.
    pub density: Option<f64>,
    /// Placeholder clustering coefficient.
    pub clustering: Option<f64>,
    /// Placeholder component count.
    pub components: Option<u64>,
}

impl GraphMetrics {
    /// Present metrics as (name, value) pairs, for charting.
    pub fn to_pairs(&self) -> Vec<(&'static str, f64)> {
        let mut out = Vec::new();
        if let Some(v) = self.avg_degree {
            out.push(("avg_degree", v));
        }
        if let Some(v) = self.density {
            out.push(("density", v));
        }
        if let Some(v) = self.clustering {
            out.push(("clustering", v));
        }
        if let Some(v) = self.components {
            out.push(("components", v as f64));
        }
        out
    }
}

/// Degree and density. Later metrics are skipped once a query fails.
pub fn graph_metrics(db: &dyn GraphQuery) -> GraphMetrics {
    let mut metrics = GraphMetrics::default();
    if let Err(e) = fill_metrics(db, &mut metrics) {
        tracing::warn!(target: "kgdash::query", error = %e, "metrics query failed");
    }
    metrics
}

fn fill_metrics(db: &dyn GraphQuery, metrics: &mut GraphMetrics) -> VizResult<()> {
    let rows = db.execute(&Query::new(
        "MATCH (n)\n\
         RETURN avg(size([(n)-->() | 1])) AS avg_out_degree,\n\
                avg(size([(n)<--() | 1])) AS avg_in_degree",
    ))?;
    if let Some(row) = rows.first() {
        let out = row.f64_field("avg_out_degree").unwrap_or(0.0);
        let inn = row.f64_field("avg_in_degree").unwrap_or(0.0);
        metrics.avg_degree = Some(out + inn);
    }

    let rows = db.execute(&Query::new(
        "MATCH (n)\n\
         WITH count(n) AS node_count\n\
         OPTIONAL MATCH ()-[r]->()\n\
         RETURN node_count, count(r) AS edge_count",
    ))?;
    if let Some(row) = rows.first() {
        let nodes = row.i64_field("node_count").unwrap_or(0);
        let edges = row.i64_field("edge_count").unwrap_or(0);
        metrics.density = Some(density(nodes, edges));
    }

    metrics.clustering = Some(0.0);
    metrics.components = Some(1);
    Ok(())
}

/// Directed density, 0 for graphs with fewer than two nodes.
pub fn density(nodes: i64, edges: i64) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    edges as f64 / (nodes as f64 * (nodes as f64 - 1.0))
}

// =============================================================================
// Growth and usage
// =============================================================================

/// Nodes created on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthPoint {
    /// Calendar day.
    pub day: NaiveDate,
    /// Nodes created that day.
    pub count: u64,
    /// Nodes created up to and including that day.
    pub cumulative: u64,
}

/// Per-day creation counts with a running total, oldest first.
pub fn growth(db: &dyn GraphQuery) -> Vec<GrowthPoint> {
    let query = Query::new(
        "MATCH (n)\n\
         WHERE n.created_at IS NOT NULL\n\
         RETURN toString(n.created_at) AS created_at",
    );
    match db.execute(&query) {
        Ok(rows) => growth_from_rows(&rows),
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, "growth query failed");
            Vec::new()
        }
    }
}

/// Bucket `created_at` values by day. Unparseable values are skipped.
pub fn growth_from_rows(rows: &[Row]) -> Vec<GrowthPoint> {
    let mut days: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in rows {
        let Some(raw) = row.str_field("created_at") else {
            continue;
        };
        match parse_day(raw) {
            Some(day) => *days.entry(day).or_insert(0) += 1,
            None => {
                tracing::debug!(target: "kgdash::query", value = raw, "unparseable created_at");
            }
        }
    }

    let mut total = 0;
    days.into_iter()
        .map(|(day, count)| {
            total += count;
            GrowthPoint {
                day,
                count,
                cumulative: total,
            }
        })
        .collect()
}

/// Calendar day at the head of a date or date-time string.
///
/// Only the leading `YYYY-MM-DD` is read, so minute-precision times,
/// offsets and bracketed zone names all resolve to the day written in
/// the value. The date must be followed by nothing, `T` or a space.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    match raw[10..].chars().next() {
        None | Some('T') | Some(' ') => {}
        Some(_) => return None,
    }
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Node count per entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeUsage {
    /// First label.
    pub entity_type: String,
    /// Nodes of that type.
    pub count: u64,
}

/// Node counts per type, largest first.
pub fn usage_patterns(db: &dyn GraphQuery) -> Vec<TypeUsage> {
    let query = Query::new(
        "MATCH (n)\n\
         RETURN labels(n)[0] AS type, count(*) AS count\n\
         ORDER BY count DESC",
    );
    let rows = match db.execute(&query) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(target: "kgdash::query", error = %e, "usage query failed");
            return Vec::new();
        }
    };
    let mut usage: Vec<TypeUsage> = rows
        .iter()
        .filter_map(|row| {
            Some(TypeUsage {
                entity_type: row.str_field("type")?.to_string(),
                count: row.i64_field("count").unwrap_or(0).max(0) as u64,
            })
        })
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}
