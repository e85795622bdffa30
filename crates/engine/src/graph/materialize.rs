//! Query rows → render graph.

use std::collections::HashSet;

use kgdash_core::{Entity, Row, Value};

use super::types::{
    ColorMap, RenderEdge, RenderGraph, RenderNode, FALLBACK_REL_TYPE, FALLBACK_TYPE_LABEL,
};

/// Column names of a (source, relation, target) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripleColumns<'a> {
    /// Source entity column.
    pub source: &'a str,
    /// Relation column.
    pub relation: &'a str,
    /// Target entity column.
    pub target: &'a str,
}

impl Default for TripleColumns<'_> {
    fn default() -> Self {
        Self {
            source: "n",
            relation: "r",
            target: "m",
        }
    }
}

/// One query triple, borrowed from a row.
#[derive(Debug, Clone, Copy)]
pub struct Triple<'a> {
    /// Source value.
    pub source: &'a Value,
    /// Relation value.
    pub relation: &'a Value,
    /// Target value.
    pub target: &'a Value,
}

impl<'a> Triple<'a> {
    /// Pull a triple out of a row; None when a column is missing.
    pub fn from_row(row: &'a Row, columns: TripleColumns<'_>) -> Option<Self> {
        Some(Self {
            source: row.get(columns.source)?,
            relation: row.get(columns.relation)?,
            target: row.get(columns.target)?,
        })
    }
}

/// Build a render graph from triples.
///
/// Nodes are registered once per identifier, first occurrence wins. Every
/// triple contributes one edge, parallel edges included.
pub fn materialize<'a, I>(triples: I, colors: &ColorMap) -> RenderGraph
where
    I: IntoIterator<Item = Triple<'a>>,
{
    let mut graph = RenderGraph::new();
    let mut seen: HashSet<String> = HashSet::new();

    for triple in triples {
        let source_id = register(&mut graph, &mut seen, triple.source, colors);
        let target_id = register(&mut graph, &mut seen, triple.target, colors);
        let label = triple
            .relation
            .relation_type()
            .unwrap_or(FALLBACK_REL_TYPE)
            .to_string();
        graph.push_edge(RenderEdge {
            from: source_id,
            to: target_id,
            label,
        });
    }

    graph
}

/// Build a render graph from rows using the default `n`, `r`, `m` columns.
///
/// Rows missing any of the three columns are skipped.
pub fn materialize_rows(rows: &[Row], colors: &ColorMap) -> RenderGraph {
    let columns = TripleColumns::default();
    let triples = rows.iter().filter_map(|row| {
        let t = Triple::from_row(row, columns);
        if t.is_none() {
            tracing::debug!(target: "kgdash::render", "skipping row without n/r/m columns");
        }
        t
    });
    materialize(triples, colors)
}

fn register(
    graph: &mut RenderGraph,
    seen: &mut HashSet<String>,
    value: &Value,
    colors: &ColorMap,
) -> String {
    let node = node_for(value, colors);
    let id = node.id.clone();
    if seen.insert(id.clone()) {
        graph.add_node(node);
    }
    id
}

fn node_for(value: &Value, colors: &ColorMap) -> RenderNode {
    match value {
        Value::Entity(entity) => RenderNode {
            id: entity.id.clone(),
            label: entity.display_name().to_string(),
            color: colors.lookup(&entity.type_label).to_string(),
            title: format!("{}: {}", entity.type_label, description_text(entity)),
            type_label: entity.type_label.clone(),
        },
        Value::Scalar(_) | Value::Relation(_) => {
            let id = match value {
                Value::Scalar(serde_json::Value::String(s)) => s.clone(),
                Value::Relation(r) => r.rel_type.clone(),
                other => other.to_json().to_string(),
            };
            RenderNode {
                label: id.clone(),
                id,
                color: colors.lookup(FALLBACK_TYPE_LABEL).to_string(),
                title: format!("{}: ", FALLBACK_TYPE_LABEL),
                type_label: FALLBACK_TYPE_LABEL.to_string(),
            }
        }
    }
}

/// Description as shown in the hover title. Strings are used as-is, other
/// non-null values in their JSON form.
fn description_text(entity: &Entity) -> String {
    match entity.properties.get("description") {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
