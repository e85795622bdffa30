//! Values returned by the graph query collaborator.
//!
//! The adapter that talks to the database classifies every column value at the
//! boundary:
//! - [`Value::Entity`]: a node with an explicit type label and properties
//! - [`Value::Relation`]: a relationship carrying its type
//! - [`Value::Scalar`]: anything else, kept as raw JSON
//!
//! The visualization core never inspects raw structures to guess which of the
//! three it is holding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Projection key under which queries return a node's labels.
///
/// `RETURN n {.*, __labels: labels(n)} AS n` lets the adapter tag the value
/// as an [`Entity`] without guessing.
pub const LABELS_KEY: &str = "__labels";

/// Projection key under which queries return a relationship's type.
pub const REL_TYPE_KEY: &str = "__type";

/// Property map of an entity or relation.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// A graph node as seen by one rendering request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier, unique within one query result.
    pub id: String,
    /// Type label (first label of the node), e.g. `PullRequest`.
    pub type_label: String,
    /// Every property of the node, `id` and `name` included.
    #[serde(default)]
    pub properties: Properties,
}

impl Entity {
    /// Create an entity with no properties.
    pub fn new(id: impl Into<String>, type_label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_label: type_label.into(),
            properties: Properties::new(),
        }
    }

    /// Create an entity from a property map.
    ///
    /// The identifier is the `id` property when present; otherwise the
    /// serialized property map stands in for it.
    pub fn from_properties(type_label: impl Into<String>, properties: Properties) -> Self {
        let id = match properties.get("id") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => {
                serde_json::Value::Object(properties.clone().into_iter().collect()).to_string()
            }
            Some(other) => other.to_string(),
        };
        Self {
            id,
            type_label: type_label.into(),
            properties,
        }
    }

    /// Attach a property, builder style.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The `name` property, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }

    /// The `description` property, when it is a string.
    pub fn description(&self) -> Option<&str> {
        self.properties.get("description").and_then(|v| v.as_str())
    }

    /// Name used for display: `name` or the identifier.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(&self.id)
    }
}

/// A relationship value carrying its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relationship type, e.g. `IMPLEMENTS`.
    pub rel_type: String,
    /// Relationship properties.
    #[serde(default)]
    pub properties: Properties,
}

impl Relation {
    /// Create a relation of the given type with no properties.
    pub fn new(rel_type: impl Into<String>) -> Self {
        Self {
            rel_type: rel_type.into(),
            properties: Properties::new(),
        }
    }
}

/// One column value of a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// A node.
    Entity(Entity),
    /// A relationship.
    Relation(Relation),
    /// Any other value.
    Scalar(serde_json::Value),
}

impl Value {
    /// Borrow as an entity.
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// The relationship type this value carries, if any.
    ///
    /// A relation carries its type; a bare string scalar is taken as the type
    /// itself (queries that `RETURN type(r)`).
    pub fn relation_type(&self) -> Option<&str> {
        match self {
            Value::Relation(r) => Some(&r.rel_type),
            Value::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Read an integer scalar. Whole floats are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(v) => v
                .as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
    }

    /// Read a numeric scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(v) => v.as_f64(),
            _ => None,
        }
    }

    /// True for a JSON `null` scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(serde_json::Value::Null))
    }

    /// Convert back to plain JSON, for tabular display.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Entity(e) => serde_json::Value::Object(e.properties.clone().into_iter().collect()),
            Value::Relation(r) => serde_json::Value::String(r.rel_type.clone()),
            Value::Scalar(v) => v.clone(),
        }
    }
}

impl From<Entity> for Value {
    fn from(e: Entity) -> Self {
        Value::Entity(e)
    }
}

impl From<Relation> for Value {
    fn from(r: Relation) -> Self {
        Value::Relation(r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(serde_json::Value::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(serde_json::Value::String(s))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(serde_json::Value::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(serde_json::Value::from(n))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Scalar(v)
    }
}

/// A result row: column name → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Insert a column.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    /// Look up a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Look up a string column.
    pub fn str_field(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Look up an integer column.
    pub fn i64_field(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    /// Look up a numeric column.
    pub fn f64_field(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Plain JSON object view of the row.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entity_id_from_id_property() {
        let mut props = Properties::new();
        props.insert("id".into(), json!("pr-1"));
        props.insert("name".into(), json!("Fix parser"));
        let e = Entity::from_properties("PullRequest", props);
        assert_eq!(e.id, "pr-1");
        assert_eq!(e.display_name(), "Fix parser");
    }

    #[test]
    fn entity_without_id_uses_serialized_properties() {
        let mut props = Properties::new();
        props.insert("name".into(), json!("orphan"));
        let e = Entity::from_properties("Task", props);
        assert_eq!(e.id, r#"{"name":"orphan"}"#);
    }

    #[test]
    fn numeric_id_is_stringified() {
        let mut props = Properties::new();
        props.insert("id".into(), json!(7));
        let e = Entity::from_properties("Task", props);
        assert_eq!(e.id, "7");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let e = Entity::new("agent-9", "Agent");
        assert_eq!(e.display_name(), "agent-9");
        assert!(e.description().is_none());
    }

    #[test]
    fn relation_type_from_relation_and_string() {
        assert_eq!(Value::from(Relation::new("USES")).relation_type(), Some("USES"));
        assert_eq!(Value::from("DEPENDS_ON").relation_type(), Some("DEPENDS_ON"));
        assert_eq!(Value::from(3i64).relation_type(), None);
        assert_eq!(Value::from(Entity::new("a", "Task")).relation_type(), None);
    }

    #[test]
    fn whole_float_reads_as_integer() {
        assert_eq!(Value::from(4.0).as_i64(), Some(4));
        assert_eq!(Value::from(4.5).as_i64(), None);
    }

    #[test]
    fn row_field_accessors() {
        let row = Row::new()
            .with("PR", "PR-001")
            .with("Count", 3i64)
            .with("density", 0.25);
        assert_eq!(row.str_field("PR"), Some("PR-001"));
        assert_eq!(row.i64_field("Count"), Some(3));
        assert_eq!(row.f64_field("density"), Some(0.25));
        assert!(row.get("missing").is_none());
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn row_to_json_flattens_values() {
        let row = Row::new()
            .with("n", Entity::new("a", "Task").with_property("id", "a"))
            .with("r", Relation::new("USES"));
        assert_eq!(row.to_json(), json!({"n": {"id": "a"}, "r": "USES"}));
    }
}
