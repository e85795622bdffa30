//! Transactional endpoint responses → rows.

use kgdash_core::{Entity, Properties, Relation, Row, Value, VizError, VizResult, LABELS_KEY, REL_TYPE_KEY};
use serde::Deserialize;

/// Type label for entities returned without labels.
pub const UNLABELED: &str = "Node";

#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<DataRow>,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    #[serde(default)]
    row: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Decode a commit response body.
///
/// Server-reported errors win over any partial results.
pub fn decode_response(body: &str) -> VizResult<Vec<Row>> {
    let response: CommitResponse = serde_json::from_str(body)?;
    if let Some(err) = response.errors.first() {
        return Err(VizError::query(format!("{}: {}", err.code, err.message)));
    }
    let Some(result) = response.results.into_iter().next() else {
        return Ok(Vec::new());
    };
    Ok(result
        .data
        .into_iter()
        .map(|data| {
            result
                .columns
                .iter()
                .cloned()
                .zip(data.row.into_iter().map(classify))
                .collect()
        })
        .collect())
}

/// Classify one cell.
///
/// Objects tagged with the labels key are entities, objects tagged with the
/// relationship-type key are relations, anything else is a scalar.
pub fn classify(cell: serde_json::Value) -> Value {
    let serde_json::Value::Object(map) = cell else {
        return Value::Scalar(cell);
    };
    let mut properties: Properties = map.into_iter().collect();

    if let Some(labels) = properties.remove(LABELS_KEY) {
        let type_label = labels
            .as_array()
            .and_then(|l| l.first())
            .and_then(|l| l.as_str())
            .unwrap_or(UNLABELED)
            .to_string();
        return Value::Entity(Entity::from_properties(type_label, properties));
    }

    match properties.remove(REL_TYPE_KEY) {
        Some(serde_json::Value::String(rel_type)) => Value::Relation(Relation {
            rel_type,
            properties,
        }),
        Some(other) => {
            properties.insert(REL_TYPE_KEY.to_string(), other);
            Value::Scalar(serde_json::Value::Object(properties.into_iter().collect()))
        }
        None => Value::Scalar(serde_json::Value::Object(properties.into_iter().collect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_columns_and_tagged_cells() {
        let body = json!({
            "results": [{
                "columns": ["n", "r", "m", "count"],
                "data": [{
                    "row": [
                        {"id": "pr-1", "name": "Fix parser", "__labels": ["PullRequest"]},
                        {"since": 3, "__type": "IMPLEMENTS"},
                        {"__labels": []},
                        7
                    ]
                }]
            }],
            "errors": []
        })
        .to_string();
        let rows = decode_response(&body).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];

        let n = row.get("n").unwrap().as_entity().unwrap();
        assert_eq!(n.id, "pr-1");
        assert_eq!(n.type_label, "PullRequest");
        assert!(!n.properties.contains_key(LABELS_KEY));

        assert_eq!(row.get("r").unwrap().relation_type(), Some("IMPLEMENTS"));
        assert_eq!(row.get("m").unwrap().as_entity().unwrap().type_label, UNLABELED);
        assert_eq!(row.i64_field("count"), Some(7));
    }

    #[test]
    fn server_errors_become_query_errors() {
        let body = json!({
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "bad"}]
        })
        .to_string();
        let err = decode_response(&body).unwrap_err();
        assert_eq!(
            err,
            VizError::query("Neo.ClientError.Statement.SyntaxError: bad")
        );
    }

    #[test]
    fn missing_results_is_empty() {
        assert!(decode_response("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_serialization_error() {
        let err = decode_response("<html>").unwrap_err();
        assert!(matches!(err, VizError::Serialization { .. }));
    }

    #[test]
    fn plain_maps_stay_scalar() {
        let v = classify(json!({"a": 1}));
        assert_eq!(v, Value::Scalar(json!({"a": 1})));
        let v = classify(json!({"__type": 5}));
        assert_eq!(v, Value::Scalar(json!({"__type": 5})));
    }
}
