//! Multi-stage flow (Sankey) diagrams from aggregation rows.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::json;

use super::Figure;
use crate::aggregate::AggregationRow;

/// Message shown when there is nothing to draw.
pub const NO_WORKFLOW_DATA: &str = "No workflow data available";

/// One weighted link between two label indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowLink {
    /// Index into [`FlowDiagram::labels`].
    pub source: usize,
    /// Index into [`FlowDiagram::labels`].
    pub target: usize,
    /// Link weight.
    pub value: u64,
    /// Link label (the relationship type).
    pub label: String,
}

/// Labels plus links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowDiagram {
    /// Distinct sources and targets, in first-seen order.
    pub labels: Vec<String>,
    /// One link per input row.
    pub links: Vec<FlowLink>,
    /// Set when the input was empty.
    pub annotation: Option<String>,
}

impl FlowDiagram {
    /// Build from aggregation rows.
    pub fn from_rows(rows: &[AggregationRow]) -> Self {
        if rows.is_empty() {
            return Self {
                labels: Vec::new(),
                links: Vec::new(),
                annotation: Some(NO_WORKFLOW_DATA.to_string()),
            };
        }

        let mut labels: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut intern = |name: &str| -> usize {
            if let Some(&i) = index.get(name) {
                return i;
            }
            let i = labels.len();
            labels.push(name.to_string());
            index.insert(name.to_string(), i);
            i
        };

        // Sources first, then targets, matching how the label set is seeded.
        let sources: Vec<usize> = rows.iter().map(|r| intern(&r.source)).collect();
        let targets: Vec<usize> = rows.iter().map(|r| intern(&r.target)).collect();

        let links = rows
            .iter()
            .zip(sources.into_iter().zip(targets))
            .map(|(row, (source, target))| FlowLink {
                source,
                target,
                value: row.count,
                label: row.action.clone(),
            })
            .collect();

        Self {
            labels,
            links,
            annotation: None,
        }
    }

    /// Whether the diagram carries the "no data" marker.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Sankey figure.
    pub fn to_figure(&self) -> Figure {
        if let Some(text) = &self.annotation {
            return Figure::no_data(text);
        }
        let trace = json!({
            "type": "sankey",
            "node": {
                "pad": 15,
                "thickness": 20,
                "line": { "color": "black", "width": 0.5 },
                "label": self.labels,
            },
            "link": {
                "source": self.links.iter().map(|l| l.source).collect::<Vec<_>>(),
                "target": self.links.iter().map(|l| l.target).collect::<Vec<_>>(),
                "value": self.links.iter().map(|l| l.value).collect::<Vec<_>>(),
                "label": self.links.iter().map(|l| l.label.as_str()).collect::<Vec<_>>(),
            },
        });
        Figure {
            data: vec![trace],
            layout: json!({
                "title": "PR Workflow Visualization",
                "font": { "size": 10 },
                "height": 500,
            }),
        }
    }
}
