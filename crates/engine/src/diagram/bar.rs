//! Bar chart of named metrics.

use serde::Serialize;
use serde_json::json;

use super::Figure;

/// Categories and values, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    /// Chart title.
    pub title: String,
    /// Category names.
    pub categories: Vec<String>,
    /// One value per category.
    pub values: Vec<f64>,
}

impl BarChart {
    /// Title used for graph metric charts.
    pub const METRICS_TITLE: &'static str = "Graph Metrics Overview";

    /// Build a metrics chart from (name, value) pairs.
    pub fn metrics<I, K>(metrics: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let (categories, values) = metrics.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self {
            title: Self::METRICS_TITLE.to_string(),
            categories,
            values,
        }
    }

    /// Bar figure.
    pub fn to_figure(&self) -> Figure {
        Figure {
            data: vec![json!({
                "type": "bar",
                "x": self.categories,
                "y": self.values,
                "marker": { "color": "#4ECDC4" },
            })],
            layout: json!({
                "title": self.title,
                "xaxis": { "title": "Metric" },
                "yaxis": { "title": "Value" },
                "height": 400,
            }),
        }
    }
}
