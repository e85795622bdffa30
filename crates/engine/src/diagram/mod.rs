//! Diagram specifications for a charting front end.
//!
//! Builders produce typed diagrams that can be inspected directly and turned
//! into a plotly-style [`Figure`] (`{"data": [...], "layout": {...}}`).

pub mod bar;
pub mod flow;
pub mod network;

pub use bar::BarChart;
pub use flow::{FlowDiagram, FlowLink};
pub use network::{NetworkDiagram, NetworkEdge, NetworkNode, SpringConfig};

use serde::Serialize;
use serde_json::json;

/// A chart figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Trace objects.
    pub data: Vec<serde_json::Value>,
    /// Layout object.
    pub layout: serde_json::Value,
}

impl Figure {
    /// A figure with no traces and a centered message.
    pub fn no_data(message: &str) -> Self {
        Self {
            data: Vec::new(),
            layout: json!({
                "annotations": [{
                    "text": message,
                    "showarrow": false,
                    "xref": "paper",
                    "yref": "paper",
                    "x": 0.5,
                    "y": 0.5,
                }],
            }),
        }
    }

    /// Text of the first annotation, if any.
    pub fn annotation(&self) -> Option<&str> {
        self.layout
            .get("annotations")?
            .as_array()?
            .first()?
            .get("text")?
            .as_str()
    }

    /// The figure as one JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        json!({ "data": self.data, "layout": self.layout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_carries_message() {
        let fig = Figure::no_data("Nothing here");
        assert!(fig.data.is_empty());
        assert_eq!(fig.annotation(), Some("Nothing here"));
        assert_eq!(fig.to_json()["data"], json!([]));
    }
}
