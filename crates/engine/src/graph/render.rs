//! Interactive HTML rendering of a [`RenderGraph`].
//!
//! The output is a standalone page driven by vis-network. Hosts either embed
//! the markup directly ([`InteractiveGraph::to_html`]) or ask for a temporary
//! file ([`InteractiveGraph::write_artifact`]) that is removed when the
//! returned [`HtmlArtifact`] is dropped.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use kgdash_core::VizResult;
use serde_json::json;

use super::layout::Layout;
use super::types::RenderGraph;

const VIS_NETWORK_JS: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// A render graph paired with a layout and canvas size.
#[derive(Debug, Clone)]
pub struct InteractiveGraph {
    graph: RenderGraph,
    layout: Layout,
    height: String,
    width: String,
}

impl InteractiveGraph {
    /// Wrap a graph. Hierarchical layouts reorder nodes sources-first.
    pub fn new(mut graph: RenderGraph, layout: Layout) -> Self {
        if layout.sorts_by_direction() {
            graph.sort_by_edge_direction();
        }
        Self {
            graph,
            layout,
            height: "600px".to_string(),
            width: "100%".to_string(),
        }
    }

    /// Override the canvas size (CSS lengths).
    pub fn size(mut self, height: impl Into<String>, width: impl Into<String>) -> Self {
        self.height = height.into();
        self.width = width.into();
        self
    }

    /// The wrapped graph.
    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    /// The layout in use.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// The data and options objects handed to the renderer.
    pub fn payload(&self) -> serde_json::Value {
        let nodes: Vec<serde_json::Value> = self
            .graph
            .nodes()
            .iter()
            .map(|n| {
                json!({
                    "id": n.id,
                    "label": n.label,
                    "color": n.color,
                    "title": n.title,
                })
            })
            .collect();
        let edges: Vec<serde_json::Value> = self
            .graph
            .edges()
            .iter()
            .map(|e| {
                json!({
                    "from": e.from,
                    "to": e.to,
                    "label": e.label,
                    "arrows": "to",
                })
            })
            .collect();
        json!({
            "nodes": nodes,
            "edges": edges,
            "options": self.layout.config().to_json(),
        })
    }

    /// Standalone HTML page.
    pub fn to_html(&self) -> String {
        let payload = self.payload();
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="{js}"></script>
<style>
  #graph {{ height: {height}; width: {width}; border: 1px solid lightgray; }}
</style>
</head>
<body>
<div id="graph"></div>
<script>
  const nodes = new vis.DataSet({nodes});
  const edges = new vis.DataSet({edges});
  const options = {options};
  const container = document.getElementById("graph");
  new vis.Network(container, {{ nodes: nodes, edges: edges }}, options);
</script>
</body>
</html>
"#,
            js = VIS_NETWORK_JS,
            height = css_escape(&self.height),
            width = css_escape(&self.width),
            nodes = script_json(&payload["nodes"]),
            edges = script_json(&payload["edges"]),
            options = script_json(&payload["options"]),
        )
    }

    /// Write the page to a temporary `.html` file.
    ///
    /// The file lives as long as the returned artifact.
    pub fn write_artifact(&self) -> VizResult<HtmlArtifact> {
        let mut file = tempfile::Builder::new()
            .prefix("kgdash-graph-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(self.to_html().as_bytes())?;
        file.flush()?;
        tracing::debug!(target: "kgdash::render", path = %file.path().display(), "wrote graph artifact");
        Ok(HtmlArtifact { file })
    }
}

/// A rendered page on disk, deleted on drop.
#[derive(Debug)]
pub struct HtmlArtifact {
    file: tempfile::NamedTempFile,
}

impl HtmlArtifact {
    /// Location of the file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the page back.
    pub fn read_to_string(&mut self) -> VizResult<String> {
        let handle = self.file.as_file_mut();
        handle.seek(SeekFrom::Start(0))?;
        let mut out = String::new();
        handle.read_to_string(&mut out)?;
        Ok(out)
    }
}

/// Write the page to a temporary file and hand it to `f`.
///
/// The file is removed on every path out of this function, including when
/// `f` fails.
pub fn with_artifact<T, F>(graph: &InteractiveGraph, f: F) -> VizResult<T>
where
    F: FnOnce(&mut HtmlArtifact) -> VizResult<T>,
{
    let mut artifact = graph.write_artifact()?;
    let result = f(&mut artifact);
    if let Err(e) = &result {
        tracing::debug!(target: "kgdash::render", path = %artifact.path().display(), error = %e, "discarding graph artifact");
    }
    result
}

/// Render through a temporary file and return the page contents.
pub fn render_via_artifact(graph: &InteractiveGraph) -> VizResult<String> {
    with_artifact(graph, HtmlArtifact::read_to_string)
}

/// JSON safe to place inside a `<script>` element.
fn script_json(value: &serde_json::Value) -> String {
    value
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

fn css_escape(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '%' | '.' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{RenderEdge, RenderNode};
    use kgdash_core::VizError;

    fn sample() -> RenderGraph {
        let mut g = RenderGraph::new();
        for (id, label) in [("b", "B"), ("a", "</script><b>x")] {
            g.add_node(RenderNode {
                id: id.to_string(),
                label: label.to_string(),
                color: "#999999".to_string(),
                title: "Node: ".to_string(),
                type_label: "Node".to_string(),
            });
        }
        g.add_edge(RenderEdge {
            from: "a".into(),
            to: "b".into(),
            label: "LINKS".into(),
        })
        .unwrap();
        g
    }

    #[test]
    fn html_embeds_nodes_edges_and_options() {
        let html = InteractiveGraph::new(sample(), Layout::Circular).to_html();
        assert!(html.contains("vis.Network"));
        assert!(html.contains("\"LINKS\""));
        assert!(html.contains("\"randomSeed\":2"));
        assert!(html.contains("height: 600px"));
    }

    #[test]
    fn labels_cannot_close_the_script() {
        let html = InteractiveGraph::new(sample(), Layout::ForceDirected).to_html();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script>"));
    }

    #[test]
    fn hierarchical_sorts_sources_first() {
        let ig = InteractiveGraph::new(sample(), Layout::Hierarchical);
        assert_eq!(ig.graph().nodes()[0].id, "a");
        let ig = InteractiveGraph::new(sample(), Layout::Random);
        assert_eq!(ig.graph().nodes()[0].id, "b");
    }

    #[test]
    fn artifact_is_removed_on_drop() {
        let ig = InteractiveGraph::new(sample(), Layout::ForceDirected);
        let mut artifact = ig.write_artifact().unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.read_to_string().unwrap(), ig.to_html());
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn render_via_artifact_matches_direct_html() {
        let ig = InteractiveGraph::new(sample(), Layout::Hierarchical).size("400px", "80%");
        assert_eq!(render_via_artifact(&ig).unwrap(), ig.to_html());
    }

    #[test]
    fn artifact_is_removed_when_the_consumer_fails() {
        let ig = InteractiveGraph::new(sample(), Layout::Circular);
        let mut seen = None;
        let result: VizResult<()> = with_artifact(&ig, |artifact| {
            assert!(artifact.path().exists());
            seen = Some(artifact.path().to_path_buf());
            Err(VizError::invalid_input("rejected page"))
        });
        assert_eq!(result, Err(VizError::invalid_input("rejected page")));
        let path = seen.unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn payload_uses_layout_options() {
        let ig = InteractiveGraph::new(RenderGraph::new(), Layout::Random);
        let p = ig.payload();
        assert_eq!(p["nodes"].as_array().unwrap().len(), 0);
        assert_eq!(p["options"]["physics"]["enabled"], false);
    }
}
