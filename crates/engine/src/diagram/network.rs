//! Weighted directed network diagrams with a spring-model layout.
//!
//! The layout is Fruchterman-Reingold: nodes repel with `k² / d`, linked
//! nodes attract with `d² / k`, and movement per step is capped by a
//! temperature that cools linearly to zero. Positions are rescaled so the
//! largest coordinate magnitude is `scale`, centered on the origin.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;

use super::Figure;
use crate::aggregate::AggregationRow;

/// Message shown when there is nothing to draw.
pub const NO_COORDINATION_DATA: &str = "No coordination data available";

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

const MIN_DISTANCE: f64 = 0.01;

/// Spring layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Optimal node distance.
    pub k: f64,
    /// Maximum number of steps.
    pub iterations: usize,
    /// Seed for the initial placement.
    pub seed: u64,
    /// Stop once the mean displacement per node falls below this.
    pub threshold: f64,
    /// Half-width of the output box.
    pub scale: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            k: 2.0,
            iterations: 50,
            seed: DEFAULT_SEED,
            threshold: 1e-4,
            scale: 1.0,
        }
    }
}

impl SpringConfig {
    /// Set the seed, builder style.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the iteration count, builder style.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the optimal distance, builder style.
    pub fn k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }
}

/// A positioned node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNode {
    /// Entity name.
    pub name: String,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// A drawn edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkEdge {
    /// Index into [`NetworkDiagram::nodes`].
    pub source: usize,
    /// Index into [`NetworkDiagram::nodes`].
    pub target: usize,
    /// Relationship type.
    pub interaction: String,
    /// Relationship count.
    pub weight: u64,
    /// Line width, proportional to weight.
    pub width: f64,
    /// Hover text, `"{interaction}: {weight}"`.
    pub hover: String,
}

/// Nodes with positions plus weighted edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkDiagram {
    /// One node per distinct entity, in first-seen order.
    pub nodes: Vec<NetworkNode>,
    /// One edge per input row.
    pub edges: Vec<NetworkEdge>,
    /// Set when the input was empty.
    pub annotation: Option<String>,
}

impl NetworkDiagram {
    /// Build with the default spring parameters.
    pub fn from_rows(rows: &[AggregationRow]) -> Self {
        Self::with_config(rows, &SpringConfig::default())
    }

    /// Build with explicit spring parameters.
    pub fn with_config(rows: &[AggregationRow], config: &SpringConfig) -> Self {
        if rows.is_empty() {
            return Self {
                nodes: Vec::new(),
                edges: Vec::new(),
                annotation: Some(NO_COORDINATION_DATA.to_string()),
            };
        }

        let mut graph: DiGraph<String, usize> = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();
        let mut edges = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let source = intern(&mut graph, &mut index, &row.source);
            let target = intern(&mut graph, &mut index, &row.target);
            graph.add_edge(source, target, i);
            edges.push(NetworkEdge {
                source: source.index(),
                target: target.index(),
                interaction: row.action.clone(),
                weight: row.count,
                width: row.count as f64,
                hover: format!("{}: {}", row.action, row.count),
            });
        }

        let positions = spring_layout(&graph, config);
        let nodes = graph
            .node_weights()
            .zip(positions)
            .map(|(name, [x, y])| NetworkNode {
                name: name.clone(),
                x,
                y,
            })
            .collect();

        Self {
            nodes,
            edges,
            annotation: None,
        }
    }

    /// Whether the diagram carries the "no data" marker.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Line traces per edge plus one marker trace for the nodes.
    pub fn to_figure(&self) -> Figure {
        if let Some(text) = &self.annotation {
            return Figure::no_data(text);
        }
        let mut data: Vec<serde_json::Value> = self
            .edges
            .iter()
            .map(|e| {
                let a = &self.nodes[e.source];
                let b = &self.nodes[e.target];
                json!({
                    "type": "scatter",
                    "x": [a.x, b.x, null],
                    "y": [a.y, b.y, null],
                    "mode": "lines",
                    "line": { "width": e.width, "color": "#888" },
                    "hoverinfo": "text",
                    "text": e.hover,
                    "showlegend": false,
                })
            })
            .collect();
        data.push(json!({
            "type": "scatter",
            "x": self.nodes.iter().map(|n| n.x).collect::<Vec<_>>(),
            "y": self.nodes.iter().map(|n| n.y).collect::<Vec<_>>(),
            "mode": "markers+text",
            "text": self.nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(),
            "textposition": "top center",
            "marker": { "size": 20, "color": "#4ECDC4", "line": { "width": 2, "color": "white" } },
            "hoverinfo": "text",
        }));
        let axis = json!({ "showgrid": false, "zeroline": false, "showticklabels": false });
        Figure {
            data,
            layout: json!({
                "title": "Agent Coordination Network",
                "showlegend": false,
                "hovermode": "closest",
                "margin": { "b": 0, "l": 0, "r": 0, "t": 40 },
                "xaxis": axis,
                "yaxis": axis,
                "height": 500,
            }),
        }
    }
}

fn intern(
    graph: &mut DiGraph<String, usize>,
    index: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    if let Some(&ix) = index.get(name) {
        return ix;
    }
    let ix = graph.add_node(name.to_string());
    index.insert(name.to_string(), ix);
    ix
}

/// Place the nodes of `graph`, indexed like its node indices.
///
/// Every pair of nodes repels; each distinct directed edge pulls its
/// source toward its target. Parallel edges and self-loops add nothing.
/// Deterministic for a given config. A single node sits at the origin.
pub fn spring_layout<N, E>(graph: &DiGraph<N, E>, config: &SpringConfig) -> Vec<[f64; 2]> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![[0.0, 0.0]],
        _ => {}
    }

    let links: BTreeSet<(usize, usize)> = graph
        .edge_references()
        .map(|e| (e.source().index(), e.target().index()))
        .filter(|(s, t)| s != t)
        .collect();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();

    let k = config.k;
    let mut t = 0.1 * span(&pos);
    let dt = t / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![[0.0f64; 2]; n];
        for i in 0..n {
            for j in 0..n {
                let (dx, dy, d) = offset(&pos, i, j);
                let f = k * k / (d * d);
                disp[i][0] += dx * f;
                disp[i][1] += dy * f;
            }
        }
        for &(src, dst) in &links {
            let (dx, dy, d) = offset(&pos, src, dst);
            let f = d / k;
            disp[src][0] -= dx * f;
            disp[src][1] -= dy * f;
        }

        let mut moved = 0.0;
        for (p, d) in pos.iter_mut().zip(&disp) {
            let mut len = (d[0] * d[0] + d[1] * d[1]).sqrt();
            if len < MIN_DISTANCE {
                len = 0.1;
            }
            let step = [d[0] * t / len, d[1] * t / len];
            p[0] += step[0];
            p[1] += step[1];
            moved += step[0] * step[0] + step[1] * step[1];
        }
        t -= dt;
        if moved.sqrt() / (n as f64) < config.threshold {
            break;
        }
    }

    rescale(&mut pos, config.scale);
    pos
}

fn offset(pos: &[[f64; 2]], i: usize, j: usize) -> (f64, f64, f64) {
    let dx = pos[i][0] - pos[j][0];
    let dy = pos[i][1] - pos[j][1];
    (dx, dy, (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE))
}

fn span(pos: &[[f64; 2]]) -> f64 {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in pos {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    (max_x - min_x).max(max_y - min_y)
}

fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    let mut lim = 0.0f64;
    for p in pos.iter_mut() {
        p[0] -= mean_x;
        p[1] -= mean_y;
        lim = lim.max(p[0].abs()).max(p[1].abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p[0] *= scale / lim;
            p[1] *= scale / lim;
        }
    }
}
