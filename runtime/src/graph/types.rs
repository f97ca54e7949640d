//! Graph document types: nodes keyed by segment tuple, count-labelled
//! edges, and the light/dark style palettes.

use crate::error::TaxonomyError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ─── Styles ───────────────────────────────────────────────────────────────────

/// Ordered `name = value` attribute list.
pub type Attributes = Vec<(String, String)>;

/// Fixed colour scheme for the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Light,
    Dark,
}

impl FromStr for Style {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(TaxonomyError::UnsupportedStyle(other.to_string())),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Graph-, node- and edge-level default attributes for a style.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub graph: Attributes,
    pub node: Attributes,
    pub edge: Attributes,
}

fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Style {
    /// Palette for this style with `title` as the graph label.
    pub fn palette(&self, title: &str) -> Palette {
        match self {
            Self::Dark => Palette {
                graph: attrs(&[
                    ("label", title),
                    ("bgcolor", "#3a3a3a"),
                    ("fontname", "Helvetica"),
                    ("fontsize", "18"),
                    ("fontcolor", "white"),
                ]),
                node: attrs(&[
                    ("style", "filled"),
                    ("color", "white"),
                    ("fillcolor", "black"),
                    ("fontname", "Helvetica"),
                    ("fontsize", "14"),
                    ("fontcolor", "white"),
                ]),
                edge: attrs(&[
                    ("color", "white"),
                    ("arrowhead", "open"),
                    ("fontname", "Helvetica"),
                    ("fontsize", "12"),
                    ("fontcolor", "white"),
                ]),
            },
            Self::Light => Palette {
                graph: attrs(&[
                    ("label", title),
                    ("fontname", "Helvetica"),
                    ("fontsize", "18"),
                    ("fontcolor", "black"),
                ]),
                node: attrs(&[
                    ("style", "filled"),
                    ("color", "black"),
                    ("fillcolor", "#dbdddd"),
                    ("fontname", "Helvetica"),
                    ("fontsize", "14"),
                    ("fontcolor", "black"),
                ]),
                edge: attrs(&[
                    ("color", "black"),
                    ("arrowhead", "open"),
                    ("fontname", "Helvetica"),
                    ("fontsize", "12"),
                    ("fontcolor", "black"),
                ]),
            },
        }
    }
}

// ─── Nodes and edges ──────────────────────────────────────────────────────────

/// Node outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    /// Host nodes (layer 0).
    Rectangle,
    /// Path segment nodes (layer 1 and deeper).
    Oval,
}

impl NodeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Oval => "oval",
        }
    }
}

/// A host or path segment in the taxonomy graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Segment tuple prefix identifying this node, host first.
    pub key: Vec<String>,
    pub label: String,
    /// 0 for hosts, `i` for the i-th path segment.
    pub layer: usize,
    /// URLs under this node.
    pub count: u64,
    pub shape: NodeShape,
}

/// Parent → child link labelled with the child's aggregate count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub label: String,
    pub count: u64,
}

// ─── Document ─────────────────────────────────────────────────────────────────

/// Abstract layered graph ready to be handed to a rendering backend.
#[derive(Debug, Clone)]
pub struct GraphDocument {
    pub name: String,
    pub graph: DiGraph<GraphNode, GraphEdge>,
    /// Layers actually plotted beyond the host layer.
    pub depth: usize,
    /// Requested depth, when it exceeded what the table offered.
    pub clamped_from: Option<usize>,
    pub style: Style,
    pub title: String,
    /// Graphviz canvas size.
    pub size: String,
    /// Graphviz layout direction.
    pub rankdir: String,
    index: HashMap<Vec<String>, NodeIndex>,
}

impl GraphDocument {
    pub fn new(style: Style, title: &str, size: &str, depth: usize) -> Self {
        Self {
            name: "sitemap".to_string(),
            graph: DiGraph::new(),
            depth,
            clamped_from: None,
            style,
            title: title.to_string(),
            size: size.to_string(),
            rankdir: "LR".to_string(),
            index: HashMap::new(),
        }
    }

    /// Add a node, or return the existing one with the same key.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.key) {
            return idx;
        }
        let key = node.key.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(key, idx);
        idx
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, count: u64) {
        self.graph.add_edge(
            from,
            to,
            GraphEdge {
                label: format_count(count),
                count,
            },
        );
    }

    /// Index of the node for a segment tuple prefix.
    pub fn lookup(&self, key: &[String]) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    /// Node for a segment tuple prefix.
    pub fn node(&self, key: &[&str]) -> Option<&GraphNode> {
        let key: Vec<String> = key.iter().map(|s| s.to_string()).collect();
        self.lookup(&key).map(|idx| &self.graph[idx])
    }

    /// Children of `key` in insertion order, with their edges.
    pub fn children(&self, key: &[&str]) -> Vec<(&GraphNode, &GraphEdge)> {
        let key: Vec<String> = key.iter().map(|s| s.to_string()).collect();
        let Some(idx) = self.lookup(&key) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        // petgraph walks outgoing edges newest first.
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| (&self.graph[e.target()], e.weight()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes on a given layer, in insertion order.
    pub fn layer(&self, layer: usize) -> Vec<&GraphNode> {
        self.graph
            .node_weights()
            .filter(|n| n.layer == layer)
            .collect()
    }
}

/// Format a count with `,` thousands separators.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
