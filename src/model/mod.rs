//! Abstract node/edge graph model handed to rendering adapters.
//!
//! The model carries identity, category and display attributes only; it knows
//! nothing about any particular rendering library.

pub mod builder;
pub mod expansion;
pub mod style;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::ontology::OntologyClass;

pub use builder::{BuildOptions, LayerFilter, build_work_graph};
pub use expansion::ExpansionState;
pub use style::{Shape, Style};

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Work,
    Person,
    Keyword,
    Event,
    Section,
    /// Argument-typed node found next to the focal work.
    Argument,
    /// Argument-typed node found deeper in the argument structure.
    ArgumentNeighbor(Option<OntologyClass>),
    /// Schema-level group node.
    ClassGroup(OntologyClass),
    Other,
}

impl NodeCategory {
    pub fn is_class_group(self) -> bool {
        matches!(self, NodeCategory::ClassGroup(_))
    }
}

/// A rendered node. `id` is an IRI or `"class:" + key` for class groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    /// Visible label, truncated.
    pub label: String,
    /// Hover text, never truncated.
    pub hover: String,
    pub category: NodeCategory,
    pub style: Style,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, hover: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            hover: hover.into(),
            category,
            style: Style::for_category(category),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A directed, labelled edge between two nodes of the same model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: String,
    pub color: &'static str,
    pub directed: bool,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, label: impl Into<String>, color: &'static str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.into(),
            color,
            directed: true,
        }
    }
}

/// Nodes and edges of one build.
///
/// Node identity is unique: the first node added under an id keeps its
/// attributes. Edges are unique by `(source, target, label)`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    edge_keys: HashSet<(String, String, String)>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node unless its id is taken; returns whether it was added.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Add an edge unless an identical one exists; returns whether it was added.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let key = (edge.source.clone(), edge.target.clone(), edge.label.clone());
        if !self.edge_keys.insert(key) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Class-group node of `class`, if rendered.
    pub fn class_group(&self, class: OntologyClass) -> Option<&Node> {
        self.node(&class.node_id())
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Truncate a visible label to at most `max` characters.
pub fn truncate_label(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins_for_nodes() {
        let mut model = GraphModel::new();
        assert!(model.add_node(Node::new("http://ex.org/A1", "first", "first", NodeCategory::Argument)));
        assert!(!model.add_node(Node::new("http://ex.org/A1", "second", "second", NodeCategory::Other)));
        assert_eq!(model.node_count(), 1);
        let node = model.node("http://ex.org/A1").unwrap();
        assert_eq!(node.label, "first");
        assert_eq!(node.category, NodeCategory::Argument);
    }

    #[test]
    fn edges_are_deduplicated() {
        let mut model = GraphModel::new();
        assert!(model.add_edge(Edge::new("a", "b", "p", "#999999")));
        assert!(!model.add_edge(Edge::new("a", "b", "p", "#000000")));
        assert!(model.add_edge(Edge::new("a", "b", "q", "#999999")));
        assert_eq!(model.edge_count(), 2);
        assert!(model.has_edge("a", "b"));
        assert!(!model.has_edge("b", "a"));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_label("Überblick über alles", 5), "Überb");
        assert_eq!(truncate_label("short", 40), "short");
    }

    #[test]
    fn json_shape_omits_indexes() {
        let mut model = GraphModel::new();
        model.add_node(Node::new("http://ex.org/W1", "W1", "Paper A", NodeCategory::Work));
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["nodes"][0]["hover"], "Paper A");
        assert_eq!(json["nodes"][0]["category"], "work");
        assert!(json.get("index").is_none());
    }
}
