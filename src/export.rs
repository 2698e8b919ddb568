//! Rendering adapters for the abstract graph model.
//!
//! JSON mirrors the model one-to-one; DOT targets Graphviz, with class groups
//! placed in their own cluster.

use serde::Serialize;

use crate::model::{GraphModel, Node, NodeCategory};
use crate::traverse::{HopReport, TraversalResult, TraversalState};

/// A built work graph together with how its triples were obtained.
#[derive(Debug, Clone, Serialize)]
pub struct WorkGraphExport<'a> {
    /// Focal work IRI.
    pub focal: &'a str,
    /// Resolved title, if any.
    pub title: Option<&'a str>,
    /// Terminal traversal state.
    pub state: TraversalState,
    /// One entry per issued hop.
    pub hops: &'a [HopReport],
    /// Number of merged triples.
    pub triples: usize,
    /// The rendered graph.
    pub graph: &'a GraphModel,
}

impl<'a> WorkGraphExport<'a> {
    pub fn new(result: &'a TraversalResult, graph: &'a GraphModel) -> Self {
        Self {
            focal: &result.focal,
            title: result.title.as_deref(),
            state: result.state,
            hops: &result.hops,
            triples: result.triples.len(),
            graph,
        }
    }
}

/// Pretty-printed JSON of any serializable export.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_line(index: usize, node: &Node) -> String {
    format!(
        "    n{index} [id=\"{}\", label=\"{}\", tooltip=\"{}\", shape={}, style=filled, fillcolor=\"{}\"];\n",
        dot_escape(&node.id),
        dot_escape(&node.label),
        dot_escape(&node.hover),
        node.style.shape,
        node.style.color,
    )
}

/// Graphviz `digraph` of the model.
pub fn to_dot(model: &GraphModel, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", dot_escape(name)));
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [fontname=\"Helvetica\"];\n");
    out.push_str("  edge [fontname=\"Helvetica\", fontsize=10];\n\n");

    let mut groups = String::new();
    let mut instances = String::new();
    for (i, node) in model.nodes().iter().enumerate() {
        let line = node_line(i, node);
        match node.category {
            NodeCategory::ClassGroup(_) => groups.push_str(&line),
            _ => instances.push_str(&line),
        }
    }

    if !groups.is_empty() {
        out.push_str("  subgraph cluster_schema {\n");
        out.push_str("    label=\"Ontology\";\n");
        out.push_str("    style=\"rounded,dashed\";\n");
        out.push_str("    color=\"#bdbdbd\";\n");
        out.push_str(&groups);
        out.push_str("  }\n\n");
    }
    out.push_str(&instances);

    let position = |id: &str| model.nodes().iter().position(|n| n.id == id);
    for edge in model.edges() {
        let (Some(source), Some(target)) = (position(&edge.source), position(&edge.target)) else {
            continue;
        };
        out.push_str(&format!(
            "  n{source} -> n{target} [label=\"{}\", color=\"{}\"];\n",
            dot_escape(&edge.label),
            edge.color,
        ));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Edge;
    use crate::ontology::OntologyClass;

    fn model() -> GraphModel {
        let mut model = GraphModel::new();
        let work = OntologyClass::Work;
        model.add_node(Node::new(work.node_id(), "Work", "fabio:Work: 0 instance(s)", NodeCategory::ClassGroup(work)));
        model.add_node(Node::new("http://ex.org/W1", "W1", "Paper \"A\"", NodeCategory::Work));
        model.add_edge(Edge::new(work.node_id(), "http://ex.org/W1", "instance", "#BBBBBB"));
        model
    }

    #[test]
    fn dot_escapes_and_clusters() {
        let dot = to_dot(&model(), "W1");
        assert!(dot.starts_with("digraph \"W1\" {"));
        assert!(dot.contains("subgraph cluster_schema"));
        assert!(dot.contains("tooltip=\"Paper \\\"A\\\"\""));
        assert!(dot.contains("n0 -> n1 [label=\"instance\""));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn json_lists_nodes_and_edges() {
        let json = to_json(&model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["directed"], true);
        assert_eq!(value["nodes"][0]["style"]["shape"], "diamond");
    }
}
