//! Deterministic display styles.
//!
//! Colors are a pure function of the node category (and, for argument nodes,
//! of the argument class) or of the edge predicate's namespace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::namespace::NamespaceRegistry;
use crate::ontology::OntologyClass;

use super::NodeCategory;

/// Node shape hint for the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Box,
    Ellipse,
    Dot,
    Diamond,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Box => write!(f, "box"),
            Shape::Ellipse => write!(f, "ellipse"),
            Shape::Dot => write!(f, "dot"),
            Shape::Diamond => write!(f, "diamond"),
        }
    }
}

/// Color, shape and size of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Style {
    pub color: &'static str,
    pub shape: Shape,
    pub size: u32,
}

pub const DEFAULT_ARGUMENT_COLOR: &str = "#C7F3C3";
pub const OVERVIEW_WORK_COLOR: &str = "#000000";
pub const CITATION_EDGE_COLOR: &str = "#4A8FE7";
pub const INSTANCE_EDGE_COLOR: &str = "#BBBBBB";

const INSTANCE_SIZE: u32 = 12;
const WORK_SIZE: u32 = 18;
const CLASS_GROUP_SIZE: u32 = 22;
const OVERVIEW_SIZE: u32 = 15;

/// Color of an argumentation class.
pub fn argument_color(class: Option<OntologyClass>) -> &'static str {
    match class {
        Some(OntologyClass::Argument) => "#A2F79A",
        Some(OntologyClass::Claim) => "#FFE8A3",
        Some(OntologyClass::Evidence) => "#FFB3B3",
        Some(OntologyClass::Backing) => "#B775F5",
        Some(OntologyClass::Warrant) => "#F3606D",
        Some(OntologyClass::Issue) => "#F3914F",
        Some(OntologyClass::Idea) => "#53EFFA",
        Some(OntologyClass::Approach) => "#E0FFE0",
        _ => DEFAULT_ARGUMENT_COLOR,
    }
}

/// Legend color of a class group.
fn class_group_color(class: OntologyClass) -> &'static str {
    match class {
        OntologyClass::Work => "#FFFFFF",
        OntologyClass::Person => "#A0C3FF",
        OntologyClass::Topic => "#D0D0D0",
        OntologyClass::Event => "#D6B2FF",
        OntologyClass::DiscourseElement => "#FFF5A1",
        other => argument_color(Some(other)),
    }
}

impl Style {
    /// Style of a work-graph node.
    pub fn for_category(category: NodeCategory) -> Self {
        let (color, shape, size) = match category {
            NodeCategory::Work => ("#FFFFFF", Shape::Box, WORK_SIZE),
            NodeCategory::Person => ("#A8C8FF", Shape::Ellipse, INSTANCE_SIZE),
            NodeCategory::Keyword => ("#DDDDDD", Shape::Ellipse, INSTANCE_SIZE),
            NodeCategory::Event => ("#E6CCFF", Shape::Ellipse, INSTANCE_SIZE),
            NodeCategory::Section => ("#FFF6A6", Shape::Ellipse, INSTANCE_SIZE),
            NodeCategory::Argument => (DEFAULT_ARGUMENT_COLOR, Shape::Box, INSTANCE_SIZE),
            NodeCategory::ArgumentNeighbor(class) => (argument_color(class), Shape::Ellipse, INSTANCE_SIZE),
            NodeCategory::ClassGroup(class) => (class_group_color(class), Shape::Diamond, CLASS_GROUP_SIZE),
            NodeCategory::Other => ("#CCCCCC", Shape::Ellipse, INSTANCE_SIZE),
        };
        Self { color, shape, size }
    }

    /// Style of a work node in the citation overview.
    pub fn overview_work() -> Self {
        Self {
            color: OVERVIEW_WORK_COLOR,
            shape: Shape::Dot,
            size: OVERVIEW_SIZE,
        }
    }
}

/// Edge color by the predicate's namespace.
pub fn edge_color(registry: &NamespaceRegistry, predicate: &str) -> &'static str {
    match registry.namespace_of(predicate).map(|ns| ns.prefix) {
        Some("amo") => "#D9376E",
        Some("idea") => "#FF8C42",
        Some("semsur") => "#FF5F00",
        Some("doco" | "deo" | "po") => "#4CB5AE",
        Some("fabio") => "#4A8FE7",
        Some("foaf") => "#9B6CC1",
        Some("rdfs") => "#666666",
        _ => "#999999",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_are_stable_per_category() {
        let a = Style::for_category(NodeCategory::Work);
        let b = Style::for_category(NodeCategory::Work);
        assert_eq!(a, b);
        assert_eq!(a.shape, Shape::Box);
        assert!(Style::for_category(NodeCategory::ClassGroup(OntologyClass::Claim)).size > a.size);
    }

    #[test]
    fn argument_neighbors_colored_by_class() {
        let claim = Style::for_category(NodeCategory::ArgumentNeighbor(Some(OntologyClass::Claim)));
        assert_eq!(claim.color, "#FFE8A3");
        let untyped = Style::for_category(NodeCategory::ArgumentNeighbor(None));
        assert_eq!(untyped.color, DEFAULT_ARGUMENT_COLOR);
    }

    #[test]
    fn edge_colors_follow_namespace() {
        let reg = NamespaceRegistry::global();
        assert_eq!(edge_color(reg, "http://purl.org/spar/amo/hasClaim"), "#D9376E");
        assert_eq!(edge_color(reg, "http://purl.org/spar/deo/hasPart"), "#4CB5AE");
        assert_eq!(edge_color(reg, "http://ex.org/p"), "#999999");
    }
}
