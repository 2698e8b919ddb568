//! Graph Model Builder: classified triples + expansion state → node/edge model.
//!
//! A build is a pure function of its inputs. Skeleton traversals render the
//! focal work alone. Expanded traversals render the full ontology skeleton of
//! class groups, the focal work, and the instances of every expanded group.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::classify::{Hop, Layer, MetadataKind, TripleClassifier};
use crate::config::ExplorerConfig;
use crate::namespace::{NamespaceCategory, NamespaceRegistry, iri, label_rank, local_name, pretty_keyword};
use crate::ontology::{ARTIFACT_UMBRELLA, OntologyClass, SCHEMA};
use crate::traverse::{TraversalResult, TraversalState};

use super::expansion::ExpansionState;
use super::style::{INSTANCE_EDGE_COLOR, edge_color};
use super::{Edge, GraphModel, Node, NodeCategory, truncate_label};

/// Label of the edge from a class group to one of its instances.
pub const INSTANCE_EDGE_LABEL: &str = "instance";

// ----- layer filter -----

/// Which semantic layers contribute to a build. Everything is shown by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFilter {
    hidden: Vec<Layer>,
}

impl LayerFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn hide(&mut self, layer: Layer) {
        if !self.hidden.contains(&layer) {
            self.hidden.push(layer);
        }
    }

    /// Hide a layer by name. `"metadata"` hides all three metadata buckets.
    /// Returns `false` for an unknown name.
    ///
    /// Local classification puts foaf and bibo types under structure, so the
    /// person and event buckets only hold triples carrying a store-side
    /// `layer` hint.
    pub fn hide_named(&mut self, name: &str) -> bool {
        if name == "metadata" {
            for kind in [MetadataKind::Person, MetadataKind::Keyword, MetadataKind::Event] {
                self.hide(Layer::Metadata(kind));
            }
            return true;
        }
        match Layer::from_hint(name) {
            Some(layer) => {
                self.hide(layer);
                true
            }
            None => false,
        }
    }

    pub fn shows(&self, layer: Layer) -> bool {
        !self.hidden.contains(&layer)
    }
}

/// Options of a work-graph build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub layers: LayerFilter,
    /// Maximum visible label length in characters.
    pub label_max_len: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            layers: LayerFilter::all(),
            label_max_len: 40,
        }
    }
}

impl BuildOptions {
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self {
            layers: LayerFilter::all(),
            label_max_len: config.label_max_len,
        }
    }
}

// ----- entry point -----

/// Build the node/edge model of a traversed work.
pub fn build_work_graph(
    result: &TraversalResult,
    expansion: &ExpansionState,
    options: &BuildOptions,
) -> GraphModel {
    match result.state {
        TraversalState::Skeleton => build_skeleton(result, options),
        TraversalState::Expanded => WorkGraphBuilder::new(result, expansion, options).build(),
    }
}

/// Single node: short identifier as label, resolved title as hover.
fn build_skeleton(result: &TraversalResult, options: &BuildOptions) -> GraphModel {
    let focal = result.focal.as_str();
    let hover = result.title.as_deref().unwrap_or(focal);
    let mut model = GraphModel::new();
    model.add_node(Node::new(
        focal,
        truncate_label(local_name(focal), options.label_max_len),
        hover,
        NodeCategory::Work,
    ));
    model
}

// ----- expanded builder -----

struct WorkGraphBuilder<'a> {
    result: &'a TraversalResult,
    expansion: &'a ExpansionState,
    options: &'a BuildOptions,
    registry: &'static NamespaceRegistry,
    classifier: TripleClassifier<'static>,
    /// Objects of `rdf:type` triples, per subject.
    declared_types: HashMap<&'a str, Vec<&'a str>>,
    /// Best literal label per subject, with its priority rank.
    declared_labels: HashMap<&'a str, (usize, &'a str)>,
    buckets: BTreeMap<OntologyClass, Vec<&'a str>>,
    model: GraphModel,
}

impl<'a> WorkGraphBuilder<'a> {
    fn new(result: &'a TraversalResult, expansion: &'a ExpansionState, options: &'a BuildOptions) -> Self {
        let mut declared_types: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut declared_labels: HashMap<&str, (usize, &str)> = HashMap::new();
        for t in result.triples.triples() {
            let subject = t.triple.subject.as_str();
            if t.triple.predicate == iri::RDF_TYPE && t.object_is_resource {
                declared_types.entry(subject).or_default().push(t.triple.object.as_str());
            } else if !t.object_is_resource {
                if let Some(rank) = label_rank(&t.triple.predicate) {
                    let candidate = (rank, t.triple.object.as_str());
                    declared_labels
                        .entry(subject)
                        .and_modify(|best| {
                            if rank < best.0 {
                                *best = candidate;
                            }
                        })
                        .or_insert(candidate);
                }
            }
        }

        Self {
            result,
            expansion,
            options,
            registry: NamespaceRegistry::global(),
            classifier: TripleClassifier::default(),
            declared_types,
            declared_labels,
            buckets: BTreeMap::new(),
            model: GraphModel::new(),
        }
    }

    fn build(mut self) -> GraphModel {
        self.collect_buckets();
        self.emit_class_groups();
        self.emit_schema_edges();
        self.emit_focal();
        self.materialize_instances();
        self.emit_triple_edges();
        tracing::debug!(
            focal = %self.result.focal,
            nodes = self.model.node_count(),
            edges = self.model.edge_count(),
            "work graph built"
        );
        self.model
    }

    fn umbrella_suppressed(&self) -> bool {
        self.expansion.split_artifacts_active()
    }

    /// Every known type of `node`: side-channel types first, then `rdf:type` objects.
    fn node_types(&self, node: &str) -> Vec<&'a str> {
        let mut types: Vec<&'a str> = self
            .result
            .triples
            .types_of(node)
            .iter()
            .map(String::as_str)
            .collect();
        if let Some(declared) = self.declared_types.get(node) {
            for ty in declared {
                if !types.contains(ty) {
                    types.push(*ty);
                }
            }
        }
        types
    }

    fn type_classes(&self, node: &str) -> Vec<OntologyClass> {
        let mut classes = Vec::new();
        for ty in self.node_types(node) {
            if let Some(class) = OntologyClass::from_type_iri(ty) {
                if !classes.contains(&class) {
                    classes.push(class);
                }
            }
        }
        classes
    }

    fn bucket(&mut self, class: OntologyClass, node: &'a str) {
        if node == self.result.focal {
            return;
        }
        let members = self.buckets.entry(class).or_default();
        if !members.contains(&node) {
            members.push(node);
        }
    }

    /// Assign subject and object instances of every visible triple to class groups.
    fn collect_buckets(&mut self) {
        let result = self.result;
        for t in result.triples.triples() {
            if !self.options.layers.shows(t.layer) {
                continue;
            }
            let subject = t.triple.subject.as_str();
            for class in self.type_classes(subject) {
                self.bucket(class, subject);
            }

            if !t.object_is_resource || t.triple.predicate == iri::RDF_TYPE {
                continue;
            }
            let object = t.triple.object.as_str();
            let typed = self.type_classes(object);
            match OntologyClass::from_predicate(&t.triple.predicate) {
                // The connecting predicate alone decides the artifact sub-group.
                Some(split) if split.is_artifact_split() => {
                    self.bucket(split, object);
                    self.bucket(OntologyClass::Artifact, object);
                }
                Some(class) if typed.is_empty() => self.bucket(class, object),
                _ => {}
            }
            for class in typed {
                self.bucket(class, object);
            }
        }
    }

    fn members(&self, class: OntologyClass) -> &[&'a str] {
        self.buckets.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    fn emit_class_groups(&mut self) {
        let suppress_umbrella = self.umbrella_suppressed();
        for class in OntologyClass::ALL {
            if class == OntologyClass::Artifact && suppress_umbrella {
                continue;
            }
            let count = self.members(class).len();
            let name = if class.is_artifact_split() {
                class.display_name().to_string()
            } else {
                self.registry.shorten(class.key())
            };
            let hover = format!("{name}: {count} instance(s)");
            let label = truncate_label(class.display_name(), self.options.label_max_len);
            self.model
                .add_node(Node::new(class.node_id(), label, hover, NodeCategory::ClassGroup(class)));
        }
    }

    fn emit_schema_edges(&mut self) {
        for relation in SCHEMA.iter().chain(ARTIFACT_UMBRELLA) {
            let source = relation.domain.node_id();
            let target = relation.range.node_id();
            if !self.model.contains_node(&source) || !self.model.contains_node(&target) {
                continue;
            }
            let label = self.registry.shorten(relation.predicate);
            let color = edge_color(self.registry, relation.predicate);
            self.model.add_edge(Edge::new(source, target, label, color));
        }
    }

    fn emit_focal(&mut self) {
        let focal = self.result.focal.as_str();
        let text = self.result.title.as_deref().unwrap_or_else(|| local_name(focal));
        let hover = self.result.title.as_deref().unwrap_or(focal);
        self.model.add_node(Node::new(
            focal,
            truncate_label(text, self.options.label_max_len),
            hover,
            NodeCategory::Work,
        ));
        self.model.add_edge(Edge::new(
            OntologyClass::Work.node_id(),
            focal,
            INSTANCE_EDGE_LABEL,
            INSTANCE_EDGE_COLOR,
        ));
    }

    fn materialize_instances(&mut self) {
        for class in OntologyClass::ALL {
            let group = class.node_id();
            if !self.expansion.is_class_expanded(class) || !self.model.contains_node(&group) {
                continue;
            }
            let members = self.members(class).to_vec();
            for instance in members {
                let node = self.instance_node(instance, class);
                self.model.add_node(node);
                self.model
                    .add_edge(Edge::new(group.clone(), instance, INSTANCE_EDGE_LABEL, INSTANCE_EDGE_COLOR));
            }
        }
    }

    fn declared_label(&self, node: &str) -> Option<&'a str> {
        self.result
            .triples
            .label_of(node)
            .or_else(|| self.declared_labels.get(node).map(|(_, label)| *label))
    }

    fn instance_node(&self, id: &str, bucket: OntologyClass) -> Node {
        let category = self.instance_category(id, bucket);
        let declared = self.declared_label(id);
        let text = declared.unwrap_or_else(|| local_name(id));
        let text = match category {
            NodeCategory::Keyword => pretty_keyword(text),
            _ => text.to_string(),
        };
        Node::new(
            id,
            truncate_label(&text, self.options.label_max_len),
            declared.unwrap_or(id),
            category,
        )
    }

    fn instance_category(&self, id: &str, bucket: OntologyClass) -> NodeCategory {
        let types = self.node_types(id);
        if types.iter().any(|ty| self.classifier.is_argument_type(ty)) {
            let class = types
                .iter()
                .find_map(|ty| OntologyClass::from_type_iri(ty))
                .or_else(|| bucket.is_argumentative().then_some(bucket));
            return match self.result.triples.first_hop_of(id) {
                Some(Hop::Focal) => NodeCategory::Argument,
                _ => NodeCategory::ArgumentNeighbor(class),
            };
        }
        for ty in &types {
            match self.registry.classify(ty) {
                NamespaceCategory::Person => return NodeCategory::Person,
                NamespaceCategory::Keyword => return NodeCategory::Keyword,
                NamespaceCategory::Event => return NodeCategory::Event,
                NamespaceCategory::Structure => return NodeCategory::Section,
                _ => {}
            }
        }
        match bucket {
            OntologyClass::Work => NodeCategory::Work,
            OntologyClass::Person => NodeCategory::Person,
            OntologyClass::Topic => NodeCategory::Keyword,
            OntologyClass::Event => NodeCategory::Event,
            OntologyClass::DiscourseElement => NodeCategory::Section,
            class if class.is_argumentative() => NodeCategory::ArgumentNeighbor(Some(class)),
            _ => NodeCategory::Other,
        }
    }

    /// Instance-level edges between nodes already in the model.
    fn emit_triple_edges(&mut self) {
        let result = self.result;
        for t in result.triples.triples() {
            if !self.options.layers.shows(t.layer)
                || !t.object_is_resource
                || t.triple.predicate == iri::RDF_TYPE
            {
                continue;
            }
            let (subject, object) = (&t.triple.subject, &t.triple.object);
            if !self.model.contains_node(subject) || !self.model.contains_node(object) {
                continue;
            }
            let label = self.registry.shorten(&t.triple.predicate);
            let color = edge_color(self.registry, &t.triple.predicate);
            self.model
                .add_edge(Edge::new(subject.as_str(), object.as_str(), label, color));
        }
    }
}
