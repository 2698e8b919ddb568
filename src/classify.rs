//! Triple classification and the deduplicated triple set.
//!
//! Every binding record returned by a hop becomes a [`ClassifiedTriple`]
//! tagged with a semantic [`Layer`]. Layer precedence is fixed:
//! argument > structure > metadata > other. An entity typed in more than one
//! namespace family always lands in the highest-precedence layer.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::namespace::NamespaceRegistry;
use crate::query::BindingRecord;

/// Argumentation namespaces.
pub const ARGUMENT_FAMILY: &[&str] = &["amo", "idea", "semsur"];
/// Document-structure and bibliographic namespaces.
pub const STRUCTURE_FAMILY: &[&str] = &["doco", "deo", "po", "c4o", "fabio", "cso", "bibo", "dc", "foaf"];
pub const PERSON_FAMILY: &[&str] = &["foaf"];
pub const KEYWORD_FAMILY: &[&str] = &["cso", "skos"];
pub const EVENT_FAMILY: &[&str] = &["bibo"];

/// Metadata sub-bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKind {
    Person,
    Keyword,
    Event,
}

/// Semantic layer of a triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Structure,
    Argument,
    Metadata(MetadataKind),
    Other,
}

impl Layer {
    /// Parse a server-side layer hint (`"argument"`, `"structure"`, ...).
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "argument" | "argument_neighbor" => Some(Layer::Argument),
            "structure" => Some(Layer::Structure),
            "person" => Some(Layer::Metadata(MetadataKind::Person)),
            "keyword" => Some(Layer::Metadata(MetadataKind::Keyword)),
            "event" => Some(Layer::Metadata(MetadataKind::Event)),
            "other" => Some(Layer::Other),
            _ => None,
        }
    }

    /// Precedence rank, lower wins: argument, structure, metadata, other.
    pub fn rank(self) -> u8 {
        match self {
            Layer::Argument => 0,
            Layer::Structure => 1,
            Layer::Metadata(_) => 2,
            Layer::Other => 3,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Structure => write!(f, "structure"),
            Layer::Argument => write!(f, "argument"),
            Layer::Metadata(MetadataKind::Person) => write!(f, "metadata/person"),
            Layer::Metadata(MetadataKind::Keyword) => write!(f, "metadata/keyword"),
            Layer::Metadata(MetadataKind::Event) => write!(f, "metadata/event"),
            Layer::Other => write!(f, "other"),
        }
    }
}

/// Assigns layers by longest-prefix match of entity types against the registry.
#[derive(Debug, Clone, Copy)]
pub struct TripleClassifier<'r> {
    registry: &'r NamespaceRegistry,
}

impl Default for TripleClassifier<'static> {
    fn default() -> Self {
        Self::new(NamespaceRegistry::global())
    }
}

impl<'r> TripleClassifier<'r> {
    pub fn new(registry: &'r NamespaceRegistry) -> Self {
        Self { registry }
    }

    /// Layer of a triple. The object type is consulted first and the subject
    /// type only when the object is untyped; the predicate does not take part.
    pub fn classify_layer(
        &self,
        _predicate: &str,
        subject_type: Option<&str>,
        object_type: Option<&str>,
    ) -> Layer {
        let Some(ty) = object_type.or(subject_type) else {
            return Layer::Other;
        };
        if self.is_argument_type(ty) {
            Layer::Argument
        } else if self.registry.longest_prefix_match(ty, STRUCTURE_FAMILY) {
            Layer::Structure
        } else if self.registry.longest_prefix_match(ty, PERSON_FAMILY) {
            Layer::Metadata(MetadataKind::Person)
        } else if self.registry.longest_prefix_match(ty, KEYWORD_FAMILY) {
            Layer::Metadata(MetadataKind::Keyword)
        } else if self.registry.longest_prefix_match(ty, EVENT_FAMILY) {
            Layer::Metadata(MetadataKind::Event)
        } else {
            Layer::Other
        }
    }

    /// Whether `type_iri` belongs to the argumentation namespace family.
    pub fn is_argument_type(&self, type_iri: &str) -> bool {
        self.registry.longest_prefix_match(type_iri, ARGUMENT_FAMILY)
    }

    /// Turn a `?s ?p ?o ?sType ?oType ?label ?layer` record into a classified
    /// triple. Records without `s`, `p` and `o` are skipped.
    pub fn classify_record(&self, record: &BindingRecord, hop: Hop) -> Option<ClassifiedTriple> {
        let subject = record.value("s")?;
        let predicate = record.value("p")?;
        let object = record.get("o")?;
        let subject_type = record.value("sType").map(str::to_string);
        let object_type = record.value("oType").map(str::to_string);

        let layer = record
            .value("layer")
            .and_then(Layer::from_hint)
            .unwrap_or_else(|| {
                self.classify_layer(predicate, subject_type.as_deref(), object_type.as_deref())
            });

        Some(ClassifiedTriple {
            triple: Triple {
                subject: subject.to_string(),
                predicate: predicate.to_string(),
                object: object.value.clone(),
            },
            object_is_resource: object.is_resource,
            subject_type,
            object_type,
            label: record.value("label").map(str::to_string),
            layer,
            hop,
        })
    }
}

/// Traversal step a triple was retrieved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hop {
    /// Neighborhood of the focal work.
    Focal,
    /// Neighborhood of the argument roots found in the focal hop.
    ArgumentCore,
    /// Neighborhood of the approaches reached from the argument roots.
    Approach,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hop::Focal => write!(f, "focal"),
            Hop::ArgumentCore => write!(f, "argument-core"),
            Hop::Approach => write!(f, "approach"),
        }
    }
}

/// A (subject, predicate, object) statement. Equality is string identity of
/// all three components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A triple plus the side-channel attributes of the record it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTriple {
    pub triple: Triple,
    pub object_is_resource: bool,
    pub subject_type: Option<String>,
    pub object_type: Option<String>,
    /// Best label of the object.
    pub label: Option<String>,
    pub layer: Layer,
    pub hop: Hop,
}

/// Union of classified triples, deduplicated by `(subject, predicate, object)`.
///
/// The first occurrence of a triple keeps its attributes, except the layer:
/// a later row for the same triple carrying a higher-precedence layer (one row
/// per `rdf:type` of the object) raises it. Every type seen for a node is
/// recorded in arrival order, so a node typed twice is not reduced to
/// whichever row arrived first.
#[derive(Debug, Clone, Default)]
pub struct TripleSet {
    triples: Vec<ClassifiedTriple>,
    index: HashMap<Triple, usize>,
    node_types: HashMap<String, Vec<String>>,
    labels: HashMap<String, String>,
    first_hop: HashMap<String, Hop>,
}

impl TripleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one triple; returns `false` if it was already present.
    pub fn insert(&mut self, triple: ClassifiedTriple) -> bool {
        let t = &triple.triple;
        if let Some(ty) = &triple.subject_type {
            self.record_type(&t.subject, ty);
        }
        if triple.object_is_resource {
            if let Some(ty) = &triple.object_type {
                self.record_type(&t.object, ty);
            }
            if let Some(label) = &triple.label {
                self.labels
                    .entry(t.object.clone())
                    .or_insert_with(|| label.clone());
            }
            self.first_hop.entry(t.object.clone()).or_insert(triple.hop);
        }
        self.first_hop.entry(t.subject.clone()).or_insert(triple.hop);

        if let Some(&pos) = self.index.get(t) {
            let kept = &mut self.triples[pos];
            if triple.layer.rank() < kept.layer.rank() {
                kept.layer = triple.layer;
            }
            return false;
        }
        self.index.insert(t.clone(), self.triples.len());
        self.triples.push(triple);
        true
    }

    /// Merge many triples; returns how many were new.
    pub fn merge(&mut self, triples: impl IntoIterator<Item = ClassifiedTriple>) -> usize {
        triples.into_iter().filter(|t| self.insert(t.clone())).count()
    }

    fn record_type(&mut self, node: &str, ty: &str) {
        let types = self.node_types.entry(node.to_string()).or_default();
        if !types.iter().any(|t| t == ty) {
            types.push(ty.to_string());
        }
    }

    pub fn triples(&self) -> &[ClassifiedTriple] {
        &self.triples
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.index.contains_key(triple)
    }

    /// All types recorded for `node`, in arrival order.
    pub fn types_of(&self, node: &str) -> &[String] {
        self.node_types.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First label recorded for `node`.
    pub fn label_of(&self, node: &str) -> Option<&str> {
        self.labels.get(node).map(String::as_str)
    }

    /// Earliest hop `node` was seen in.
    pub fn first_hop_of(&self, node: &str) -> Option<Hop> {
        self.first_hop.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
