//! Namespace registry: static namespace IRI ↔ prefix table with category buckets.
//!
//! The registry is pure lookup. Namespace IRIs always end in `/` or `#`, so an
//! IRI's namespace candidates are found by splitting at its last separator
//! and probing a hash index; a linear longest-prefix scan covers the rest.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Category bucket of a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceCategory {
    /// Document structure (sections, discourse elements, patterns).
    Structure,
    /// Publication classes (FaBiO works and expressions).
    Publication,
    /// Bibliographic metadata terms (titles, creators, identifiers).
    Bibliographic,
    /// Argumentation layer (AMO, IDEA, SemSur).
    Argument,
    Person,
    Keyword,
    Event,
    Citation,
    /// Core RDF/RDFS/XSD vocabulary.
    Vocabulary,
    /// Experiment descriptions.
    Experiment,
    /// Not covered by any registered namespace.
    Unknown,
}

impl fmt::Display for NamespaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamespaceCategory::Structure => "structure",
            NamespaceCategory::Publication => "publication",
            NamespaceCategory::Bibliographic => "bibliographic",
            NamespaceCategory::Argument => "argument",
            NamespaceCategory::Person => "person",
            NamespaceCategory::Keyword => "keyword",
            NamespaceCategory::Event => "event",
            NamespaceCategory::Citation => "citation",
            NamespaceCategory::Vocabulary => "vocabulary",
            NamespaceCategory::Experiment => "experiment",
            NamespaceCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A registered namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub iri: &'static str,
    pub category: NamespaceCategory,
}

const fn ns(prefix: &'static str, iri: &'static str, category: NamespaceCategory) -> Namespace {
    Namespace {
        prefix,
        iri,
        category,
    }
}

/// All namespaces known to the explorer, in `PREFIX` block order.
pub const NAMESPACES: &[Namespace] = &[
    ns("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#", NamespaceCategory::Vocabulary),
    ns("xsd", "http://www.w3.org/2001/XMLSchema#", NamespaceCategory::Vocabulary),
    ns("rdfs", "http://www.w3.org/2000/01/rdf-schema#", NamespaceCategory::Vocabulary),
    ns("idea", "http://www.semanticweb.org/idea/", NamespaceCategory::Argument),
    ns("dc", "http://purl.org/dc/elements/1.1/", NamespaceCategory::Bibliographic),
    ns("dct", "http://purl.org/dc/terms/", NamespaceCategory::Bibliographic),
    ns("cso", "http://cso.kmi.open.ac.uk/schema/cso#", NamespaceCategory::Keyword),
    ns("doco", "http://purl.org/spar/doco/", NamespaceCategory::Structure),
    ns("foaf", "http://xmlns.com/foaf/0.1/", NamespaceCategory::Person),
    ns("skos", "http://www.w3.org/2004/02/skos/core#", NamespaceCategory::Keyword),
    ns("fabio", "http://purl.org/spar/fabio/", NamespaceCategory::Publication),
    ns("deo", "http://purl.org/spar/deo/", NamespaceCategory::Structure),
    ns("cito", "http://purl.org/spar/cito/", NamespaceCategory::Citation),
    ns("po", "http://purl.org/spar/po/", NamespaceCategory::Structure),
    ns("amo", "http://purl.org/spar/amo/", NamespaceCategory::Argument),
    ns("c4o", "http://purl.org/spar/c4o/", NamespaceCategory::Structure),
    ns("xml", "http://www.w3.org/XML/1998/namespace", NamespaceCategory::Vocabulary),
    ns("bibo", "http://purl.org/ontology/bibo/", NamespaceCategory::Event),
    ns("expo", "http://www.hozo.jp/owl/EXPOApr19.xml/", NamespaceCategory::Experiment),
    ns("prism", "http://prismstandard.org/namespaces/1.2/basic/", NamespaceCategory::Bibliographic),
    ns("semsur", "http://purl.org/semsur/", NamespaceCategory::Argument),
];

/// Frequently used IRIs.
pub mod iri {
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FABIO_WORK: &str = "http://purl.org/spar/fabio/Work";
    pub const CITO_CITES: &str = "http://purl.org/spar/cito/cites";
    pub const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
    pub const DCT_TITLE: &str = "http://purl.org/dc/terms/title";
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const IDEA_HAS_LABEL: &str = "http://www.semanticweb.org/idea/hasLabel";
}

/// Label-bearing predicates in priority order (first available wins).
pub const LABEL_PREDICATES: &[&str] = &[
    iri::DC_TITLE,
    iri::DCT_TITLE,
    iri::RDFS_LABEL,
    iri::SKOS_PREF_LABEL,
    iri::FOAF_NAME,
    iri::IDEA_HAS_LABEL,
];

/// Priority rank of a label predicate, lower is better.
pub fn label_rank(predicate: &str) -> Option<usize> {
    LABEL_PREDICATES.iter().position(|p| *p == predicate)
}

/// Static namespace registry with an IRI → namespace hash index.
#[derive(Debug)]
pub struct NamespaceRegistry {
    by_iri: HashMap<&'static str, &'static Namespace>,
}

impl NamespaceRegistry {
    /// Build a registry over [`NAMESPACES`].
    pub fn new() -> Self {
        let mut by_iri = HashMap::with_capacity(NAMESPACES.len());
        for namespace in NAMESPACES {
            by_iri.insert(namespace.iri, namespace);
        }
        Self { by_iri }
    }

    /// The process-wide registry.
    pub fn global() -> &'static NamespaceRegistry {
        static REGISTRY: OnceLock<NamespaceRegistry> = OnceLock::new();
        REGISTRY.get_or_init(NamespaceRegistry::new)
    }

    /// The longest registered namespace that `iri` starts with.
    pub fn namespace_of(&self, iri: &str) -> Option<&'static Namespace> {
        if let Some(pos) = iri.rfind(['#', '/']) {
            if let Some(ns) = self.by_iri.get(&iri[..=pos]) {
                return Some(ns);
            }
        }
        NAMESPACES
            .iter()
            .filter(|ns| iri.starts_with(ns.iri))
            .max_by_key(|ns| ns.iri.len())
    }

    /// Category bucket of the namespace `iri` belongs to.
    pub fn classify(&self, iri: &str) -> NamespaceCategory {
        self.namespace_of(iri)
            .map(|ns| ns.category)
            .unwrap_or(NamespaceCategory::Unknown)
    }

    /// `prefix:local` form of `iri`, or `iri` unchanged when no namespace matches.
    pub fn shorten(&self, iri: &str) -> String {
        match self.namespace_of(iri) {
            Some(ns) => format!("{}:{}", ns.prefix, &iri[ns.iri.len()..]),
            None => iri.to_string(),
        }
    }

    /// Whether the longest namespace match of `iri` is one of `candidate_prefixes`.
    pub fn longest_prefix_match(&self, iri: &str, candidate_prefixes: &[&str]) -> bool {
        self.namespace_of(iri)
            .is_some_and(|ns| candidate_prefixes.contains(&ns.prefix))
    }

    /// `PREFIX` declarations for every registered namespace.
    pub fn prefix_block(&self) -> String {
        NAMESPACES
            .iter()
            .map(|ns| format!("PREFIX {}: <{}>", ns.prefix, ns.iri))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Last path or fragment segment of an IRI (the short identifier).
pub fn local_name(iri: &str) -> &str {
    if let Some((_, fragment)) = iri.rsplit_once('#') {
        return fragment;
    }
    let trimmed = iri.trim_end_matches('/');
    if let Some((_, segment)) = trimmed.rsplit_once('/') {
        return segment;
    }
    if let Some((_, rest)) = trimmed.rsplit_once(':') {
        return rest;
    }
    trimmed
}

/// Whether `value` ends with `/local` or `#local` (or is exactly `local`).
pub fn has_local_suffix(value: &str, local: &str) -> bool {
    match value.strip_suffix(local) {
        Some("") => true,
        Some(head) => head.ends_with('/') || head.ends_with('#'),
        None => false,
    }
}

/// Keyword display form: namespace prefix stripped, underscores as spaces.
pub fn pretty_keyword(value: &str) -> String {
    let mut s = value;
    for prefix in [
        "idea:",
        "cso:",
        "http://www.semanticweb.org/idea/",
        "http://cso.kmi.open.ac.uk/schema/cso#",
    ] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
        }
    }
    s.replace('_', " ")
}
