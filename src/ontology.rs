//! Fixed ontology skeleton: class groups and the schema relations between them.
//!
//! The skeleton is schema, not instance data. It is rendered in full for every
//! expanded work graph and is also the source of the predicate-based bucketing
//! fallbacks: an object reached through a schema predicate belongs to that
//! predicate's range class.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::namespace::{has_local_suffix, local_name};

/// Expansion key of the "used artifacts" sub-group.
pub const USED_ARTIFACT_KEY: &str = "used";
/// Expansion key of the "introduced artifacts" sub-group.
pub const INTRODUCED_ARTIFACT_KEY: &str = "introduced";
/// Node id prefix marking class-group nodes.
pub const CLASS_NODE_PREFIX: &str = "class:";

const PO_CONTAINS: &str = "http://purl.org/spar/po/contains";
const DC_CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";
const DC_PUBLISHER: &str = "http://purl.org/dc/elements/1.1/publisher";
const FABIO_HAS_DISCIPLINE: &str = "http://purl.org/spar/fabio/hasDiscipline";
const AMO_HAS_ARGUMENT: &str = "http://purl.org/spar/amo/hasArgument";
const AMO_HAS_CLAIM: &str = "http://purl.org/spar/amo/hasClaim";
const AMO_HAS_BACKING: &str = "http://purl.org/spar/amo/hasBacking";
const AMO_HAS_EVIDENCE: &str = "http://purl.org/spar/amo/hasEvidence";
const AMO_HAS_WARRANT: &str = "http://purl.org/spar/amo/hasWarrant";
const IDEA_PROPOSES_IDEA: &str = "http://www.semanticweb.org/idea/proposesIdea";
const IDEA_CONCERNS_ISSUE: &str = "http://www.semanticweb.org/idea/concernsIssue";
const IDEA_REALIZES: &str = "http://www.semanticweb.org/idea/realizes";
const IDEA_HAS_ASSUMPTION: &str = "http://www.semanticweb.org/idea/hasAssumption";
/// Approach → artifact it builds on.
pub const IDEA_USES: &str = "http://www.semanticweb.org/idea/uses";
/// Approach → artifact it contributes.
pub const IDEA_INTRODUCES: &str = "http://www.semanticweb.org/idea/introduces";
const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// Discourse sections that appear as `has<Section>` predicates on a work.
const SECTION_NAMES: &[&str] = &[
    "Abstract",
    "Introduction",
    "Background",
    "RelatedWork",
    "Methods",
    "Materials",
    "Evaluation",
    "Results",
    "Discussion",
    "Conclusion",
    "FutureWork",
    "Acknowledgements",
];

/// A class group of the ontology skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OntologyClass {
    Work,
    DiscourseElement,
    Person,
    Event,
    Topic,
    Argument,
    Claim,
    Backing,
    Evidence,
    Warrant,
    Idea,
    Issue,
    Approach,
    Assumption,
    /// Umbrella over both artifact sub-groups.
    Artifact,
    UsedArtifact,
    IntroducedArtifact,
}

impl OntologyClass {
    /// Every class group, in rendering order.
    pub const ALL: [OntologyClass; 17] = [
        OntologyClass::Work,
        OntologyClass::DiscourseElement,
        OntologyClass::Person,
        OntologyClass::Event,
        OntologyClass::Topic,
        OntologyClass::Argument,
        OntologyClass::Claim,
        OntologyClass::Backing,
        OntologyClass::Evidence,
        OntologyClass::Warrant,
        OntologyClass::Idea,
        OntologyClass::Issue,
        OntologyClass::Approach,
        OntologyClass::Assumption,
        OntologyClass::Artifact,
        OntologyClass::UsedArtifact,
        OntologyClass::IntroducedArtifact,
    ];

    /// Expansion-state key: the class IRI, or the synthetic sub-group name.
    pub fn key(self) -> &'static str {
        match self {
            OntologyClass::Work => "http://purl.org/spar/fabio/Work",
            OntologyClass::DiscourseElement => "http://purl.org/spar/deo/DiscourseElement",
            OntologyClass::Person => "http://xmlns.com/foaf/0.1/Person",
            OntologyClass::Event => "http://purl.org/ontology/bibo/Event",
            OntologyClass::Topic => "http://cso.kmi.open.ac.uk/schema/cso#Topic",
            OntologyClass::Argument => "http://purl.org/spar/amo/Argument",
            OntologyClass::Claim => "http://purl.org/spar/amo/Claim",
            OntologyClass::Backing => "http://purl.org/spar/amo/Backing",
            OntologyClass::Evidence => "http://purl.org/spar/amo/Evidence",
            OntologyClass::Warrant => "http://purl.org/spar/amo/Warrant",
            OntologyClass::Idea => "http://www.semanticweb.org/idea/Idea",
            OntologyClass::Issue => "http://www.semanticweb.org/idea/Issue",
            OntologyClass::Approach => "http://www.semanticweb.org/idea/Approach",
            OntologyClass::Assumption => "http://www.semanticweb.org/idea/Assumption",
            OntologyClass::Artifact => "http://www.semanticweb.org/idea/Artifact",
            OntologyClass::UsedArtifact => USED_ARTIFACT_KEY,
            OntologyClass::IntroducedArtifact => INTRODUCED_ARTIFACT_KEY,
        }
    }

    /// Resolve an expansion-state key back to its class.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Resolve a user-supplied class name: expansion key, `prefix:Local`
    /// form, or display/local name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix(CLASS_NODE_PREFIX).unwrap_or(name);
        if let Some(class) = Self::from_key(name) {
            return Some(class);
        }
        let local = name.rsplit_once(':').map_or(name, |(_, local)| local);
        Self::ALL.into_iter().find(|c| {
            c.display_name().eq_ignore_ascii_case(name)
                || c.display_name().replace(' ', "").eq_ignore_ascii_case(local)
                || local_name(c.key()).eq_ignore_ascii_case(local)
        })
    }

    /// Id of the class-group node: `"class:" + key`.
    pub fn node_id(self) -> String {
        format!("{CLASS_NODE_PREFIX}{}", self.key())
    }

    /// Human-readable group name.
    pub fn display_name(self) -> &'static str {
        match self {
            OntologyClass::UsedArtifact => "Used Artifact",
            OntologyClass::IntroducedArtifact => "Introduced Artifact",
            OntologyClass::DiscourseElement => "Discourse Element",
            other => local_name(other.key()),
        }
    }

    /// Whether this is one of the two split artifact sub-groups.
    pub fn is_artifact_split(self) -> bool {
        matches!(self, OntologyClass::UsedArtifact | OntologyClass::IntroducedArtifact)
    }

    /// Whether instances of this class belong to the argumentation layer.
    pub fn is_argumentative(self) -> bool {
        !matches!(
            self,
            OntologyClass::Work
                | OntologyClass::DiscourseElement
                | OntologyClass::Person
                | OntologyClass::Event
                | OntologyClass::Topic
        )
    }

    /// Class whose identifier is a suffix of `type_iri`.
    ///
    /// Sub-groups are never matched by type: membership in them is decided by
    /// the connecting predicate.
    pub fn from_type_iri(type_iri: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|c| !c.is_artifact_split())
            .find(|c| has_local_suffix(type_iri, local_name(c.key())))
    }

    /// Class implied for the object of `predicate` when the object has no usable type.
    pub fn from_predicate(predicate: &str) -> Option<Self> {
        if let Some(relation) = SCHEMA.iter().find(|r| r.predicate == predicate) {
            return Some(relation.range);
        }
        is_section_predicate(predicate).then_some(OntologyClass::DiscourseElement)
    }
}

impl fmt::Display for OntologyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether `predicate` links a work to a named discourse section (`hasIntroduction`, ...).
pub fn is_section_predicate(predicate: &str) -> bool {
    let name = local_name(predicate);
    name.strip_prefix("has")
        .is_some_and(|section| SECTION_NAMES.contains(&section))
}

/// One schema relation between two class groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaRelation {
    pub domain: OntologyClass,
    pub predicate: &'static str,
    pub range: OntologyClass,
}

const fn rel(domain: OntologyClass, predicate: &'static str, range: OntologyClass) -> SchemaRelation {
    SchemaRelation {
        domain,
        predicate,
        range,
    }
}

/// Hardcoded schema relations rendered between class groups.
pub const SCHEMA: &[SchemaRelation] = &[
    rel(OntologyClass::Work, PO_CONTAINS, OntologyClass::DiscourseElement),
    rel(OntologyClass::Work, DC_CREATOR, OntologyClass::Person),
    rel(OntologyClass::Work, DC_PUBLISHER, OntologyClass::Event),
    rel(OntologyClass::Work, FABIO_HAS_DISCIPLINE, OntologyClass::Topic),
    rel(OntologyClass::Work, AMO_HAS_ARGUMENT, OntologyClass::Argument),
    rel(OntologyClass::Argument, AMO_HAS_CLAIM, OntologyClass::Claim),
    rel(OntologyClass::Argument, AMO_HAS_BACKING, OntologyClass::Backing),
    rel(OntologyClass::Argument, AMO_HAS_EVIDENCE, OntologyClass::Evidence),
    rel(OntologyClass::Argument, AMO_HAS_WARRANT, OntologyClass::Warrant),
    rel(OntologyClass::Argument, IDEA_PROPOSES_IDEA, OntologyClass::Idea),
    rel(OntologyClass::Argument, IDEA_CONCERNS_ISSUE, OntologyClass::Issue),
    rel(OntologyClass::Argument, IDEA_REALIZES, OntologyClass::Approach),
    rel(OntologyClass::Approach, IDEA_HAS_ASSUMPTION, OntologyClass::Assumption),
    rel(OntologyClass::Approach, IDEA_USES, OntologyClass::UsedArtifact),
    rel(OntologyClass::Approach, IDEA_INTRODUCES, OntologyClass::IntroducedArtifact),
];

/// Relations tying the artifact sub-groups to the umbrella group.
pub const ARTIFACT_UMBRELLA: &[SchemaRelation] = &[
    rel(OntologyClass::UsedArtifact, RDFS_SUB_CLASS_OF, OntologyClass::Artifact),
    rel(OntologyClass::IntroducedArtifact, RDFS_SUB_CLASS_OF, OntologyClass::Artifact),
];
