//! Bounded-hop traversal around a focal work.
//!
//! The engine is a two-state machine. Hop 1 fetches the work's neighborhood
//! in both directions. If no object in it carries an argumentation type the
//! traversal stops in [`TraversalState::Skeleton`] and keeps only the work's
//! title triple. Otherwise it moves to [`TraversalState::Expanded`] and fetches
//! the neighborhood of the argument roots (hop 2), then of the approaches
//! reached from them (hop 3).
//!
//! Argument roots and approaches are discovered from the classified results
//! of the previous hop, never derived from the focal IRI. A failed hop counts
//! as an empty result for that hop only.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{ClassifiedTriple, Hop, TripleClassifier, TripleSet};
use crate::namespace::label_rank;
use crate::ontology::OntologyClass;
use crate::query::{QueryService, sparql};

/// Terminal state of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalState {
    /// No argument sub-structure detected; single-node rendering.
    Skeleton,
    /// Argument sub-structure present; full layered rendering.
    Expanded,
}

impl fmt::Display for TraversalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalState::Skeleton => write!(f, "skeleton"),
            TraversalState::Expanded => write!(f, "expanded"),
        }
    }
}

/// Configuration for a traversal.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Maximum number of hops issued (1..=3).
    pub max_hops: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self { max_hops: 3 }
    }
}

/// What happened in one issued hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopReport {
    pub hop: Hop,
    /// Nodes whose neighborhood was requested.
    pub centers: Vec<String>,
    /// Records returned (0 on failure).
    pub rows: usize,
    /// Triples that were new to the merged set.
    pub new_triples: usize,
    /// Query failure, if the hop degraded to an empty result.
    pub error: Option<String>,
}

/// Result of a traversal: the merged triple set plus how it was obtained.
#[derive(Debug, Clone)]
pub struct TraversalResult {
    pub focal: String,
    pub state: TraversalState,
    pub triples: TripleSet,
    /// Resolved title or label of the focal work.
    pub title: Option<String>,
    /// Argument roots discovered in hop 1.
    pub argument_roots: Vec<String>,
    pub hops: Vec<HopReport>,
}

impl TraversalResult {
    /// Number of hops actually issued against the store.
    pub fn hops_issued(&self) -> usize {
        self.hops.len()
    }

    /// Whether any issued hop degraded because of a query failure.
    pub fn is_partial(&self) -> bool {
        self.hops.iter().any(|h| h.error.is_some())
    }
}

/// Orchestrates hop queries, classification and merging.
pub struct TraversalEngine<'a, Q: QueryService + ?Sized> {
    service: &'a Q,
    classifier: TripleClassifier<'a>,
    config: TraversalConfig,
}

impl<'a, Q: QueryService + ?Sized> TraversalEngine<'a, Q> {
    pub fn new(service: &'a Q, classifier: TripleClassifier<'a>, config: TraversalConfig) -> Self {
        Self {
            service,
            classifier,
            config,
        }
    }

    /// Traverse around `focal` and return the merged, classified neighborhood.
    pub fn traverse(&self, focal: &str) -> TraversalResult {
        let mut queried: HashSet<String> = HashSet::new();
        let mut hops = Vec::new();

        let first = self.run_hop(Hop::Focal, vec![focal.to_string()], &mut queried, &mut hops);

        // Any object typed in the argument family marks a root, duplicates included.
        let mut argument_roots: Vec<String> = Vec::new();
        for t in &first {
            let is_root = t.object_is_resource
                && t.triple.object != focal
                && t.object_type
                    .as_deref()
                    .is_some_and(|ty| self.classifier.is_argument_type(ty));
            if is_root && !argument_roots.contains(&t.triple.object) {
                argument_roots.push(t.triple.object.clone());
            }
        }

        let title = resolve_title(focal, &first);

        if argument_roots.is_empty() {
            tracing::info!(focal, "no argument structure found, finalizing as skeleton");
            let mut triples = TripleSet::new();
            if let Some(t) = title_triple(focal, &first) {
                triples.insert(t.clone());
            }
            return TraversalResult {
                focal: focal.to_string(),
                state: TraversalState::Skeleton,
                triples,
                title,
                argument_roots,
                hops,
            };
        }

        tracing::info!(focal, roots = argument_roots.len(), "argument structure found, expanding");
        let mut triples = TripleSet::new();
        triples.merge(first);
        if let Some(report) = hops.last_mut() {
            report.new_triples = triples.len();
        }

        if self.config.max_hops >= 2 {
            let second = self.run_hop(Hop::ArgumentCore, argument_roots.clone(), &mut queried, &mut hops);
            let added = triples.merge(second);
            if let Some(report) = hops.last_mut().filter(|r| r.hop == Hop::ArgumentCore) {
                report.new_triples = added;
            }

            if self.config.max_hops >= 3 {
                let approaches = discover_approaches(&triples, &argument_roots);
                let third = self.run_hop(Hop::Approach, approaches, &mut queried, &mut hops);
                let added = triples.merge(third);
                if let Some(report) = hops.last_mut().filter(|r| r.hop == Hop::Approach) {
                    report.new_triples = added;
                }
            }
        }

        tracing::debug!(focal, triples = triples.len(), hops = hops.len(), "traversal complete");
        TraversalResult {
            focal: focal.to_string(),
            state: TraversalState::Expanded,
            triples,
            title,
            argument_roots,
            hops,
        }
    }

    /// Issue one hop for the centers not queried yet. Returns its classified
    /// triples; failures are logged and yield nothing.
    fn run_hop(
        &self,
        hop: Hop,
        centers: Vec<String>,
        queried: &mut HashSet<String>,
        reports: &mut Vec<HopReport>,
    ) -> Vec<ClassifiedTriple> {
        let centers: Vec<String> = centers
            .into_iter()
            .filter(|c| !queried.contains(c))
            .collect();
        if centers.is_empty() {
            tracing::debug!(%hop, "hop already satisfied, not issued");
            return Vec::new();
        }
        queried.extend(centers.iter().cloned());

        let outcome = sparql::neighborhood(&centers).and_then(|q| self.service.execute(&q));
        let (records, error) = match outcome {
            Ok(records) => (records, None),
            Err(e) => {
                tracing::warn!(error = %e, %hop, centers = centers.len(), "hop failed, continuing with empty result");
                (Vec::new(), Some(e.to_string()))
            }
        };

        tracing::debug!(%hop, rows = records.len(), "hop answered");
        let triples: Vec<ClassifiedTriple> = records
            .iter()
            .filter_map(|r| self.classifier.classify_record(r, hop))
            .collect();

        reports.push(HopReport {
            hop,
            centers,
            rows: records.len(),
            new_triples: 0,
            error,
        });
        triples
    }
}

/// Approach nodes reachable from the argument roots: objects typed as an
/// approach, or reached from a root through the `realizes` relation.
fn discover_approaches(merged: &TripleSet, roots: &[String]) -> Vec<String> {
    let mut found = Vec::new();
    for t in merged.triples() {
        if !t.object_is_resource {
            continue;
        }
        let object = &t.triple.object;
        let typed_approach = merged
            .types_of(object)
            .iter()
            .any(|ty| OntologyClass::from_type_iri(ty) == Some(OntologyClass::Approach));
        let realized = roots.contains(&t.triple.subject)
            && OntologyClass::from_predicate(&t.triple.predicate) == Some(OntologyClass::Approach);
        if (typed_approach || realized) && !found.contains(object) {
            found.push(object.clone());
        }
    }
    found
}

/// The focal work's highest-priority literal label triple.
fn title_triple<'t>(focal: &str, triples: &'t [ClassifiedTriple]) -> Option<&'t ClassifiedTriple> {
    triples
        .iter()
        .filter(|t| t.triple.subject == focal && !t.object_is_resource)
        .filter_map(|t| label_rank(&t.triple.predicate).map(|rank| (rank, t)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, t)| t)
}

/// Title of the focal work: its own label triple, else the label side channel
/// of a row where the work is the object.
fn resolve_title(focal: &str, triples: &[ClassifiedTriple]) -> Option<String> {
    if let Some(t) = title_triple(focal, triples) {
        return Some(t.triple.object.clone());
    }
    triples
        .iter()
        .find(|t| t.triple.object == focal && t.label.is_some())
        .and_then(|t| t.label.clone())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::error::{QueryError, QueryResult};
    use crate::query::{BindingRecord, BindingValue};

    const W1: &str = "http://ex.org/W1";
    const A1: &str = "http://ex.org/A1";
    const AP1: &str = "http://ex.org/AP1";
    const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
    const HAS_ARGUMENT: &str = "http://purl.org/spar/amo/hasArgument";
    const REALIZES: &str = "http://www.semanticweb.org/idea/realizes";
    const AMO_ARGUMENT: &str = "http://purl.org/spar/amo/Argument";

    /// Replays canned responses in order and records every query issued.
    struct Scripted {
        responses: RefCell<VecDeque<QueryResult<Vec<BindingRecord>>>>,
        issued: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<QueryResult<Vec<BindingRecord>>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                issued: RefCell::new(Vec::new()),
            }
        }
    }

    impl QueryService for Scripted {
        fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
            self.issued.borrow_mut().push(query.to_string());
            self.responses.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    fn row(s: &str, p: &str, o: BindingValue, o_type: Option<&str>) -> BindingRecord {
        let mut r = BindingRecord::new()
            .with("s", BindingValue::resource(s))
            .with("p", BindingValue::resource(p))
            .with("o", o);
        if let Some(t) = o_type {
            r.insert("oType", BindingValue::resource(t));
        }
        r
    }

    fn engine(service: &Scripted) -> TraversalEngine<'_, Scripted> {
        TraversalEngine::new(service, TripleClassifier::default(), TraversalConfig::default())
    }

    #[test]
    fn untyped_neighborhood_stays_skeleton_after_one_hop() {
        let service = Scripted::new(vec![Ok(vec![
            row(W1, DC_TITLE, BindingValue::literal("Paper A"), None),
            row(W1, "http://ex.org/p", BindingValue::resource("http://ex.org/x"), None),
        ])]);
        let result = engine(&service).traverse(W1);

        assert_eq!(result.state, TraversalState::Skeleton);
        assert_eq!(result.hops_issued(), 1);
        assert_eq!(service.issued.borrow().len(), 1);
        assert_eq!(result.title.as_deref(), Some("Paper A"));
        assert_eq!(result.triples.len(), 1);
        assert_eq!(result.triples.triples()[0].triple.object, "Paper A");
    }

    #[test]
    fn argument_typed_object_expands() {
        let service = Scripted::new(vec![
            Ok(vec![row(W1, HAS_ARGUMENT, BindingValue::resource(A1), Some(AMO_ARGUMENT))]),
            Ok(vec![row(A1, REALIZES, BindingValue::resource(AP1), None)]),
            Ok(vec![row(
                AP1,
                "http://www.semanticweb.org/idea/uses",
                BindingValue::resource("http://ex.org/Tool"),
                None,
            )]),
        ]);
        let result = engine(&service).traverse(W1);

        assert_eq!(result.state, TraversalState::Expanded);
        assert_eq!(result.argument_roots, vec![A1.to_string()]);
        assert_eq!(result.hops_issued(), 3);
        assert_eq!(result.hops[1].centers, vec![A1.to_string()]);
        assert_eq!(result.hops[2].centers, vec![AP1.to_string()]);
        assert_eq!(result.triples.len(), 3);
        assert!(service.issued.borrow()[1].contains("<http://ex.org/A1>"));
    }

    #[test]
    fn failed_hop_degrades_without_losing_earlier_hops() {
        let service = Scripted::new(vec![
            Ok(vec![row(W1, HAS_ARGUMENT, BindingValue::resource(A1), Some(AMO_ARGUMENT))]),
            Err(QueryError::Transport {
                endpoint: "http://localhost:3030".into(),
                message: "connection reset".into(),
            }),
        ]);
        let result = engine(&service).traverse(W1);

        assert_eq!(result.state, TraversalState::Expanded);
        assert!(result.is_partial());
        assert!(result.hops[1].error.is_some());
        assert_eq!(result.triples.len(), 1);
    }

    #[test]
    fn failed_first_hop_is_empty_skeleton() {
        let service = Scripted::new(vec![Err(QueryError::Malformed {
            message: "not json".into(),
        })]);
        let result = engine(&service).traverse(W1);
        assert_eq!(result.state, TraversalState::Skeleton);
        assert!(result.triples.is_empty());
        assert_eq!(result.title, None);
    }

    #[test]
    fn max_hops_bounds_expansion() {
        let service = Scripted::new(vec![
            Ok(vec![row(W1, HAS_ARGUMENT, BindingValue::resource(A1), Some(AMO_ARGUMENT))]),
            Ok(vec![row(A1, REALIZES, BindingValue::resource(AP1), None)]),
        ]);
        let engine = TraversalEngine::new(
            &service,
            TripleClassifier::default(),
            TraversalConfig { max_hops: 2 },
        );
        let result = engine.traverse(W1);
        assert_eq!(result.hops_issued(), 2);
        assert_eq!(service.issued.borrow().len(), 2);
    }

    #[test]
    fn already_queried_centers_are_not_reissued() {
        // The argument root also types itself as an approach: hop 3 has nothing new.
        let service = Scripted::new(vec![
            Ok(vec![row(
                W1,
                HAS_ARGUMENT,
                BindingValue::resource(A1),
                Some("http://www.semanticweb.org/idea/Approach"),
            )]),
            Ok(Vec::new()),
        ]);
        let result = engine(&service).traverse(W1);
        assert_eq!(result.state, TraversalState::Expanded);
        assert_eq!(result.hops_issued(), 2);
        assert_eq!(service.issued.borrow().len(), 2);
    }

    #[test]
    fn title_falls_back_to_incoming_label() {
        let mut incoming = row("http://ex.org/W0", "http://purl.org/spar/cito/cites", BindingValue::resource(W1), None);
        incoming.insert("label", BindingValue::literal("Paper A"));
        let service = Scripted::new(vec![Ok(vec![incoming])]);
        let result = engine(&service).traverse(W1);
        assert_eq!(result.title.as_deref(), Some("Paper A"));
        assert!(result.triples.is_empty());
    }
}
