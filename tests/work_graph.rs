//! End-to-end tests for traversal and graph building against a scripted store.
//!
//! The scripted service replays canned hop answers in order and records the
//! query texts it received, so hop counts and hop centers can be checked
//! without a triple store.

use std::cell::RefCell;
use std::collections::VecDeque;

use idea_graph::classify::{Layer, TripleClassifier};
use idea_graph::error::{QueryError, QueryResult};
use idea_graph::model::{BuildOptions, ExpansionState, GraphModel, NodeCategory, build_work_graph};
use idea_graph::ontology::{INTRODUCED_ARTIFACT_KEY, OntologyClass, USED_ARTIFACT_KEY};
use idea_graph::query::{BindingRecord, BindingValue, QueryService};
use idea_graph::session::ExplorerSession;
use idea_graph::traverse::{TraversalConfig, TraversalEngine, TraversalResult, TraversalState};

const W1: &str = "http://ex.org/W1";
const A1: &str = "http://ex.org/A1";
const C1: &str = "http://ex.org/C1";
const AP1: &str = "http://ex.org/AP1";
const TOOL: &str = "http://ex.org/Tool";
const DATASET: &str = "http://ex.org/Dataset";

const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
const HAS_ARGUMENT: &str = "http://purl.org/spar/amo/hasArgument";
const HAS_CLAIM: &str = "http://purl.org/spar/amo/hasClaim";
const REALIZES: &str = "http://www.semanticweb.org/idea/realizes";
const USES: &str = "http://www.semanticweb.org/idea/uses";
const INTRODUCES: &str = "http://www.semanticweb.org/idea/introduces";
const AMO_ARGUMENT: &str = "http://purl.org/spar/amo/Argument";
const AMO_CLAIM: &str = "http://purl.org/spar/amo/Claim";
const IDEA_APPROACH: &str = "http://www.semanticweb.org/idea/Approach";

struct ScriptedStore {
    answers: RefCell<VecDeque<QueryResult<Vec<BindingRecord>>>>,
    queries: RefCell<Vec<String>>,
}

impl ScriptedStore {
    fn new(answers: Vec<QueryResult<Vec<BindingRecord>>>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            queries: RefCell::new(Vec::new()),
        }
    }

    fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl QueryService for ScriptedStore {
    fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
        self.queries.borrow_mut().push(query.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
    }
}

fn resource_row(s: &str, p: &str, o: &str, o_type: Option<&str>, s_type: Option<&str>) -> BindingRecord {
    let mut row = BindingRecord::new()
        .with("s", BindingValue::resource(s))
        .with("p", BindingValue::resource(p))
        .with("o", BindingValue::resource(o));
    if let Some(t) = o_type {
        row.insert("oType", BindingValue::resource(t));
    }
    if let Some(t) = s_type {
        row.insert("sType", BindingValue::resource(t));
    }
    row
}

fn literal_row(s: &str, p: &str, value: &str) -> BindingRecord {
    BindingRecord::new()
        .with("s", BindingValue::resource(s))
        .with("p", BindingValue::resource(p))
        .with("o", BindingValue::literal(value))
}

fn traverse(store: &ScriptedStore) -> TraversalResult {
    TraversalEngine::new(store, TripleClassifier::default(), TraversalConfig::default()).traverse(W1)
}

/// Hop answers for a work with one argument, one claim and one approach.
fn argument_answers() -> Vec<QueryResult<Vec<BindingRecord>>> {
    vec![
        Ok(vec![
            literal_row(W1, DC_TITLE, "Paper A"),
            resource_row(W1, HAS_ARGUMENT, A1, Some(AMO_ARGUMENT), None),
        ]),
        Ok(vec![
            resource_row(A1, HAS_CLAIM, C1, Some(AMO_CLAIM), Some(AMO_ARGUMENT)),
            resource_row(A1, REALIZES, AP1, Some(IDEA_APPROACH), Some(AMO_ARGUMENT)),
            resource_row(W1, HAS_ARGUMENT, A1, Some(AMO_ARGUMENT), None),
        ]),
        Ok(vec![
            resource_row(AP1, USES, TOOL, None, Some(IDEA_APPROACH)),
            resource_row(AP1, INTRODUCES, DATASET, None, Some(IDEA_APPROACH)),
        ]),
    ]
}

fn instance_ids(model: &GraphModel) -> Vec<&str> {
    model
        .nodes()
        .iter()
        .filter(|n| !n.category.is_class_group() && n.id != W1)
        .map(|n| n.id.as_str())
        .collect()
}

#[test]
fn untyped_work_renders_as_single_node_after_one_hop() {
    let store = ScriptedStore::new(vec![Ok(vec![literal_row(W1, DC_TITLE, "Paper A")])]);
    let result = traverse(&store);

    assert_eq!(result.state, TraversalState::Skeleton);
    assert_eq!(result.hops_issued(), 1);
    assert_eq!(store.query_count(), 1);

    let model = build_work_graph(&result, &ExpansionState::new(), &BuildOptions::default());
    assert_eq!(model.node_count(), 1);
    assert_eq!(model.edge_count(), 0);
    let node = model.node(W1).unwrap();
    assert_eq!(node.hover, "Paper A");
    assert_eq!(node.label, "W1");
}

#[test]
fn argument_typed_object_expands_and_respects_collapse() {
    let store = ScriptedStore::new(argument_answers());
    let result = traverse(&store);
    assert_eq!(result.state, TraversalState::Expanded);
    assert_eq!(result.hops_issued(), 3);
    assert_eq!(result.argument_roots, vec![A1.to_string()]);

    let collapsed = build_work_graph(&result, &ExpansionState::new(), &BuildOptions::default());
    assert!(collapsed.class_group(OntologyClass::Argument).is_some());
    assert!(collapsed.contains_node(W1));
    assert!(!collapsed.contains_node(A1));
    assert!(instance_ids(&collapsed).is_empty());

    let mut state = ExpansionState::new();
    state.toggle(OntologyClass::Argument.key());
    let expanded = build_work_graph(&result, &state, &BuildOptions::default());
    assert_eq!(expanded.node(A1).unwrap().category, NodeCategory::Argument);
    assert!(!expanded.contains_node(C1));
}

#[test]
fn deeper_argument_nodes_are_neighbors() {
    let store = ScriptedStore::new(argument_answers());
    let result = traverse(&store);
    let mut state = ExpansionState::new();
    state.toggle(OntologyClass::Argument.key());
    state.toggle(OntologyClass::Claim.key());
    let model = build_work_graph(&result, &state, &BuildOptions::default());

    let claim = model.node(C1).unwrap();
    assert_eq!(claim.category, NodeCategory::ArgumentNeighbor(Some(OntologyClass::Claim)));
    assert_eq!(claim.style.color, "#FFE8A3");
    assert!(model.edges().iter().any(|e| e.source == A1 && e.target == C1 && e.label == "amo:hasClaim"));
}

#[test]
fn used_artifacts_are_exclusive_with_umbrella() {
    let store = ScriptedStore::new(argument_answers());
    let result = traverse(&store);

    let mut state = ExpansionState::new();
    state.set(OntologyClass::Artifact.key(), true);
    state.toggle(USED_ARTIFACT_KEY);
    assert!(!state.is_class_expanded(OntologyClass::Artifact));

    let model = build_work_graph(&result, &state, &BuildOptions::default());
    assert!(model.class_group(OntologyClass::Artifact).is_none());
    assert!(model.class_group(OntologyClass::UsedArtifact).is_some());
    assert!(model.contains_node(TOOL));
    assert!(!model.contains_node(DATASET));

    state.toggle(INTRODUCED_ARTIFACT_KEY);
    let model = build_work_graph(&result, &state, &BuildOptions::default());
    assert!(model.contains_node(DATASET));
    assert!(model.class_group(OntologyClass::Artifact).is_none());
}

#[test]
fn toggle_back_restores_collapsed_render() {
    let store = ScriptedStore::new(argument_answers());
    let result = traverse(&store);
    let options = BuildOptions::default();

    let mut session = ExplorerSession::new();
    session.select_work(W1);
    let before = build_work_graph(&result, session.expansion(), &options);

    let claim_node = OntologyClass::Claim.node_id();
    session.handle_click(&claim_node);
    let during = build_work_graph(&result, session.expansion(), &options);
    assert_eq!(instance_ids(&during), vec![C1]);

    session.handle_click(&claim_node);
    let after = build_work_graph(&result, session.expansion(), &options);
    assert_eq!(before.nodes(), after.nodes());
    assert_eq!(before.edges(), after.edges());
}

#[test]
fn failed_hop_keeps_earlier_results() {
    let store = ScriptedStore::new(vec![
        Ok(vec![resource_row(W1, HAS_ARGUMENT, A1, Some(AMO_ARGUMENT), None)]),
        Err(QueryError::Status {
            endpoint: "http://localhost:3030/idea_kg/sparql".into(),
            status: 500,
            body: "internal error".into(),
        }),
    ]);
    let result = traverse(&store);
    assert_eq!(result.state, TraversalState::Expanded);
    assert!(result.is_partial());
    assert_eq!(result.triples.len(), 1);

    let mut state = ExpansionState::new();
    state.toggle(OntologyClass::Argument.key());
    let model = build_work_graph(&result, &state, &BuildOptions::default());
    assert!(model.contains_node(A1));
}

#[test]
fn session_builds_against_its_expansion_snapshot() {
    let store = ScriptedStore::new(argument_answers());
    let mut session = ExplorerSession::new();
    assert!(
        session
            .build_graph(&store, TraversalConfig::default(), &BuildOptions::default())
            .is_none()
    );

    session.select_work(W1);
    session.handle_click(&OntologyClass::Argument.node_id());
    let (result, model) = session
        .build_graph(&store, TraversalConfig::default(), &BuildOptions::default())
        .unwrap();
    assert_eq!(result.title.as_deref(), Some("Paper A"));
    assert!(model.contains_node(A1));
    assert_eq!(model.node(W1).unwrap().label, "Paper A");
}

#[test]
fn doubly_typed_argument_is_argument_whatever_the_row_order() {
    let deo = "http://purl.org/spar/deo/DiscourseElement";
    let store = ScriptedStore::new(vec![Ok(vec![
        literal_row(W1, DC_TITLE, "Paper A"),
        resource_row(W1, HAS_ARGUMENT, A1, Some(deo), None),
        resource_row(W1, HAS_ARGUMENT, A1, Some(AMO_ARGUMENT), None),
    ])]);
    let result = traverse(&store);
    assert_eq!(result.state, TraversalState::Expanded);
    let link = result
        .triples
        .triples()
        .iter()
        .find(|t| t.triple.predicate == HAS_ARGUMENT)
        .unwrap();
    assert_eq!(link.layer, Layer::Argument);

    let mut options = BuildOptions::default();
    options.layers.hide_named("structure");
    let mut state = ExpansionState::new();
    state.toggle(OntologyClass::Argument.key());
    let model = build_work_graph(&result, &state, &options);
    assert!(model.contains_node(A1));
}
