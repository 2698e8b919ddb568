//! Explorer session: the focal work, the selected node and the expansion state.
//!
//! The session is the context object the surrounding application keeps
//! between interactions. Builds only ever read it.

use serde::{Deserialize, Serialize};

use crate::classify::TripleClassifier;
use crate::model::{BuildOptions, ExpansionState, GraphModel, build_work_graph};
use crate::ontology::{CLASS_NODE_PREFIX, OntologyClass};
use crate::query::QueryService;
use crate::traverse::{TraversalConfig, TraversalEngine, TraversalResult};

/// What a click from the rendering collaborator refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ClickTarget {
    /// A class-group node; holds the expansion key with `"class:"` stripped.
    ClassGroup(String),
    /// An instance node.
    Entity(String),
}

impl ClickTarget {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(CLASS_NODE_PREFIX) {
            Some(key) => ClickTarget::ClassGroup(key.to_string()),
            None => ClickTarget::Entity(raw.to_string()),
        }
    }

    /// IRI to look up in the detail panel. Artifact sub-groups resolve to
    /// the umbrella class.
    pub fn detail_iri(&self) -> &str {
        match self {
            ClickTarget::ClassGroup(key) => match OntologyClass::from_key(key) {
                Some(class) if class.is_artifact_split() => OntologyClass::Artifact.key(),
                _ => key.as_str(),
            },
            ClickTarget::Entity(iri) => iri.as_str(),
        }
    }
}

/// Per-user exploration state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerSession {
    selected_work: Option<String>,
    selected_node: Option<ClickTarget>,
    expansion: ExpansionState,
}

impl ExplorerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `iri` the focal work. Clears the node selection.
    pub fn select_work(&mut self, iri: impl Into<String>) {
        let iri = iri.into();
        tracing::info!(work = %iri, "work selected");
        self.selected_work = Some(iri);
        self.selected_node = None;
    }

    /// Apply a click. Class-group clicks toggle their expansion entry;
    /// instance clicks only change the selection.
    pub fn handle_click(&mut self, raw: &str) -> ClickTarget {
        let target = ClickTarget::parse(raw);
        if let ClickTarget::ClassGroup(key) = &target {
            let expanded = self.expansion.toggle(key);
            tracing::debug!(key = %key, expanded, "class group toggled");
        }
        self.selected_node = Some(target.clone());
        target
    }

    /// IRI for the detail panel: the selected node, else the focal work.
    pub fn detail_target(&self) -> Option<&str> {
        self.selected_node
            .as_ref()
            .map(ClickTarget::detail_iri)
            .or(self.selected_work.as_deref())
    }

    pub fn selected_work(&self) -> Option<&str> {
        self.selected_work.as_deref()
    }

    pub fn selected_node(&self) -> Option<&ClickTarget> {
        self.selected_node.as_ref()
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut ExpansionState {
        &mut self.expansion
    }

    /// Traverse around the focal work and build its graph against the
    /// current expansion snapshot. `None` when no work is selected.
    pub fn build_graph<Q: QueryService + ?Sized>(
        &self,
        service: &Q,
        traversal: TraversalConfig,
        options: &BuildOptions,
    ) -> Option<(TraversalResult, GraphModel)> {
        let work = self.selected_work.as_deref()?;
        let engine = TraversalEngine::new(service, TripleClassifier::default(), traversal);
        let result = engine.traverse(work);
        let model = build_work_graph(&result, &self.expansion, options);
        Some((result, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::USED_ARTIFACT_KEY;

    const CLAIM: &str = "http://purl.org/spar/amo/Claim";

    #[test]
    fn class_prefix_is_stripped() {
        assert_eq!(
            ClickTarget::parse("class:http://purl.org/spar/amo/Claim"),
            ClickTarget::ClassGroup(CLAIM.into())
        );
        assert_eq!(
            ClickTarget::parse("http://ex.org/A1"),
            ClickTarget::Entity("http://ex.org/A1".into())
        );
    }

    #[test]
    fn class_click_toggles_and_entity_click_does_not() {
        let mut session = ExplorerSession::new();
        session.select_work("http://ex.org/W1");

        session.handle_click("class:http://purl.org/spar/amo/Claim");
        assert!(session.expansion().is_expanded(CLAIM));
        assert_eq!(session.detail_target(), Some(CLAIM));

        let before = session.expansion().clone();
        session.handle_click("http://ex.org/A1");
        assert_eq!(session.expansion(), &before);
        assert_eq!(session.detail_target(), Some("http://ex.org/A1"));

        session.handle_click("class:http://purl.org/spar/amo/Claim");
        assert!(!session.expansion().is_expanded(CLAIM));
    }

    #[test]
    fn selecting_a_work_resets_node_selection() {
        let mut session = ExplorerSession::new();
        assert_eq!(session.detail_target(), None);
        session.select_work("http://ex.org/W1");
        session.handle_click("http://ex.org/A1");
        session.select_work("http://ex.org/W2");
        assert_eq!(session.selected_node(), None);
        assert_eq!(session.detail_target(), Some("http://ex.org/W2"));
    }

    #[test]
    fn artifact_subgroup_details_resolve_to_umbrella() {
        let mut session = ExplorerSession::new();
        session.handle_click(&format!("class:{USED_ARTIFACT_KEY}"));
        assert!(session.expansion().is_expanded(USED_ARTIFACT_KEY));
        assert_eq!(session.detail_target(), Some(OntologyClass::Artifact.key()));
    }
}
