// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # idea-graph
//!
//! Work-centric graph assembly and layering over a knowledge graph of
//! academic works, their document structure and their argumentation.
//!
//! ## Architecture
//!
//! - **Namespace registry** (`namespace`): static prefix table with category buckets
//! - **Query layer** (`query`): SPARQL over HTTP (`ureq`) or an in-process `oxigraph` store
//! - **Classifier** (`classify`): layer tagging with argument > structure > metadata precedence
//! - **Traversal** (`traverse`): skeleton/expanded state machine, at most three hops
//! - **Graph model** (`model`): class-group skeleton, expansion state, deterministic styles
//! - **Overview** (`overview`): all works plus the citations among them
//!
//! ## Library usage
//!
//! ```no_run
//! use idea_graph::classify::TripleClassifier;
//! use idea_graph::model::{BuildOptions, ExpansionState, build_work_graph};
//! use idea_graph::query::local::LocalStore;
//! use idea_graph::traverse::{TraversalConfig, TraversalEngine};
//!
//! let store = LocalStore::from_turtle(
//!     "<http://ex.org/W1> <http://purl.org/dc/elements/1.1/title> \"Paper A\" .",
//! )
//! .unwrap();
//! let engine = TraversalEngine::new(&store, TripleClassifier::default(), TraversalConfig::default());
//! let result = engine.traverse("http://ex.org/W1");
//! let graph = build_work_graph(&result, &ExpansionState::new(), &BuildOptions::default());
//! assert_eq!(graph.node_count(), 1);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod model;
pub mod namespace;
pub mod ontology;
pub mod overview;
pub mod query;
pub mod session;
pub mod traverse;
