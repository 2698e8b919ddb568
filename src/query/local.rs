//! In-process triple store backed by oxigraph.
//!
//! Answers the same SPARQL texts as a remote endpoint, so the explorer can run
//! against a Turtle or N-Triples dump without a server.

use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::{GraphNameRef, NamedNode, Quad, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{QueryError, QueryResult};

use super::{BindingRecord, BindingValue, QueryService};

/// SPARQL-capable in-memory RDF store.
pub struct LocalStore {
    store: Store,
}

impl LocalStore {
    /// Create an empty in-memory store.
    pub fn in_memory() -> QueryResult<Self> {
        let store = Store::new().map_err(|e| QueryError::Store {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Create a store holding the given Turtle document.
    pub fn from_turtle(data: &str) -> QueryResult<Self> {
        let store = Self::in_memory()?;
        store.load(RdfFormat::Turtle, data.as_bytes())?;
        Ok(store)
    }

    /// Load a `.ttl` or `.nt` file into the store.
    pub fn load_file(&self, path: &Path) -> QueryResult<()> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("nt") => RdfFormat::NTriples,
            Some("ttl") | None => RdfFormat::Turtle,
            Some(other) => {
                return Err(QueryError::Store {
                    message: format!("unsupported data file extension: .{other}"),
                });
            }
        };
        let file = std::fs::File::open(path).map_err(|e| QueryError::Store {
            message: format!("failed to open {}: {e}", path.display()),
        })?;
        self.load(format, std::io::BufReader::new(file))?;
        tracing::info!(path = %path.display(), triples = self.len(), "loaded data file");
        Ok(())
    }

    fn load(&self, format: RdfFormat, reader: impl std::io::Read) -> QueryResult<()> {
        self.store
            .load_from_reader(format, reader)
            .map_err(|e| QueryError::Store {
                message: format!("failed to load RDF data: {e}"),
            })
    }

    /// Insert one triple with an IRI object.
    pub fn insert_iri(&self, subject: &str, predicate: &str, object: &str) -> QueryResult<()> {
        let object = Self::named(object)?;
        self.insert_term(subject, predicate, object.into())
    }

    /// Insert one triple with a plain literal object.
    pub fn insert_literal(&self, subject: &str, predicate: &str, value: &str) -> QueryResult<()> {
        let object = oxigraph::model::Literal::new_simple_literal(value);
        self.insert_term(subject, predicate, object.into())
    }

    fn insert_term(&self, subject: &str, predicate: &str, object: Term) -> QueryResult<()> {
        let quad = Quad::new(
            Self::named(subject)?,
            Self::named(predicate)?,
            object,
            GraphNameRef::DefaultGraph,
        );
        self.store.insert(&quad).map_err(|e| QueryError::Store {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }

    fn named(iri: &str) -> QueryResult<NamedNode> {
        NamedNode::new(iri).map_err(|_| QueryError::InvalidIri {
            iri: iri.to_string(),
        })
    }

    /// Number of quads in the store (0 if the store cannot be read).
    pub fn len(&self) -> usize {
        self.store.len().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn binding_value(term: &Term) -> Option<BindingValue> {
    match term {
        Term::NamedNode(node) => Some(BindingValue::resource(node.as_str())),
        Term::BlankNode(node) => Some(BindingValue::resource(node.as_str())),
        Term::Literal(literal) => Some(BindingValue::literal(literal.value())),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

impl QueryService for LocalStore {
    #[allow(deprecated)]
    fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
        let results = self.store.query(query).map_err(|e| QueryError::Store {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| QueryError::Store {
                        message: format!("solution error: {e}"),
                    })?;
                    let mut record = BindingRecord::new();
                    for (var, term) in solution.iter() {
                        if let Some(value) = binding_value(term) {
                            record.insert(var.as_str(), value);
                        }
                    }
                    rows.push(record);
                }
                Ok(rows)
            }
            _ => Err(QueryError::Malformed {
                message: "expected SELECT solutions".into(),
            }),
        }
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore").finish()
    }
}
