//! SPARQL 1.1 protocol client over HTTP.
//!
//! Uses `ureq` for synchronous requests: every query is one blocking round
//! trip, bounded by the configured timeout.

use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{QueryError, QueryResult};

use super::{BindingRecord, BindingValue, QueryService};

/// Bytes of an error body kept for diagnostics.
const ERROR_BODY_PREVIEW: usize = 500;

/// SPARQL JSON results document (`application/sparql-results+json`).
#[derive(Debug, Deserialize)]
struct SparqlJson {
    results: SparqlJsonResults,
}

#[derive(Debug, Deserialize)]
struct SparqlJsonResults {
    bindings: Vec<HashMap<String, SparqlJsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct SparqlJsonTerm {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

/// Parse a SPARQL JSON results document into binding records.
pub fn parse_results(body: &str) -> QueryResult<Vec<BindingRecord>> {
    let doc: SparqlJson = serde_json::from_str(body).map_err(|e| QueryError::Malformed {
        message: e.to_string(),
    })?;
    Ok(records(doc))
}

/// Stream a SPARQL JSON results document from `reader`. The body size is not
/// capped; an I/O failure mid-body is a transport error of `endpoint`.
pub fn read_results(endpoint: &str, reader: impl Read) -> QueryResult<Vec<BindingRecord>> {
    let doc: SparqlJson =
        serde_json::from_reader(std::io::BufReader::new(reader)).map_err(|e| {
            if e.is_io() {
                QueryError::Transport {
                    endpoint: endpoint.to_string(),
                    message: format!("failed to read response body: {e}"),
                }
            } else {
                QueryError::Malformed {
                    message: e.to_string(),
                }
            }
        })?;
    Ok(records(doc))
}

fn records(doc: SparqlJson) -> Vec<BindingRecord> {
    doc
        .results
        .bindings
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(var, term)| {
                    let is_resource = matches!(term.kind.as_str(), "uri" | "bnode");
                    (
                        var,
                        BindingValue {
                            value: term.value,
                            is_resource,
                        },
                    )
                })
                .collect()
        })
        .collect()
}

/// Query client for a remote SPARQL endpoint.
#[derive(Clone)]
pub struct HttpSparqlClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpSparqlClient {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpSparqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSparqlClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl QueryService for HttpSparqlClient {
    fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/sparql-results+json")
            .set("Content-Type", "application/sparql-query")
            .send_string(query);

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let mut body = response.into_string().unwrap_or_default();
                if body.len() > ERROR_BODY_PREVIEW {
                    let mut cut = ERROR_BODY_PREVIEW;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                }
                tracing::error!(endpoint = %self.endpoint, status, body = %body, "query rejected");
                return Err(QueryError::Status {
                    endpoint: self.endpoint.clone(),
                    status,
                    body,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(QueryError::Transport {
                    endpoint: self.endpoint.clone(),
                    message: transport.to_string(),
                });
            }
        };

        tracing::trace!(
            endpoint = %self.endpoint,
            content_type = response.content_type(),
            "query answered"
        );

        read_results(&self.endpoint, response.into_reader())
    }
}
