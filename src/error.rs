//! Rich diagnostic error types for idea-graph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text. None of these errors is fatal to a
//! graph build: the traversal engine degrades a failed query to an empty hop
//! and keeps going.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for idea-graph.
#[derive(Debug, Error, Diagnostic)]
pub enum IdeaGraphError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("transport error talking to {endpoint}: {message}")]
    #[diagnostic(
        code(idea_graph::query::transport),
        help(
            "The SPARQL endpoint could not be reached. Check that the triple store \
             is running and that the endpoint URL in the configuration is correct."
        )
    )]
    Transport { endpoint: String, message: String },

    #[error("endpoint {endpoint} answered with HTTP {status}")]
    #[diagnostic(
        code(idea_graph::query::status),
        help(
            "The store rejected the query. A 400 usually means a syntax error in the \
             generated query, a 404 a wrong dataset name in the endpoint URL."
        )
    )]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("malformed query response: {message}")]
    #[diagnostic(
        code(idea_graph::query::malformed),
        help(
            "The response was not a SPARQL 1.1 JSON results document. Make sure the \
             endpoint honours `Accept: application/sparql-results+json`."
        )
    )]
    Malformed { message: String },

    #[error("IRI cannot be embedded in a query: {iri}")]
    #[diagnostic(
        code(idea_graph::query::invalid_iri),
        help("IRIs must be non-empty and must not contain whitespace, quotes or angle brackets.")
    )]
    InvalidIri { iri: String },

    #[error("local store error: {message}")]
    #[diagnostic(
        code(idea_graph::query::store),
        help("The in-process oxigraph store failed. Check the data file syntax.")
    )]
    Store { message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(idea_graph::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(idea_graph::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(idea_graph::config::invalid), help("{message}"))]
    Invalid { message: String },
}

/// Convenience alias for functions returning idea-graph results.
pub type IdeaGraphResult<T> = std::result::Result<T, IdeaGraphError>;

/// Result type for Query Layer operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_converts_to_top_level() {
        let err = QueryError::Malformed {
            message: "missing results".into(),
        };
        let top: IdeaGraphError = err.into();
        assert!(matches!(top, IdeaGraphError::Query(QueryError::Malformed { .. })));
    }

    #[test]
    fn status_error_mentions_code_and_endpoint() {
        let err = QueryError::Status {
            endpoint: "http://localhost:3030/idea_kg/sparql".into(),
            status: 503,
            body: String::new(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("503"));
        assert!(msg.contains("idea_kg"));
    }

    #[test]
    fn config_and_query_errors_share_the_top_level_result() {
        fn check_config(fail: bool) -> Result<(), ConfigError> {
            if fail {
                return Err(ConfigError::Invalid {
                    message: "max_hops must be between 1 and 3, got 7".into(),
                });
            }
            Ok(())
        }
        fn open() -> QueryResult<()> {
            Err(QueryError::InvalidIri { iri: String::new() })
        }
        fn startup(fail_config: bool) -> IdeaGraphResult<()> {
            check_config(fail_config)?;
            open()?;
            Ok(())
        }
        assert!(matches!(startup(true), Err(IdeaGraphError::Config(ConfigError::Invalid { .. }))));
        assert!(matches!(startup(false), Err(IdeaGraphError::Query(QueryError::InvalidIri { .. }))));
    }
}
