//! SPARQL query texts used by the explorer.
//!
//! Every query starts with the `PREFIX` block of the namespace registry.
//! IRIs coming from the data or the user go through [`iri_ref`] before they
//! are spliced into a query.

use crate::error::{QueryError, QueryResult};
use crate::namespace::{LABEL_PREDICATES, NamespaceRegistry};

/// Prepend the registry's `PREFIX` block to a query body.
pub fn build_query(body: &str) -> String {
    format!("{}\n\n{}", NamespaceRegistry::global().prefix_block(), body.trim())
}

/// `<iri>` if `iri` can be embedded safely in a query text.
pub fn iri_ref(iri: &str) -> QueryResult<String> {
    let forbidden = |c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\');
    if iri.is_empty() || iri.chars().any(forbidden) {
        return Err(QueryError::InvalidIri {
            iri: iri.to_string(),
        });
    }
    Ok(format!("<{iri}>"))
}

/// `OPTIONAL` label lookups for `?o`, folded into `?label` by priority.
fn label_patterns() -> String {
    let mut out = String::new();
    let mut vars = Vec::with_capacity(LABEL_PREDICATES.len());
    for (i, predicate) in LABEL_PREDICATES.iter().enumerate() {
        out.push_str(&format!("  OPTIONAL {{ ?o <{predicate}> ?label{i} }}\n"));
        vars.push(format!("?label{i}"));
    }
    out.push_str(&format!("  BIND(COALESCE({}) AS ?label)\n", vars.join(", ")));
    out
}

/// All triples touching any of `centers`, in both directions, with optional
/// subject/object types and the best available label of the object.
pub fn neighborhood(centers: &[String]) -> QueryResult<String> {
    let values = centers
        .iter()
        .map(|c| iri_ref(c))
        .collect::<QueryResult<Vec<_>>>()?
        .join(" ");

    let body = format!(
        "SELECT ?s ?p ?o ?sType ?oType ?label\n\
         WHERE {{\n\
         \x20 VALUES ?center {{ {values} }}\n\
         \x20 {{ ?center ?p ?o . BIND(?center AS ?s) }}\n\
         \x20 UNION\n\
         \x20 {{ ?s ?p ?center . BIND(?center AS ?o) }}\n\
         \x20 OPTIONAL {{ ?s rdf:type ?sType }}\n\
         \x20 OPTIONAL {{ ?o rdf:type ?oType }}\n\
         {labels}\
         }}",
        labels = label_patterns(),
    );
    Ok(build_query(&body))
}

/// Instances of `fabio:Work` (or any subclass) with title, year and venue.
pub fn all_works(limit: usize) -> String {
    build_query(&format!(
        r#"
SELECT ?work (SAMPLE(?title0) AS ?title) (SAMPLE(?year0) AS ?year) (SAMPLE(?venue0) AS ?venue)
WHERE {{
  ?work rdf:type ?type .
  ?type rdfs:subClassOf* fabio:Work .
  OPTIONAL {{ ?work dc:title|dct:title|rdfs:label ?title0 }}
  OPTIONAL {{
    ?work dc:publisher ?event .
    OPTIONAL {{ ?event dc:date ?date . BIND(SUBSTR(STR(?date), 1, 4) AS ?year0) }}
    OPTIONAL {{ ?event rdfs:label|dc:title ?venue0 }}
  }}
}}
GROUP BY ?work
ORDER BY ?work
LIMIT {limit}
"#
    ))
}

/// Every relation whose predicate is `cito:cites` or a transitive sub-property of it.
pub fn citation_edges() -> String {
    build_query(
        r#"
SELECT DISTINCT ?source ?target
WHERE {
  ?source ?p ?target .
  ?p rdfs:subPropertyOf* cito:cites .
  FILTER(isIRI(?target))
}
"#,
    )
}

/// Flat one-hop dump of an entity's outgoing properties.
pub fn properties_of(iri: &str) -> QueryResult<String> {
    let subject = iri_ref(iri)?;
    Ok(build_query(&format!(
        "SELECT ?p ?o WHERE {{\n  {subject} ?p ?o .\n}}"
    )))
}

/// Disciplines ranked by the number of works that declare them.
pub fn top_keywords(limit: usize) -> String {
    build_query(&format!(
        r#"
SELECT ?keyword (COUNT(DISTINCT ?work) AS ?uses)
WHERE {{
  ?work fabio:hasDiscipline ?keyword .
}}
GROUP BY ?keyword
ORDER BY DESC(?uses) ?keyword
LIMIT {limit}
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_carry_prefix_block() {
        let q = citation_edges();
        assert!(q.starts_with("PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>"));
        assert!(q.contains("PREFIX cito: <http://purl.org/spar/cito/>"));
        assert!(q.contains("rdfs:subPropertyOf* cito:cites"));
    }

    #[test]
    fn neighborhood_lists_all_centers() {
        let q = neighborhood(&["http://ex.org/A1".into(), "http://ex.org/A2".into()]).unwrap();
        assert!(q.contains("VALUES ?center { <http://ex.org/A1> <http://ex.org/A2> }"));
        assert!(q.contains("?label0"));
        assert!(q.contains("COALESCE(?label0, ?label1"));
    }

    #[test]
    fn rejects_iri_injection() {
        let err = iri_ref("http://ex.org/x> } DROP ALL { <y").unwrap_err();
        assert!(matches!(err, QueryError::InvalidIri { .. }));
        assert!(iri_ref("").is_err());
        assert!(properties_of("http://ex.org/a b").is_err());
    }
}
