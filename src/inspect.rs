//! Entity detail lookup and the keyword cloud.
//!
//! Both are plain one-hop reads with no classification.

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::namespace::{NamespaceRegistry, pretty_keyword};
use crate::query::{QueryService, sparql};

/// One outgoing property of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRow {
    pub predicate: String,
    pub value: String,
    pub is_resource: bool,
}

impl PropertyRow {
    /// `prefix:local` form of the predicate.
    pub fn short_predicate(&self) -> String {
        NamespaceRegistry::global().shorten(&self.predicate)
    }
}

/// Flat dump of the outgoing properties of `iri`, in store order.
pub fn properties_of<Q: QueryService + ?Sized>(service: &Q, iri: &str) -> QueryResult<Vec<PropertyRow>> {
    let query = sparql::properties_of(iri)?;
    let rows = service.execute(&query)?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let predicate = row.value("p")?;
            let object = row.get("o")?;
            Some(PropertyRow {
                predicate: predicate.to_string(),
                value: object.value.clone(),
                is_resource: object.is_resource,
            })
        })
        .collect())
}

/// A discipline keyword and the number of works declaring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub iri: String,
    /// Display form: prefix stripped, underscores as spaces.
    pub label: String,
    pub uses: u64,
}

/// The `limit` most used keywords, most used first.
pub fn top_keywords<Q: QueryService + ?Sized>(service: &Q, limit: usize) -> QueryResult<Vec<Keyword>> {
    let rows = service.execute(&sparql::top_keywords(limit))?;
    let registry = NamespaceRegistry::global();
    Ok(rows
        .iter()
        .filter_map(|row| {
            let iri = row.value("keyword")?;
            let uses = row.value("uses").and_then(|n| n.parse().ok()).unwrap_or(0);
            Some(Keyword {
                iri: iri.to_string(),
                label: pretty_keyword(&registry.shorten(iri)),
                uses,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::QueryError;
    use crate::query::{BindingRecord, BindingValue};

    struct Recording {
        rows: Vec<BindingRecord>,
        last: RefCell<String>,
    }

    impl QueryService for Recording {
        fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
            *self.last.borrow_mut() = query.to_string();
            Ok(self.rows.clone())
        }
    }

    #[test]
    fn properties_keep_resource_flag() {
        let service = Recording {
            rows: vec![
                BindingRecord::new()
                    .with("p", BindingValue::resource("http://purl.org/dc/elements/1.1/title"))
                    .with("o", BindingValue::literal("Paper A")),
                BindingRecord::new()
                    .with("p", BindingValue::resource("http://purl.org/dc/elements/1.1/creator"))
                    .with("o", BindingValue::resource("http://ex.org/alice")),
            ],
            last: RefCell::new(String::new()),
        };
        let props = properties_of(&service, "http://ex.org/W1").unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].short_predicate(), "dc:title");
        assert!(!props[0].is_resource);
        assert!(props[1].is_resource);
        assert!(service.last.borrow().contains("<http://ex.org/W1> ?p ?o"));
    }

    #[test]
    fn invalid_iri_never_reaches_the_store() {
        let service = Recording {
            rows: Vec::new(),
            last: RefCell::new(String::new()),
        };
        let err = properties_of(&service, "not an iri").unwrap_err();
        assert!(matches!(err, QueryError::InvalidIri { .. }));
        assert!(service.last.borrow().is_empty());
    }

    #[test]
    fn keywords_get_pretty_labels() {
        let service = Recording {
            rows: vec![
                BindingRecord::new()
                    .with("keyword", BindingValue::resource("http://cso.kmi.open.ac.uk/schema/cso#semantic_web"))
                    .with("uses", BindingValue::literal("7")),
                BindingRecord::new()
                    .with("keyword", BindingValue::resource("http://www.semanticweb.org/idea/knowledge_graphs"))
                    .with("uses", BindingValue::literal("3")),
            ],
            last: RefCell::new(String::new()),
        };
        let keywords = top_keywords(&service, 30).unwrap();
        assert_eq!(keywords[0].label, "semantic web");
        assert_eq!(keywords[0].uses, 7);
        assert_eq!(keywords[1].label, "knowledge graphs");
        assert!(service.last.borrow().contains("LIMIT 30"));
    }
}
