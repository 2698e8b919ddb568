//! Query Layer: executes query text against a triple store.
//!
//! The store is a black box behind [`QueryService`]. Two implementations ship
//! with the crate:
//!
//! - [`http::HttpSparqlClient`]: SPARQL 1.1 protocol over HTTP (`ureq`)
//! - [`local::LocalStore`]: in-process `oxigraph` store
//!
//! Query texts are built by [`sparql`].

pub mod http;
pub mod local;
pub mod sparql;

use std::collections::HashMap;

use crate::error::QueryResult;

/// One bound variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingValue {
    pub value: String,
    /// IRI or blank node (`true`), literal (`false`).
    pub is_resource: bool,
}

impl BindingValue {
    pub fn resource(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_resource: true,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_resource: false,
        }
    }
}

/// One solution row: variable name → value. Unbound variables are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingRecord {
    values: HashMap<String, BindingValue>,
}

impl BindingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, var: impl Into<String>, value: BindingValue) -> Self {
        self.values.insert(var.into(), value);
        self
    }

    pub fn insert(&mut self, var: impl Into<String>, value: BindingValue) {
        self.values.insert(var.into(), value);
    }

    pub fn get(&self, var: &str) -> Option<&BindingValue> {
        self.values.get(var)
    }

    /// The lexical value of `var`, if bound.
    pub fn value(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(|v| v.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, BindingValue)> for BindingRecord {
    fn from_iter<I: IntoIterator<Item = (String, BindingValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A request/response query service over the triple store.
pub trait QueryService {
    /// Execute `query` and return its solutions in order.
    fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>>;
}

impl<T: QueryService + ?Sized> QueryService for &T {
    fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
        (**self).execute(query)
    }
}

impl<T: QueryService + ?Sized> QueryService for Box<T> {
    fn execute(&self, query: &str) -> QueryResult<Vec<BindingRecord>> {
        (**self).execute(query)
    }
}
