//! Overview Builder: every work in the filtered set plus the citations among them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::QueryResult;
use crate::model::style::CITATION_EDGE_COLOR;
use crate::model::{Edge, GraphModel, Node, NodeCategory, Style, truncate_label};
use crate::namespace::local_name;
use crate::query::{QueryService, sparql};

/// Label of overview citation edges.
pub const CITATION_LABEL: &str = "cito:cites";

/// One work with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    pub iri: String,
    pub title: Option<String>,
    pub year: Option<String>,
    pub venue: Option<String>,
}

impl WorkSummary {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            title: None,
            year: None,
            venue: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    /// Title, or the IRI when the work has none.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.iri)
    }

    /// Hover text: `"Title (Year)"`, or the title alone.
    pub fn hover(&self) -> String {
        match &self.year {
            Some(year) => format!("{} ({year})", self.display_title()),
            None => self.display_title().to_string(),
        }
    }
}

/// A citation between two works.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationEdge {
    pub source: String,
    pub target: String,
}

impl CitationEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Search filters for the overview. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the venue.
    pub venue: Option<String>,
    /// Exact publication year.
    pub year: Option<String>,
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

impl WorkFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.venue.is_none() && self.year.is_none()
    }

    pub fn matches(&self, work: &WorkSummary) -> bool {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            if !contains_ci(Some(work.display_title()), title) {
                return false;
            }
        }
        if let Some(venue) = self.venue.as_deref().filter(|v| !v.is_empty()) {
            if !contains_ci(work.venue.as_deref(), venue) {
                return false;
            }
        }
        if let Some(year) = self.year.as_deref().filter(|y| !y.is_empty()) {
            if work.year.as_deref() != Some(year) {
                return false;
            }
        }
        true
    }

    pub fn apply<'w>(&self, works: &'w [WorkSummary]) -> Vec<&'w WorkSummary> {
        works.iter().filter(|w| self.matches(w)).collect()
    }
}

/// Fetch up to `limit` works, sorted case-insensitively by title then IRI.
pub fn fetch_works<Q: QueryService + ?Sized>(service: &Q, limit: usize) -> QueryResult<Vec<WorkSummary>> {
    let rows = service.execute(&sparql::all_works(limit))?;
    let mut works: Vec<WorkSummary> = rows
        .iter()
        .filter_map(|row| {
            let iri = row.value("work")?;
            Some(WorkSummary {
                iri: iri.to_string(),
                title: row.value("title").map(str::to_string),
                year: row.value("year").map(str::to_string),
                venue: row.value("venue").map(str::to_string),
            })
        })
        .collect();
    works.sort_by(|a, b| {
        a.display_title()
            .to_lowercase()
            .cmp(&b.display_title().to_lowercase())
            .then_with(|| a.iri.cmp(&b.iri))
    });
    tracing::debug!(works = works.len(), "works fetched");
    Ok(works)
}

/// Fetch every citation whose predicate is `cito:cites` or a sub-property of it.
pub fn fetch_citations<Q: QueryService + ?Sized>(service: &Q) -> QueryResult<Vec<CitationEdge>> {
    let rows = service.execute(&sparql::citation_edges())?;
    let edges: Vec<CitationEdge> = rows
        .iter()
        .filter_map(|row| Some(CitationEdge::new(row.value("source")?, row.value("target")?)))
        .collect();
    tracing::debug!(citations = edges.len(), "citations fetched");
    Ok(edges)
}

/// One node per work passing `filter` and one edge per citation between two
/// of those works. Citations touching a filtered-out work are dropped.
pub fn build_overview(
    works: &[WorkSummary],
    citations: &[CitationEdge],
    filter: &WorkFilter,
    label_max_len: usize,
) -> GraphModel {
    let mut model = GraphModel::new();
    let mut present: HashSet<&str> = HashSet::new();

    for work in filter.apply(works) {
        let node = Node::new(
            work.iri.as_str(),
            truncate_label(local_name(&work.iri), label_max_len),
            work.hover(),
            NodeCategory::Work,
        )
        .with_style(Style::overview_work());
        model.add_node(node);
        present.insert(work.iri.as_str());
    }

    let mut dropped = 0usize;
    for edge in citations {
        if present.contains(edge.source.as_str()) && present.contains(edge.target.as_str()) {
            model.add_edge(Edge::new(
                edge.source.as_str(),
                edge.target.as_str(),
                CITATION_LABEL,
                CITATION_EDGE_COLOR,
            ));
        } else {
            dropped += 1;
        }
    }
    tracing::debug!(
        nodes = model.node_count(),
        edges = model.edge_count(),
        dropped,
        "overview built"
    );
    model
}
