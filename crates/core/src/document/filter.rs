use serde_json::Value;

use super::{lookup, Document, ID_FIELD};

/// Conjunction of equality predicates on dotted field paths.
///
/// The empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Match documents whose `path` equals `value`
    pub fn eq(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(path, value)
    }

    /// Match a single identifier
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::eq(ID_FIELD, id.into())
    }

    /// Add another equality predicate
    pub fn and(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((path.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.clauses.iter().map(|(path, value)| (path.as_str(), value))
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(path, expected)| lookup(doc, path) == Some(expected))
    }
}
