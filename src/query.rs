//! Attribute queries over stored records
//!
//! A query is a list of `(attribute, condition)` clauses evaluated against a
//! record serialized to JSON. Clauses are checked in insertion order with
//! short-circuit on the first mismatch, so putting the most selective clause
//! first reduces the number of checks per record.
//!
//! ```rust
//! use trackdb::Query;
//!
//! let query = Query::new()
//!     .eq("project", "convnet")
//!     .one_of("status", ["Running", "Success"]);
//!
//! let record = serde_json::json!({"project": "convnet", "status": "Running"});
//! assert!(query.matches(&record));
//! ```

use serde_json::Value;
use tracing::warn;

/// Constraint on a single record attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Attribute must equal the value.
    Eq(Value),
    /// Attribute must be one of the listed values.
    In(Vec<Value>),
}

/// A conjunction of attribute constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<(String, Condition)>,
}

impl Query {
    /// Create an empty query. An empty query matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `attr` to equal `value`.
    #[must_use]
    pub fn eq(mut self, attr: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((attr.into(), Condition::Eq(value.into())));
        self
    }

    /// Require `attr` to be one of `values`.
    #[must_use]
    pub fn one_of<V: Into<Value>>(
        mut self,
        attr: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.clauses.push((attr.into(), Condition::In(values)));
        self
    }

    /// Check whether the query has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Check whether a serialized record satisfies every clause.
    ///
    /// Attributes absent from the record are skipped with a warning rather
    /// than failing the match, so a query can span record types that do not
    /// all carry the same fields.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        for (attr, condition) in &self.clauses {
            let Some(actual) = record.get(attr) else {
                warn!(attr = %attr, "record has no such attribute; clause skipped");
                continue;
            };

            let selected = match condition {
                Condition::Eq(expected) => actual == expected,
                Condition::In(choices) => choices.contains(actual),
            };

            if !selected {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_matches_everything() {
        let query = Query::new();
        assert!(query.is_empty());
        assert!(query.matches(&json!({"name": "anything"})));
    }

    #[test]
    fn test_eq_clause() {
        let query = Query::new().eq("name", "baseline");
        assert!(query.matches(&json!({"name": "baseline"})));
        assert!(!query.matches(&json!({"name": "other"})));
    }

    #[test]
    fn test_in_clause() {
        let query = Query::new().one_of("revision", [0, 1, 2]);
        assert!(query.matches(&json!({"revision": 1})));
        assert!(!query.matches(&json!({"revision": 7})));
    }

    #[test]
    fn test_conjunction_short_circuits() {
        let query = Query::new().eq("project", "a").eq("status", "Running");
        assert!(!query.matches(&json!({"project": "b", "status": "Running"})));
        assert!(query.matches(&json!({"project": "a", "status": "Running"})));
    }

    #[test]
    fn test_missing_attribute_is_skipped() {
        let query = Query::new().eq("no_such_field", 1).eq("name", "x");
        assert!(query.matches(&json!({"name": "x"})));
    }
}
