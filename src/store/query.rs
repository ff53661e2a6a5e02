//! In-memory predicate matching for `find_matching_*` calls.
//!
//! A [Query] is a map from dotted field path to [Criterion]. Paths walk
//! nested objects the way a MongoDB dotted-path query does; `versions.draft`
//! on a `CourseIndex` document reaches into the `versions` object's
//! `draft` key.

use regex::Regex;
use serde_json::Value;

use std::collections::HashMap;

/// One matching operator against the value found at a [Query] path.
#[derive(Clone, Debug)]
pub enum Criterion {
    /// Scalar (or whole-value) equality.
    Eq(Value),
    /// True if the target is a list and any element equals one of `values`,
    /// or the scalar target equals one of `values`.
    In(Vec<Value>),
    /// Substring regex match against a string target.
    Regex(String),
    /// Field must (or must not) be present.
    Exists(bool),
}

pub type Query = HashMap<String, Criterion>;

pub struct QueryMatcher;

impl QueryMatcher {
    /// Match every criterion in `query` against `document`. All criteria
    /// must match (implicit conjunction, as `find_matching_*` callers in
    /// this crate only ever need AND semantics).
    pub fn matches(document: &Value, query: &Query) -> bool {
        query
            .iter()
            .all(|(path, criterion)| Self::matches_one(document, path, criterion))
    }

    fn matches_one(document: &Value, path: &str, criterion: &Criterion) -> bool {
        let target = Self::resolve_path(document, path);
        match (criterion, target) {
            (Criterion::Exists(want), found) => found.is_some() == *want,
            (_, None) => matches!(criterion, Criterion::Eq(Value::Null)),
            (Criterion::Eq(want), Some(found)) => found == want,
            (Criterion::In(values), Some(found)) => Self::matches_in(found, values),
            (Criterion::Regex(pattern), Some(found)) => Self::matches_regex(found, pattern),
        }
    }

    fn matches_in(found: &Value, values: &[Value]) -> bool {
        match found {
            Value::Array(items) => items.iter().any(|item| values.contains(item)),
            scalar => values.contains(scalar),
        }
    }

    fn matches_regex(found: &Value, pattern: &str) -> bool {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => return false,
        };
        match found {
            Value::String(s) => re.is_match(s),
            Value::Array(items) => items
                .iter()
                .any(|item| matches!(item, Value::String(s) if re.is_match(s))),
            _ => false,
        }
    }

    /// Walk a dotted path through nested objects. Returns `None` when any
    /// segment is absent, so an unknown criterion key never matches and
    /// an absent key matches only a criterion that is itself null — both
    /// fall out of treating a missing segment as "no value".
    fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
        let mut current = document;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
