//! The block-class registry: given a category tag, report which fields
//! belong to content, settings, or children scope. This module defines
//! the narrow interface [VersioningCore](crate::versioning::VersioningCore)
//! and [InheritanceEngine](crate::inheritance::InheritanceEngine) call
//! through, plus a small in-memory registry so the rest of the crate is
//! independently testable.

use std::collections::{HashMap, HashSet};

/// Which part of a block's data a given field name belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldScope {
    Content,
    Settings,
    Children,
    Other,
}

/// Given a category, answers scope-of-field and inheritability questions.
pub trait BlockClassRegistry {
    fn scope_of(&self, category: &str, field: &str) -> FieldScope;

    /// Fields an external capability has designated "inheritable".
    fn is_inheritable(&self, category: &str, field: &str) -> bool;

    /// Categories whose blocks tolerate being unreachable from the root
    /// (orphan-tolerant).
    fn is_detached(&self, category: &str) -> bool;
}

/// A registry built from an explicit field-scope table, sufficient for
/// tests and the demo CLI. A real deployment plugs in whatever introspects
/// its actual xblock-equivalent field declarations.
#[derive(Default)]
pub struct StaticRegistry {
    content_fields: HashMap<String, HashSet<String>>,
    children_fields: HashMap<String, HashSet<String>>,
    inheritable: HashSet<String>,
    detached: HashSet<String>,
}

impl StaticRegistry {
    pub fn new() -> StaticRegistry {
        StaticRegistry::default()
    }

    pub fn with_content_fields(mut self, category: &str, fields: &[&str]) -> StaticRegistry {
        self.content_fields.insert(
            category.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_children_fields(mut self, category: &str, fields: &[&str]) -> StaticRegistry {
        self.children_fields.insert(
            category.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_inheritable(mut self, fields: &[&str]) -> StaticRegistry {
        self.inheritable.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    pub fn with_detached(mut self, categories: &[&str]) -> StaticRegistry {
        self.detached
            .extend(categories.iter().map(|c| c.to_string()));
        self
    }
}

impl BlockClassRegistry for StaticRegistry {
    fn scope_of(&self, category: &str, field: &str) -> FieldScope {
        if field == "children" {
            return FieldScope::Children;
        }
        if self
            .content_fields
            .get(category)
            .map_or(false, |fields| fields.contains(field))
        {
            return FieldScope::Content;
        }
        if self
            .children_fields
            .get(category)
            .map_or(false, |fields| fields.contains(field))
        {
            return FieldScope::Children;
        }
        FieldScope::Settings
    }

    fn is_inheritable(&self, _category: &str, field: &str) -> bool {
        self.inheritable.contains(field)
    }

    fn is_detached(&self, category: &str) -> bool {
        self.detached.contains(category)
    }
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod scope_test;
