//! CRUD for content-payload documents.
//!
//! Every change produces a new revision rather than mutating in place;
//! `update` additionally detects no-op edits so callers get idempotence
//! for free.

use crate::{
    model::{strip_filtered_fields, Definition, DefinitionId, Fields},
    store::DocumentConnector,
    Error, Result,
};

pub struct DefinitionStore<'a, C: DocumentConnector> {
    connector: &'a C,
}

impl<'a, C: DocumentConnector> DefinitionStore<'a, C> {
    pub fn new(connector: &'a C) -> DefinitionStore<'a, C> {
        DefinitionStore { connector }
    }

    /// Create a brand-new content family: `previous_version=None`,
    /// `original_version=self`.
    pub fn create(
        &self,
        fields: Fields,
        category: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<DefinitionId> {
        let fields = strip_filtered_fields(fields);
        let definition = Definition::fresh(category, fields, user);
        let id = definition.id;
        self.connector.insert_definition(definition)?;
        Ok(id)
    }

    /// Read `definition_id`, diff `new_fields` against the stored fields by
    /// key-and-value; identical sets return `(definition_id, false)` without
    /// writing. Otherwise persist a new revision sharing `original_version`.
    pub fn update(
        &self,
        definition_id: DefinitionId,
        new_fields: Fields,
        user: impl Into<String>,
    ) -> Result<(DefinitionId, bool)> {
        let current = self
            .connector
            .get_definition(definition_id)?
            .ok_or_else(|| Error::item_not_found(format!("definition {}", definition_id)))?;

        let new_fields = strip_filtered_fields(new_fields);
        if fields_equal(&current.fields, &new_fields) {
            return Ok((definition_id, false));
        }

        let revised = current.revise(new_fields, user);
        let new_id = revised.id;
        self.connector.insert_definition(revised)?;
        Ok((new_id, true))
    }

    pub fn get(&self, id: DefinitionId) -> Result<Option<Definition>> {
        self.connector.get_definition(id)
    }
}

/// Set-symmetric-difference on keys and values, order-independent.
fn fields_equal(a: &Fields, b: &Fields) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
}

#[cfg(test)]
#[path = "definition_store_test.rs"]
mod definition_store_test;
