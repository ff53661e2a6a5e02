//! Copy-on-write snapshots of the block graph.
//!
//! [StructureStore] owns the one primitive every higher-level mutation in
//! [crate::versioning] builds on — `version_structure` — plus the plumbing
//! around it: block-id allocation and thin CRUD over [DocumentConnector].

use crate::{
    model::Structure,
    store::DocumentConnector,
    Error, Result,
};

pub struct StructureStore<'a, C: DocumentConnector> {
    connector: &'a C,
}

impl<'a, C: DocumentConnector> StructureStore<'a, C> {
    pub fn new(connector: &'a C) -> StructureStore<'a, C> {
        StructureStore { connector }
    }

    pub fn get(&self, id: crate::model::StructureId) -> Result<Structure> {
        self.connector
            .get_structure(id)?
            .ok_or_else(|| Error::item_not_found(format!("structure {}", id)))
    }

    pub fn insert(&self, structure: Structure) -> Result<()> {
        self.connector.insert_structure(structure)
    }

    pub fn update(&self, structure: Structure) -> Result<()> {
        self.connector.update_structure(structure)
    }

    /// Deep-copy `s`, assign a new id, set `previous_version = s.id`,
    /// stamp `edited_by`/`edited_on`. Not yet written — callers mutate the
    /// returned value freely before committing it with a single `insert`
    /// or `update`. O(#blocks): the whole block map is copied.
    pub fn version_structure(&self, s: &Structure, user: impl Into<String>) -> Structure {
        let mut copy = s.clone();
        copy.id = crate::model::StructureId::new();
        copy.previous_version = Some(s.id);
        copy.edited_by = user.into();
        copy.edited_on = chrono::Utc::now();
        copy
    }

    /// Lowest positive integer `n` making `<category><n>` unique among
    /// `structure.blocks`.
    pub fn allocate_block_id(structure: &Structure, category: &str) -> String {
        let mut n = 1u64;
        loop {
            let candidate = format!("{}{}", category, n);
            if !structure.blocks.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[path = "structure_store_test.rs"]
mod structure_store_test;
