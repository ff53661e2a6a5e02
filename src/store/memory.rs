use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    model::{CourseIndex, Definition, DefinitionId, Structure, StructureId},
    store::{DocumentConnector, Query, QueryMatcher},
    Error, Result,
};

/// In-process [DocumentConnector], one `RwLock`-guarded map per collection.
/// The index document for a package is the only mutable shared object;
/// structures and definitions are append-only once inserted, so their
/// locks are only ever held for the duration of a single insert or point
/// lookup.
#[derive(Default)]
pub struct MemoryConnector {
    indexes: RwLock<HashMap<String, CourseIndex>>,
    structures: RwLock<HashMap<StructureId, Structure>>,
    definitions: RwLock<HashMap<DefinitionId, Definition>>,
}

impl MemoryConnector {
    pub fn new() -> MemoryConnector {
        MemoryConnector::default()
    }
}

fn lock_read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<T>> {
    lock.read()
        .map_err(|err| Error::Fatal(format!("connector lock poisoned: {}", err)))
}

fn lock_write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<T>> {
    lock.write()
        .map_err(|err| Error::Fatal(format!("connector lock poisoned: {}", err)))
}

impl DocumentConnector for MemoryConnector {
    fn get_course_index(&self, package_id: &str) -> Result<Option<CourseIndex>> {
        Ok(lock_read(&self.indexes)?.get(package_id).cloned())
    }

    fn find_matching_course_indexes(&self, query: &Query) -> Result<Vec<CourseIndex>> {
        let indexes = lock_read(&self.indexes)?;
        let mut out = Vec::new();
        for index in indexes.values() {
            let doc = err_at!(FailConvert, serde_json::to_value(index))?;
            if QueryMatcher::matches(&doc, query) {
                out.push(index.clone());
            }
        }
        Ok(out)
    }

    fn insert_course_index(&self, index: CourseIndex) -> Result<()> {
        let mut indexes = lock_write(&self.indexes)?;
        if indexes.contains_key(&index.package_id) {
            return Err(Error::duplicate_item(index.package_id));
        }
        indexes.insert(index.package_id.clone(), index);
        Ok(())
    }

    fn update_course_index(&self, index: CourseIndex) -> Result<()> {
        let mut indexes = lock_write(&self.indexes)?;
        if !indexes.contains_key(&index.package_id) {
            return Err(Error::item_not_found(format!(
                "course index {}",
                index.package_id
            )));
        }
        indexes.insert(index.package_id.clone(), index);
        Ok(())
    }

    fn delete_course_index(&self, package_id: &str) -> Result<()> {
        let mut indexes = lock_write(&self.indexes)?;
        indexes.remove(package_id);
        Ok(())
    }

    fn get_structure(&self, id: StructureId) -> Result<Option<Structure>> {
        Ok(lock_read(&self.structures)?.get(&id).cloned())
    }

    fn find_matching_structures(&self, query: &Query) -> Result<Vec<Structure>> {
        let structures = lock_read(&self.structures)?;
        let mut out = Vec::new();
        for structure in structures.values() {
            let doc = err_at!(FailConvert, serde_json::to_value(structure))?;
            if QueryMatcher::matches(&doc, query) {
                out.push(structure.clone());
            }
        }
        Ok(out)
    }

    fn insert_structure(&self, structure: Structure) -> Result<()> {
        let mut structures = lock_write(&self.structures)?;
        if structures.contains_key(&structure.id) {
            return Err(Error::duplicate_item(structure.id.to_string()));
        }
        structures.insert(structure.id, structure);
        Ok(())
    }

    fn update_structure(&self, structure: Structure) -> Result<()> {
        let mut structures = lock_write(&self.structures)?;
        if !structures.contains_key(&structure.id) {
            return Err(Error::item_not_found(format!("structure {}", structure.id)));
        }
        structures.insert(structure.id, structure);
        Ok(())
    }

    fn get_definition(&self, id: DefinitionId) -> Result<Option<Definition>> {
        Ok(lock_read(&self.definitions)?.get(&id).cloned())
    }

    fn find_matching_definitions(&self, query: &Query) -> Result<Vec<Definition>> {
        let definitions = lock_read(&self.definitions)?;
        let mut out = Vec::new();
        for definition in definitions.values() {
            let doc = err_at!(FailConvert, serde_json::to_value(definition))?;
            if QueryMatcher::matches(&doc, query) {
                out.push(definition.clone());
            }
        }
        Ok(out)
    }

    fn insert_definition(&self, definition: Definition) -> Result<()> {
        let mut definitions = lock_write(&self.definitions)?;
        if definitions.contains_key(&definition.id) {
            return Err(Error::duplicate_item(definition.id.to_string()));
        }
        definitions.insert(definition.id, definition);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
