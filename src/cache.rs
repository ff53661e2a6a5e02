//! Per-request memoization of materialized block sets.
//!
//! A [DescriptorCache] maps a structure id to a [CachedContext]: the
//! structure document plus `module_data`, a `block_id -> BlockEntry`
//! dictionary walked to [StoreConfig::cache_depth] levels below the root.
//! Definitions load either eagerly (one `$in` query over every referenced
//! id, up front) or lazily (fetched and memoized the first time a caller
//! asks for a given block's definition).
//!
//! This cache has request lifetime and is never shared across requests —
//! a stateful cache shared between requests introduces coherence
//! obligations nobody wants to own — so it is keyed in ordinary
//! request-local state (`RefCell`, not the `RwLock`s
//! [crate::store::MemoryConnector] uses for state that really is shared
//! across concurrent callers).

use log::debug;
use serde_json::json;

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use crate::{
    config::StoreConfig,
    inheritance::InheritanceEngine,
    model::{BlockEntry, Definition, DefinitionId, Fields, Structure, StructureId},
    scope::BlockClassRegistry,
    store::{Criterion, DocumentConnector, Query},
    Error, Result,
};

enum DefinitionLoad {
    /// Every definition `module_data` references, bulk-read once.
    Eager(HashMap<DefinitionId, Definition>),
    /// Fetched and memoized the first time [DescriptorCache::definition_for]
    /// is asked for a given block: a placeholder until then, filled on
    /// first access.
    Lazy(RefCell<HashMap<DefinitionId, Definition>>),
}

/// One request's materialized view of a structure.
pub struct CachedContext {
    pub structure: Structure,
    pub module_data: HashMap<String, BlockEntry>,
    /// `block_id -> _inherited_settings`, computed top-down during
    /// materialization by [InheritanceEngine].
    pub inherited_settings: HashMap<String, Fields>,
    definitions: DefinitionLoad,
}

pub struct DescriptorCache<'a, C: DocumentConnector, R: BlockClassRegistry> {
    connector: &'a C,
    registry: &'a R,
    config: StoreConfig,
    entries: RefCell<HashMap<StructureId, CachedContext>>,
}

impl<'a, C: DocumentConnector, R: BlockClassRegistry> DescriptorCache<'a, C, R> {
    pub fn new(connector: &'a C, registry: &'a R, config: StoreConfig) -> DescriptorCache<'a, C, R> {
        DescriptorCache {
            connector,
            registry,
            config,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Return the cached context for `structure_id`, materializing it on
    /// first request this cache's lifetime.
    pub fn get_or_materialize(&self, structure_id: StructureId) -> Result<()> {
        if self.entries.borrow().contains_key(&structure_id) {
            return Ok(());
        }
        let structure = self
            .connector
            .get_structure(structure_id)?
            .ok_or_else(|| Error::item_not_found(format!("structure {}", structure_id)))?;
        let context = self.materialize(structure)?;
        self.entries.borrow_mut().insert(structure_id, context);
        Ok(())
    }

    fn materialize(&self, structure: Structure) -> Result<CachedContext> {
        let mut module_data = HashMap::new();
        let mut visited = HashSet::new();
        let mut frontier = vec![(structure.root.clone(), 0usize)];
        while let Some((block_id, depth)) = frontier.pop() {
            if depth > self.config.cache_depth || !visited.insert(block_id.clone()) {
                continue;
            }
            let entry = match structure.blocks.get(&block_id) {
                Some(entry) => entry,
                None => continue,
            };
            for child in &entry.children {
                frontier.push((child.clone(), depth + 1));
            }
            module_data.insert(block_id, entry.clone());
        }

        let inherited_settings = InheritanceEngine::new(self.registry).compute(&structure.root, &module_data);

        let definitions = if self.config.eager_definitions {
            DefinitionLoad::Eager(self.bulk_load_definitions(&module_data)?)
        } else {
            DefinitionLoad::Lazy(RefCell::new(HashMap::new()))
        };

        Ok(CachedContext {
            structure,
            module_data,
            inherited_settings,
            definitions,
        })
    }

    /// Call this after a write lands on `block_id`'s own fields while its
    /// structure is still cached, passing the field names that write
    /// touched. If any of them is inheritable for `block_id`'s category,
    /// `_inherited_settings` is recomputed for `block_id` and everything
    /// below it, in place, without re-walking the whole structure.
    pub fn refresh_inheritance<'n>(
        &self,
        structure_id: StructureId,
        block_id: &str,
        touched_fields: impl IntoIterator<Item = &'n str>,
    ) {
        let mut entries = self.entries.borrow_mut();
        let context = match entries.get_mut(&structure_id) {
            Some(context) => context,
            None => return,
        };
        let category = match context.module_data.get(block_id) {
            Some(entry) => entry.category.clone(),
            None => return,
        };
        let engine = InheritanceEngine::new(self.registry);
        if !engine.touches_inheritable(&category, touched_fields) {
            return;
        }
        engine.invalidate_subtree(block_id, &context.module_data, &mut context.inherited_settings);
    }

    /// One `_id ∈ set` query over every definition `module_data` references,
    /// bulk-reading every definition by id in one round trip.
    fn bulk_load_definitions(
        &self,
        module_data: &HashMap<String, BlockEntry>,
    ) -> Result<HashMap<DefinitionId, Definition>> {
        let ids: HashSet<DefinitionId> = module_data.values().map(|entry| entry.definition).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut query = Query::new();
        query.insert(
            "id".to_string(),
            Criterion::In(ids.iter().map(|id| json!(id.to_string())).collect()),
        );
        let found = self.connector.find_matching_definitions(&query)?;
        Ok(found.into_iter().map(|def| (def.id, def)).collect())
    }

    /// The definition backing `block_id` within this structure's cached
    /// context, loading it on first access under lazy mode.
    pub fn definition_for(&self, structure_id: StructureId, block_id: &str) -> Result<Definition> {
        self.get_or_materialize(structure_id)?;
        let entries = self.entries.borrow();
        let context = entries
            .get(&structure_id)
            .expect("just materialized above");
        let encoded = crate::keys::KeyEncoder::encode(block_id);
        let entry = context
            .module_data
            .get(&encoded)
            .ok_or_else(|| Error::item_not_found(format!("block {}", block_id)))?;
        let definition_id = entry.definition;

        match &context.definitions {
            DefinitionLoad::Eager(map) => map
                .get(&definition_id)
                .cloned()
                .ok_or_else(|| Error::item_not_found(format!("definition {}", definition_id))),
            DefinitionLoad::Lazy(memo) => {
                if let Some(found) = memo.borrow().get(&definition_id) {
                    return Ok(found.clone());
                }
                let definition = self
                    .connector
                    .get_definition(definition_id)?
                    .ok_or_else(|| Error::item_not_found(format!("definition {}", definition_id)))?;
                memo.borrow_mut().insert(definition_id, definition.clone());
                Ok(definition)
            }
        }
    }

    /// Explicit eviction on a `continue_version` write.
    pub fn evict(&self, structure_id: StructureId) {
        if self.entries.borrow_mut().remove(&structure_id).is_some() {
            debug!(target: "cache ", "evicted structure {}", structure_id);
        }
    }

    /// Request-boundary eviction: drops every cached context at once.
    pub fn clear(&self) {
        let mut entries = self.entries.borrow_mut();
        if !entries.is_empty() {
            debug!(target: "cache ", "request boundary: clearing {} cached structure(s)", entries.len());
        }
        entries.clear();
    }

    pub fn is_cached(&self, structure_id: StructureId) -> bool {
        self.entries.borrow().contains_key(&structure_id)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;
