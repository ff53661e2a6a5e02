//! Orchestrates index + structure + definition updates for create/update/
//! delete of blocks and courses; enforces head-version optimistic
//! concurrency.

use log::{info, warn};

use std::collections::{BTreeMap, HashSet};

use crate::{
    cache::DescriptorCache,
    config::StoreConfig,
    definition_store::DefinitionStore,
    index_store::IndexStore,
    keys::KeyEncoder,
    locator::CourseLocator,
    model::{BlockEntry, CourseIndex, DefinitionId, EditInfo, Fields, Structure, StructureId},
    scope::{BlockClassRegistry, FieldScope},
    structure_store::StructureStore,
    store::DocumentConnector,
    Error, Result,
};

/// Result of resolving a [CourseLocator] against the live index/structure
/// state: folds `lookup` and `head_check` together since every caller
/// needs both.
pub struct Lookup {
    pub index: Option<CourseIndex>,
    pub structure: Structure,
    pub branch: Option<String>,
    /// Whether a successful write through this lookup should advance
    /// `index.versions[branch]`. False for forced forks and for
    /// locators resolved purely by `version_guid`.
    pub advance_head: bool,
}

pub struct ItemDescriptor {
    pub course: CourseLocator,
    pub structure_id: StructureId,
    pub block_id: String,
}

pub struct CreateItemRequest {
    pub course: CourseLocator,
    pub parent_block_id: Option<String>,
    pub block_id: Option<String>,
    pub category: String,
    pub definition_id: Option<DefinitionId>,
    pub fields: Fields,
    pub user: String,
    pub force: bool,
    pub continue_version: bool,
}

pub struct UpdateItemRequest {
    pub course: CourseLocator,
    pub block_id: String,
    pub fields: Option<Fields>,
    pub children: Option<Vec<String>>,
    pub user: String,
    pub force: bool,
    pub continue_version: bool,
}

pub struct DeleteItemRequest {
    pub course: CourseLocator,
    pub block_id: String,
    pub delete_children: bool,
    pub user: String,
    pub force: bool,
}

pub enum CreateCourseMode {
    Fresh {
        root_category: String,
        root_fields: Fields,
    },
    CloneNoOverride {
        source: StructureId,
    },
    CloneWithOverride {
        source: StructureId,
        root_fields: Fields,
    },
}

pub struct CreateCourseRequest {
    pub org: String,
    pub id_root: Option<String>,
    pub user: String,
    pub master_branch: String,
    pub mode: CreateCourseMode,
    /// Recovery path: reuse historical structures directly instead of
    /// building a fresh one.
    pub versions_dict: Option<BTreeMap<String, StructureId>>,
}

pub struct VersioningCore<'a, C: DocumentConnector, R: BlockClassRegistry> {
    connector: &'a C,
    registry: &'a R,
    /// The request-scoped descriptor cache, if the caller is running one.
    /// On a `continue_version` commit, the per-request cache entry for
    /// that structure id is evicted. `None` is a perfectly valid caller —
    /// nothing in this module requires a cache to exist.
    cache: Option<&'a DescriptorCache<'a, C, R>>,
    config: StoreConfig,
}

impl<'a, C: DocumentConnector, R: BlockClassRegistry> VersioningCore<'a, C, R> {
    pub fn new(connector: &'a C, registry: &'a R) -> VersioningCore<'a, C, R> {
        VersioningCore {
            connector,
            registry,
            cache: None,
            config: StoreConfig::default(),
        }
    }

    pub fn with_cache(mut self, cache: &'a DescriptorCache<'a, C, R>) -> VersioningCore<'a, C, R> {
        self.cache = Some(cache);
        self
    }

    pub fn with_config(mut self, config: StoreConfig) -> VersioningCore<'a, C, R> {
        self.config = config;
        self
    }

    /// Validates acyclicity on writes that alter `children`. Off by
    /// default ([StoreConfig::validate_acyclic]); when on, rejects a
    /// `children` write that would let `block_id` reach itself through
    /// its own descendants.
    fn check_acyclic(&self, target: &Structure, block_id: &str) -> Result<()> {
        if !self.config.validate_acyclic {
            return Ok(());
        }
        let mut stack: Vec<String> = target
            .blocks
            .get(block_id)
            .map(|entry| entry.children.clone())
            .unwrap_or_default();
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == block_id {
                return Err(Error::illegal_argument(format!(
                    "children write on {} would introduce a cycle",
                    block_id
                )));
            }
            if !visited.insert(id.clone()) {
                continue;
            }
            if let Some(entry) = target.blocks.get(&id) {
                stack.extend(entry.children.iter().cloned());
            }
        }
        Ok(())
    }

    /// Resolve a locator, returning the structure to operate on and
    /// whether a commit through it should advance a branch head.
    pub fn resolve(&self, locator: &CourseLocator, force: bool) -> Result<Lookup> {
        if !locator.is_fully_specified() {
            return Err(Error::insufficient_specification(
                "locator requires package_id or version_guid",
            ));
        }

        match (&locator.package_id, &locator.branch) {
            (Some(package_id), Some(branch)) => {
                let index = IndexStore::new(self.connector).get(package_id)?;
                let head = index.head(branch).ok_or_else(|| {
                    Error::item_not_found(format!("branch {} of {}", branch, package_id))
                })?;

                let (structure_id, advance_head) = match locator.version_guid {
                    Some(version_guid) if version_guid != head => {
                        if force {
                            info!(
                                target: "versng",
                                "{}:{} forced fork off {} (head is {})",
                                package_id, branch, version_guid, head,
                            );
                            (version_guid, false)
                        } else {
                            warn!(
                                target: "versng",
                                "{}:{} version conflict: caller had {}, head is {}",
                                package_id, branch, version_guid, head,
                            );
                            return Err(Error::version_conflict(
                                format!("{}:{}", package_id, branch),
                                head,
                            ));
                        }
                    }
                    _ => (head, true),
                };

                let structure = StructureStore::new(self.connector).get(structure_id)?;
                Ok(Lookup {
                    index: Some(index),
                    structure,
                    branch: Some(branch.clone()),
                    advance_head,
                })
            }
            _ => {
                let version_guid = locator.version_guid.ok_or_else(|| {
                    Error::insufficient_specification("version_guid required without a branch")
                })?;
                let structure = StructureStore::new(self.connector).get(version_guid)?;
                let index = match &locator.package_id {
                    Some(package_id) => Some(IndexStore::new(self.connector).get(package_id)?),
                    None => None,
                };
                Ok(Lookup {
                    index,
                    structure,
                    branch: locator.branch.clone(),
                    advance_head: false,
                })
            }
        }
    }

    /// `force` and `continue_version` are mutually exclusive.
    pub fn head_check(
        &self,
        locator: &CourseLocator,
        force: bool,
        continue_version: bool,
    ) -> Result<Lookup> {
        if force && continue_version {
            return Err(Error::illegal_argument(
                "force and continue_version are mutually exclusive",
            ));
        }
        self.resolve(locator, force)
    }

    /// Splits a caller-supplied field map by scope. The `children` slot is
    /// `None` when `fields` carries no children-scope entry at all, so
    /// callers can tell "not supplied" apart from "supplied as empty".
    fn partition_fields(&self, category: &str, fields: Fields) -> (Fields, Fields, Option<Vec<String>>) {
        let mut content = Fields::new();
        let mut settings = Fields::new();
        let mut children = None;

        for (name, value) in fields {
            match self.registry.scope_of(category, &name) {
                FieldScope::Content => {
                    content.insert(name, value);
                }
                FieldScope::Children => {
                    if let Some(list) = value.as_array() {
                        children = Some(
                            list.iter()
                                .filter_map(|v| v.as_str().map(KeyEncoder::encode))
                                .collect(),
                        );
                    }
                }
                FieldScope::Settings | FieldScope::Other => {
                    settings.insert(name, value);
                }
            }
        }
        (content, settings, children)
    }

    /// Commit a structure honoring the "continue version" relaxation: a
    /// structure already mutated once this request is updated in place;
    /// otherwise it's a fresh insert.
    fn commit_structure(&self, structure: Structure, continue_version: bool) -> Result<()> {
        let structure_store = StructureStore::new(self.connector);
        if continue_version {
            let structure_id = structure.id;
            let result = match structure_store.update(structure.clone()) {
                Ok(()) => Ok(()),
                Err(Error::ItemNotFound(_)) => structure_store.insert(structure),
                Err(err) => Err(err),
            };
            if result.is_ok() {
                if let Some(cache) = self.cache {
                    cache.evict(structure_id);
                }
            }
            result
        } else {
            structure_store.insert(structure)
        }
    }

    fn advance_head(&self, lookup: Lookup, new_head: StructureId) -> Result<()> {
        if !lookup.advance_head {
            return Ok(());
        }
        if let (Some(mut index), Some(branch)) = (lookup.index, lookup.branch) {
            let package_id = index.package_id.clone();
            index.versions.insert(branch.clone(), new_head);
            IndexStore::new(self.connector).update(index)?;
            info!(target: "versng", "{}:{} head advanced to {}", package_id, branch, new_head);
        }
        Ok(())
    }

    pub fn create_item(&self, req: CreateItemRequest) -> Result<ItemDescriptor> {
        let lookup = self.head_check(&req.course, req.force, req.continue_version)?;
        let structure = lookup.structure.clone();

        let (content_fields, settings_fields, children) =
            self.partition_fields(&req.category, req.fields);
        let children = children.unwrap_or_default();

        let definition_store = DefinitionStore::new(self.connector);
        let definition_id = match req.definition_id {
            None => definition_store.create(content_fields, req.category.clone(), req.user.clone())?,
            Some(id) if !content_fields.is_empty() => {
                let (new_id, _changed) = definition_store.update(id, content_fields, req.user.clone())?;
                new_id
            }
            Some(id) => id,
        };

        let structure_store = StructureStore::new(self.connector);
        let mut target = if req.continue_version {
            structure
        } else {
            structure_store.version_structure(&structure, req.user.clone())
        };
        let target_id = target.id;

        // `blocks` is keyed by encoded block id; every caller-supplied or
        // cross-referenced id is encoded before it touches the map, and
        // decoded again only in the returned descriptor.
        let block_id = match req.block_id.as_deref().map(KeyEncoder::encode) {
            Some(id) if target.blocks.contains_key(&id) => return Err(Error::duplicate_item(KeyEncoder::decode(&id))),
            Some(id) => id,
            None => StructureStore::<C>::allocate_block_id(&target, &req.category),
        };

        let mut entry = BlockEntry::new(req.category, definition_id, EditInfo::new(req.user.clone(), target_id));
        entry.fields = settings_fields;
        entry.children = children;
        target.blocks.insert(block_id.clone(), entry);
        self.check_acyclic(&target, &block_id)?;

        if let Some(parent_id) = req.parent_block_id.as_deref().map(KeyEncoder::encode) {
            let parent = target
                .blocks
                .get_mut(&parent_id)
                .ok_or_else(|| Error::item_not_found(format!("parent block {}", KeyEncoder::decode(&parent_id))))?;
            parent.children.push(block_id.clone());
            if !(req.continue_version && parent.edit_info.update_version == target_id) {
                parent.edit_info = parent.edit_info.bump(req.user.clone(), target_id);
            }
        }

        self.commit_structure(target.clone(), req.continue_version)?;
        self.advance_head(lookup, target_id)?;

        Ok(ItemDescriptor {
            course: req.course,
            structure_id: target_id,
            block_id: KeyEncoder::decode(&block_id),
        })
    }

    /// Gated by a "did anything actually change?" test so idempotent
    /// updates never allocate a new Structure or Definition. A partial
    /// update (only `fields` or only `children` supplied) merges onto
    /// the existing block rather than replacing it wholesale: settings
    /// keys absent from the supplied map keep their current value, and
    /// `children` is left untouched unless the caller passes `children`
    /// directly or includes a children-scope field in `fields`.
    pub fn update_item(&self, req: UpdateItemRequest) -> Result<ItemDescriptor> {
        let lookup = self.head_check(&req.course, req.force, req.continue_version)?;
        let structure = lookup.structure.clone();
        let block_id = KeyEncoder::encode(&req.block_id);

        let existing = structure
            .blocks
            .get(&block_id)
            .ok_or_else(|| Error::item_not_found(format!("block {}", req.block_id)))?
            .clone();

        let (content_fields, settings_fields, children_from_fields) = match req.fields {
            Some(fields) => {
                let (content, new_settings, children) = self.partition_fields(&existing.category, fields);
                let mut settings_fields = existing.fields.clone();
                settings_fields.extend(new_settings);
                (content, settings_fields, children)
            }
            None => (Fields::new(), existing.fields.clone(), None),
        };
        let new_children = req
            .children
            .map(|list| list.iter().map(|id| KeyEncoder::encode(id)).collect())
            .or(children_from_fields)
            .unwrap_or_else(|| existing.children.clone());

        let definition_store = DefinitionStore::new(self.connector);
        let (definition_id, definition_changed) = if content_fields.is_empty() {
            (existing.definition, false)
        } else {
            definition_store.update(existing.definition, content_fields, req.user.clone())?
        };

        let settings_changed = settings_fields != existing.fields;
        let children_changed = new_children != existing.children;

        if !definition_changed && !settings_changed && !children_changed {
            return Ok(ItemDescriptor {
                course: req.course,
                structure_id: structure.id,
                block_id: req.block_id,
            });
        }

        let structure_store = StructureStore::new(self.connector);
        let mut target = if req.continue_version {
            structure
        } else {
            structure_store.version_structure(&structure, req.user.clone())
        };
        let target_id = target.id;

        let entry = target
            .blocks
            .get_mut(&block_id)
            .expect("block present in cloned structure");
        entry.definition = definition_id;
        entry.fields = settings_fields;
        entry.children = new_children;
        entry.edit_info = entry.edit_info.bump(req.user.clone(), target_id);
        self.check_acyclic(&target, &block_id)?;

        self.commit_structure(target.clone(), req.continue_version)?;
        self.advance_head(lookup, target_id)?;

        Ok(ItemDescriptor {
            course: req.course,
            structure_id: target_id,
            block_id: req.block_id,
        })
    }

    /// Rejects deletion of the structure root.
    pub fn delete_item(&self, req: DeleteItemRequest) -> Result<StructureId> {
        let lookup = self.head_check(&req.course, req.force, false)?;
        let structure = lookup.structure.clone();
        let block_id = KeyEncoder::encode(&req.block_id);

        if structure.root == block_id {
            return Err(Error::illegal_argument("cannot delete the structure root"));
        }

        let structure_store = StructureStore::new(self.connector);
        let mut target = structure_store.version_structure(&structure, req.user.clone());
        let target_id = target.id;

        for parent_id in structure.parents_of(&block_id) {
            if let Some(parent) = target.blocks.get_mut(&parent_id) {
                parent.children.retain(|child| child != &block_id);
                parent.edit_info = parent.edit_info.bump(req.user.clone(), target_id);
            }
        }

        if req.delete_children {
            target.remove_subtree(&block_id);
        } else {
            target.blocks.remove(&block_id);
        }

        structure_store.insert(target.clone())?;
        self.advance_head(lookup, target_id)?;

        Ok(target_id)
    }

    /// Three modes: fresh, clone-with-no-override, and clone-with-override.
    /// `versions_dict` bypasses all three to recover a course from
    /// historical structures directly, reusing their ids as-is.
    pub fn create_course(&self, req: CreateCourseRequest) -> Result<String> {
        let index_store = IndexStore::new(self.connector);
        let package_id = index_store.allocate_package_id(&req.org, req.id_root.as_deref())?;
        let mut index = CourseIndex::new(package_id.clone(), req.org.clone(), req.user.clone());

        if let Some(versions) = req.versions_dict {
            index.versions = versions;
            index_store.insert(index)?;
            return Ok(package_id);
        }

        let structure_id = match req.mode {
            CreateCourseMode::Fresh {
                root_category,
                root_fields,
            } => {
                let (content, settings, children) = self.partition_fields(&root_category, root_fields);
                let definition_id =
                    DefinitionStore::new(self.connector).create(content, root_category.clone(), req.user.clone())?;

                let mut structure = Structure::fresh("course".to_string(), req.user.clone());
                let mut entry = BlockEntry::new(root_category, definition_id, EditInfo::new(req.user.clone(), structure.id));
                entry.fields = settings;
                entry.children = children.unwrap_or_default();
                structure.blocks.insert("course".to_string(), entry);

                let structure_id = structure.id;
                StructureStore::new(self.connector).insert(structure)?;
                structure_id
            }
            CreateCourseMode::CloneNoOverride { source } => source,
            CreateCourseMode::CloneWithOverride { source, root_fields } => {
                let structure_store = StructureStore::new(self.connector);
                let source_structure = structure_store.get(source)?;
                let mut target = structure_store.version_structure(&source_structure, req.user.clone());
                let target_id = target.id;
                let root_id = target.root.clone();
                let category = target.root_block()?.category.clone();
                let existing_definition = target.root_block()?.definition;

                let (content, settings, children) = self.partition_fields(&category, root_fields);
                let definition_id = if content.is_empty() {
                    existing_definition
                } else {
                    let (new_id, _changed) =
                        DefinitionStore::new(self.connector).update(existing_definition, content, req.user.clone())?;
                    new_id
                };

                let entry = target
                    .blocks
                    .get_mut(&root_id)
                    .expect("root block present in versioned copy");
                entry.definition = definition_id;
                if !settings.is_empty() {
                    entry.fields = settings;
                }
                if let Some(children) = children {
                    entry.children = children;
                }
                entry.edit_info = entry.edit_info.bump(req.user.clone(), target_id);

                structure_store.insert(target)?;
                target_id
            }
        };

        index.versions.insert(req.master_branch, structure_id);
        index_store.insert(index)?;
        Ok(package_id)
    }

    /// Removes only the Index entry; historical Structures/Definitions
    /// remain recoverable via `create_course(versions_dict=...)`.
    pub fn delete_course(&self, package_id: &str) -> Result<()> {
        IndexStore::new(self.connector).delete(package_id)
    }
}

#[cfg(test)]
#[path = "versioning_test.rs"]
mod versioning_test;
