//! Cross-branch subtree publish with child-order reconciliation and
//! orphan reclamation.

use log::{debug, info};

use std::collections::HashSet;

use crate::{
    index_store::IndexStore,
    keys::KeyEncoder,
    locator::CourseLocator,
    model::{BlockEntry, Structure, StructureId},
    structure_store::StructureStore,
    store::DocumentConnector,
    Error, Result,
};

pub struct PublishRequest {
    pub source: CourseLocator,
    pub dest_package_id: String,
    pub dest_branch: String,
    pub subtree_roots: Vec<String>,
    pub blacklist: Vec<String>,
    pub publisher: String,
}

pub struct PublishEngine<'a, C: DocumentConnector> {
    connector: &'a C,
}

impl<'a, C: DocumentConnector> PublishEngine<'a, C> {
    pub fn new(connector: &'a C) -> PublishEngine<'a, C> {
        PublishEngine { connector }
    }

    /// Source resolution never forks or advances a head — publish only
    /// reads the source — so this is a narrower version of
    /// [VersioningCore::resolve](crate::versioning::VersioningCore::resolve).
    fn resolve_source(&self, locator: &CourseLocator) -> Result<Structure> {
        if !locator.is_fully_specified() {
            return Err(Error::insufficient_specification(
                "publish source locator requires package_id or version_guid",
            ));
        }
        let structure_id = match (&locator.package_id, &locator.branch) {
            (Some(package_id), Some(branch)) => {
                let index = IndexStore::new(self.connector).get(package_id)?;
                index
                    .head(branch)
                    .ok_or_else(|| Error::item_not_found(format!("branch {} of {}", branch, package_id)))?
            }
            _ => locator.version_guid.ok_or_else(|| {
                Error::insufficient_specification("version_guid required without a branch")
            })?,
        };
        StructureStore::new(self.connector).get(structure_id)
    }

    pub fn publish(&self, req: PublishRequest) -> Result<StructureId> {
        let source_structure = self.resolve_source(&req.source)?;

        // `subtree_roots`/`blacklist` are caller-supplied decoded block ids;
        // everything they're compared against (`Structure.blocks` keys,
        // `children` entries) is keyed by the encoded form.
        let subtree_roots: Vec<String> = req.subtree_roots.iter().map(|id| KeyEncoder::encode(id)).collect();
        let blacklist: Vec<String> = req.blacklist.iter().map(|id| KeyEncoder::encode(id)).collect();

        let index_store = IndexStore::new(self.connector);
        let mut index = index_store.get(&req.dest_package_id)?;
        let structure_store = StructureStore::new(self.connector);

        let dest_structure = match index.head(&req.dest_branch) {
            Some(head) => structure_store.get(head)?,
            None => {
                if !subtree_roots.contains(&source_structure.root) {
                    return Err(Error::item_not_found(format!(
                        "destination branch {} does not exist and source root {} is not in the publish set",
                        req.dest_branch, source_structure.root
                    )));
                }
                Structure::fresh(source_structure.root.clone(), req.publisher.clone())
            }
        };

        let mut target = structure_store.version_structure(&dest_structure, req.publisher.clone());
        let target_id = target.id;
        let mut orphans: HashSet<String> = HashSet::new();

        for root in &subtree_roots {
            for parent_id in source_structure.parents_of(root) {
                if !target.blocks.contains_key(&parent_id) {
                    return Err(Error::item_not_found(format!(
                        "parent {} of {} missing in destination",
                        parent_id, root
                    )));
                }
                let source_children = source_structure
                    .blocks
                    .get(&parent_id)
                    .map(|entry| entry.children.clone())
                    .unwrap_or_default();
                let dest_children = target
                    .blocks
                    .get(&parent_id)
                    .map(|entry| entry.children.clone())
                    .unwrap_or_default();

                let (reconciled, removed) = reconcile_children(&source_children, &dest_children, root);
                orphans.extend(removed);
                if let Some(entry) = target.blocks.get_mut(&parent_id) {
                    entry.children = reconciled;
                }
            }

            publish_subtree(
                &source_structure,
                &mut target,
                root,
                &blacklist,
                &req.publisher,
                &mut orphans,
            );
        }

        // Single post-pass: an orphan re-parented by another subtree in this
        // same publish is retained.
        let mut reclaimed = 0u32;
        for orphan in orphans {
            if target.parents_of(&orphan).is_empty() && target.root != orphan {
                target.remove_subtree(&orphan);
                reclaimed += 1;
            }
        }
        if reclaimed > 0 {
            info!(
                target: "publsh",
                "{}:{} reclaimed {} orphaned subtree(s) during publish",
                req.dest_package_id, req.dest_branch, reclaimed,
            );
        }

        // Publishing the same source/subtree/blacklist twice must be a
        // no-op: nothing in this pass touched any block, so don't
        // allocate a new revision.
        if target.blocks == dest_structure.blocks {
            debug!(
                target: "publsh",
                "{}:{} publish was a no-op, head unchanged at {}",
                req.dest_package_id, req.dest_branch, dest_structure.id,
            );
            return Ok(dest_structure.id);
        }

        structure_store.insert(target.clone())?;
        index.versions.insert(req.dest_branch.clone(), target_id);
        index_store.update(index)?;
        info!(
            target: "publsh",
            "{}:{} published {} subtree(s) from {:?}, head now {}",
            req.dest_package_id, req.dest_branch, req.subtree_roots.len(), req.source, target_id,
        );

        Ok(target_id)
    }
}

/// The resulting destination children list is the subsequence of `source`
/// consisting of ids equal to `root` or already present in `dest`. Entries
/// in `dest` absent from `source` are discarded and returned as orphans.
fn reconcile_children(source: &[String], dest: &[String], root: &str) -> (Vec<String>, Vec<String>) {
    let dest_set: HashSet<&String> = dest.iter().collect();
    let reconciled: Vec<String> = source
        .iter()
        .filter(|id| id.as_str() == root || dest_set.contains(id))
        .cloned()
        .collect();

    let reconciled_set: HashSet<&String> = reconciled.iter().collect();
    let removed: Vec<String> = dest
        .iter()
        .filter(|id| !reconciled_set.contains(id))
        .cloned()
        .collect();

    (reconciled, removed)
}

/// Recursive subtree publish.
fn publish_subtree(
    source: &Structure,
    dest: &mut Structure,
    block_id: &str,
    blacklist: &[String],
    publisher: &str,
    orphans: &mut HashSet<String>,
) {
    let source_entry = match source.blocks.get(block_id) {
        Some(entry) => entry.clone(),
        None => return,
    };

    let up_to_date = dest
        .blocks
        .get(block_id)
        .map_or(false, |entry| entry.edit_info.update_version == source_entry.edit_info.update_version);
    if up_to_date {
        return;
    }

    let filtered_children: Vec<String> = source_entry
        .children
        .iter()
        .filter(|child| !blacklist.contains(child))
        .cloned()
        .collect();

    if let Some(old_children) = dest.blocks.get(block_id).map(|entry| entry.children.clone()) {
        for child in old_children {
            if !source_entry.children.contains(&child) {
                orphans.insert(child);
            }
        }
    }

    // `update_version` is copied verbatim from the source, not re-stamped
    // with the destination structure's own id — it may point outside the
    // ancestor chain of the enclosing structure.
    let previous_version = dest.blocks.get(block_id).map(|entry| entry.edit_info.update_version);
    let mut new_entry: BlockEntry = source_entry.clone();
    new_entry.children = filtered_children;
    new_entry.edit_info = crate::model::EditInfo {
        edited_by: publisher.to_string(),
        edited_on: chrono::Utc::now(),
        update_version: source_entry.edit_info.update_version,
        previous_version,
    };
    dest.blocks.insert(block_id.to_string(), new_entry);

    for child in &source_entry.children {
        if !blacklist.contains(child) {
            publish_subtree(source, dest, child, blacklist, publisher, orphans);
        }
    }
}

#[cfg(test)]
#[path = "publish_test.rs"]
mod publish_test;
