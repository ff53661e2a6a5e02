use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

use crate::{
    model::{BlockEntry, StructureId},
    Error, Result,
};

/// An immutable snapshot of an entire block graph at one revision.
///
/// Immutable once inserted into a [StructureStore](crate::structure_store),
/// except during an in-flight "continue version" transaction. `blocks`
/// is keyed by the *encoded* block id (see [crate::keys]); every surface
/// API returns the decoded form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    pub root: String,
    pub previous_version: Option<StructureId>,
    pub original_version: StructureId,
    pub edited_by: String,
    pub edited_on: DateTime<Utc>,
    pub blocks: HashMap<String, BlockEntry>,
}

impl Structure {
    /// Build the first structure of a fresh content family: `original_version`
    /// equals `id`, `previous_version` is `None`.
    pub fn fresh(root: String, edited_by: impl Into<String>) -> Structure {
        let id = StructureId::new();
        Structure {
            id,
            root,
            previous_version: None,
            original_version: id,
            edited_by: edited_by.into(),
            edited_on: Utc::now(),
            blocks: HashMap::new(),
        }
    }

    pub fn root_block(&self) -> Result<&BlockEntry> {
        self.blocks
            .get(&self.root)
            .ok_or_else(|| Error::item_not_found(format!("root block {} missing", self.root)))
    }

    /// Find every block in `self.blocks` whose `children` lists `block_id`.
    pub fn parents_of(&self, block_id: &str) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|(_, entry)| entry.children.iter().any(|c| c == block_id))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Every key in `blocks` unreachable by traversal from `root`.
    pub fn orphans(&self) -> Vec<String> {
        let mut reachable = std::collections::HashSet::new();
        let mut stack = vec![self.root.clone()];
        while let Some(id) = stack.pop() {
            if !reachable.insert(id.clone()) {
                continue;
            }
            if let Some(entry) = self.blocks.get(&id) {
                for child in &entry.children {
                    if !reachable.contains(child) {
                        stack.push(child.clone());
                    }
                }
            }
        }
        self.blocks
            .keys()
            .filter(|id| !reachable.contains(*id))
            .cloned()
            .collect()
    }

    /// Remove `block_id` and every block reachable from it via `children`,
    /// regardless of whether they're still referenced elsewhere (callers
    /// are expected to have already unlinked `block_id` from its parents).
    pub fn remove_subtree(&mut self, block_id: &str) {
        if let Some(entry) = self.blocks.remove(block_id) {
            for child in entry.children {
                self.remove_subtree(&child);
            }
        }
    }

    /// Every `children` reference that does not resolve to a key in
    /// `blocks`: violated consistency is tolerated rather than rejected,
    /// and cleaned up lazily by whatever later reads it.
    pub fn dangling_children(&self) -> Vec<(String, String)> {
        self.blocks
            .iter()
            .flat_map(|(id, entry)| {
                entry
                    .children
                    .iter()
                    .filter(|c| !self.blocks.contains_key(*c))
                    .map(move |c| (id.clone(), c.clone()))
            })
            .collect()
    }
}
