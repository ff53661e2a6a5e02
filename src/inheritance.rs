//! Propagates inheritable fields top-down through a materialized block set.
//!
//! Each block's `_inherited_settings` is the nearest ancestor's own value
//! for every field an external [BlockClassRegistry](crate::scope::BlockClassRegistry)
//! designates inheritable; a block's own `fields` always win over whatever
//! it inherited, and that combined map is what gets handed further down.
//! Recursion descends only via `children`; a child id absent from the
//! materialized block set is skipped rather than treated as an error.

use std::collections::{HashMap, HashSet};

use crate::{
    model::{BlockEntry, Fields},
    scope::BlockClassRegistry,
};

pub struct InheritanceEngine<'a, R: BlockClassRegistry> {
    registry: &'a R,
}

impl<'a, R: BlockClassRegistry> InheritanceEngine<'a, R> {
    pub fn new(registry: &'a R) -> InheritanceEngine<'a, R> {
        InheritanceEngine { registry }
    }

    /// Walk `blocks` from `root_id`, returning every reached block's
    /// `_inherited_settings`. The root itself inherits nothing, since it
    /// has no parent.
    pub fn compute(&self, root_id: &str, blocks: &HashMap<String, BlockEntry>) -> HashMap<String, Fields> {
        let mut out = HashMap::new();
        let mut visited = HashSet::new();
        self.recurse(root_id, &Fields::new(), blocks, &mut out, &mut visited);
        out
    }

    fn recurse(
        &self,
        block_id: &str,
        incoming: &Fields,
        blocks: &HashMap<String, BlockEntry>,
        out: &mut HashMap<String, Fields>,
        visited: &mut HashSet<String>,
    ) {
        if !visited.insert(block_id.to_string()) {
            return;
        }
        let entry = match blocks.get(block_id) {
            Some(entry) => entry,
            None => return,
        };
        out.insert(block_id.to_string(), incoming.clone());

        let mut passed_down = incoming.clone();
        for (name, value) in &entry.fields {
            if self.registry.is_inheritable(&entry.category, name) {
                passed_down.insert(name.clone(), value.clone());
            }
        }

        for child in &entry.children {
            self.recurse(child, &passed_down, blocks, out, visited);
        }
    }

    /// Recompute `_inherited_settings` for `block_id` and everything below
    /// it in `cache`, in place, without re-walking the whole structure.
    /// Call this whenever a write touches one of `block_id`'s own fields
    /// and at least one touched name is inheritable — `block_id`'s own
    /// inherited value is unaffected by its own field write (it only
    /// depends on ancestors), so it's read back out of the existing cache
    /// entry and used as the base for the subtree walk.
    pub fn invalidate_subtree(
        &self,
        block_id: &str,
        blocks: &HashMap<String, BlockEntry>,
        cache: &mut HashMap<String, Fields>,
    ) {
        let incoming = cache.get(block_id).cloned().unwrap_or_default();
        let mut visited = HashSet::new();
        self.recurse(block_id, &incoming, blocks, cache, &mut visited);
    }

    /// Whether any of `field_names` is inheritable for `category` — the
    /// trigger condition for [InheritanceEngine::invalidate_subtree].
    pub fn touches_inheritable<'n>(&self, category: &str, field_names: impl IntoIterator<Item = &'n str>) -> bool {
        field_names
            .into_iter()
            .any(|name| self.registry.is_inheritable(category, name))
    }
}

#[cfg(test)]
#[path = "inheritance_test.rs"]
mod inheritance_test;
