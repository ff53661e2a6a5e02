//! Successor trees of structures and per-block change history.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::{
    locator::{BlockUsageLocator, CourseLocator},
    model::{DefinitionId, Structure, StructureId},
    store::{Criterion, DocumentConnector, Query},
    Error, Result,
};

/// Adjacency representation of a history subgraph.
#[derive(Debug, Default)]
pub struct VersionTree {
    pub root: StructureId,
    pub nodes: HashSet<StructureId>,
    pub edges: HashMap<StructureId, Vec<StructureId>>,
}

/// Same shape as [VersionTree], over `Definition` ids — used only by
/// [HistoryEngine::definition_successors].
#[derive(Debug, Default)]
pub struct DefinitionVersionTree {
    pub root: DefinitionId,
    pub nodes: HashSet<DefinitionId>,
    pub edges: HashMap<DefinitionId, Vec<DefinitionId>>,
}

pub struct HistoryEngine<'a, C: DocumentConnector> {
    connector: &'a C,
}

impl<'a, C: DocumentConnector> HistoryEngine<'a, C> {
    pub fn new(connector: &'a C) -> HistoryEngine<'a, C> {
        HistoryEngine { connector }
    }

    fn resolve(&self, locator: &CourseLocator) -> Result<Structure> {
        if !locator.is_fully_specified() {
            return Err(Error::insufficient_specification(
                "history locator requires package_id or version_guid",
            ));
        }
        let structure_id = match (&locator.package_id, &locator.branch) {
            (Some(package_id), Some(branch)) => {
                let index = crate::index_store::IndexStore::new(self.connector).get(package_id)?;
                index
                    .head(branch)
                    .ok_or_else(|| Error::item_not_found(format!("branch {} of {}", branch, package_id)))?
            }
            _ => locator.version_guid.ok_or_else(|| {
                Error::insufficient_specification("version_guid required without a branch")
            })?,
        };
        crate::structure_store::StructureStore::new(self.connector).get(structure_id)
    }

    /// BFS over structures with `previous_version ∈ frontier`, `depth` levels
    /// deep.
    pub fn course_successors(&self, locator: &CourseLocator, depth: usize) -> Result<VersionTree> {
        let start = self.resolve(locator)?;
        let mut tree = VersionTree {
            root: start.id,
            nodes: HashSet::new(),
            edges: HashMap::new(),
        };
        tree.nodes.insert(start.id);

        let mut frontier = vec![start.id];
        for _ in 0..depth {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for id in &frontier {
                let mut query = Query::new();
                query.insert("previous_version".to_string(), Criterion::Eq(json!(id.to_string())));
                for successor in self.connector.find_matching_structures(&query)? {
                    tree.edges.entry(*id).or_default().push(successor.id);
                    tree.nodes.insert(successor.id);
                    next_frontier.push(successor.id);
                }
            }
            frontier = next_frontier;
        }
        Ok(tree)
    }

    /// Same BFS-over-`previous_version` shape as
    /// [course_successors](HistoryEngine::course_successors), operating on
    /// the `Definition` collection instead of `Structure`.
    pub fn definition_successors(&self, definition_id: DefinitionId, depth: usize) -> Result<DefinitionVersionTree> {
        let mut tree = DefinitionVersionTree {
            root: definition_id,
            nodes: HashSet::new(),
            edges: HashMap::new(),
        };
        tree.nodes.insert(definition_id);

        let mut frontier = vec![definition_id];
        for _ in 0..depth {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for id in &frontier {
                let mut query = Query::new();
                query.insert("previous_version".to_string(), Criterion::Eq(json!(id.to_string())));
                for successor in self.connector.find_matching_definitions(&query)? {
                    tree.edges.entry(*id).or_default().push(successor.id);
                    tree.nodes.insert(successor.id);
                    next_frontier.push(successor.id);
                }
            }
            frontier = next_frontier;
        }
        Ok(tree)
    }

    /// Find all structures sharing `original_version` with the structure
    /// the locator resolves to that still mention this block; group by
    /// `update_version`.
    pub fn block_generations(&self, locator: &BlockUsageLocator) -> Result<VersionTree> {
        let start = self.resolve(&locator.course)?;
        let block_id = crate::keys::KeyEncoder::encode(&locator.block_id);
        let starting_entry = start
            .blocks
            .get(&block_id)
            .ok_or_else(|| Error::item_not_found(format!("block {}", locator.block_id)))?
            .clone();

        let mut query = Query::new();
        query.insert(
            "original_version".to_string(),
            Criterion::Eq(json!(start.original_version.to_string())),
        );
        let family = self.connector.find_matching_structures(&query)?;

        let mut update_versions: HashSet<StructureId> = HashSet::new();
        let mut previous_of: HashMap<StructureId, Option<StructureId>> = HashMap::new();

        for structure in &family {
            if let Some(entry) = structure.blocks.get(&block_id) {
                let update_version = entry.edit_info.update_version;
                update_versions.insert(update_version);
                previous_of.insert(update_version, entry.edit_info.previous_version);
            }
        }

        let mut edges: HashMap<StructureId, Vec<StructureId>> = HashMap::new();
        let mut roots = Vec::new();
        for (update_version, previous) in &previous_of {
            match previous {
                Some(prev) => edges.entry(*prev).or_default().push(*update_version),
                None => roots.push(*update_version),
            }
        }

        let root = match roots.len() {
            0 => return Err(Error::item_not_found("no root generation found for block")),
            1 => roots[0],
            _ => {
                let target = starting_entry.edit_info.update_version;
                roots.sort();
                roots
                    .into_iter()
                    .filter_map(|candidate| segment_distance(&edges, candidate, target).map(|dist| (dist, candidate)))
                    .min()
                    .map(|(_, candidate)| candidate)
                    .ok_or_else(|| Error::item_not_found("ambiguous block history: no root segment contains the starting version"))?
            }
        };

        Ok(VersionTree {
            root,
            nodes: update_versions,
            edges,
        })
    }
}

/// Shortest number of edges from `root` to `target` within `edges`, or
/// `None` if `target` isn't reachable from `root`.
fn segment_distance(edges: &HashMap<StructureId, Vec<StructureId>>, root: StructureId, target: StructureId) -> Option<usize> {
    let mut frontier = vec![root];
    let mut seen = HashSet::new();
    seen.insert(root);
    let mut distance = 0;
    loop {
        if frontier.iter().any(|id| *id == target) {
            return Some(distance);
        }
        let mut next_frontier = Vec::new();
        for id in &frontier {
            if let Some(children) = edges.get(id) {
                for child in children {
                    if seen.insert(*child) {
                        next_frontier.push(*child);
                    }
                }
            }
        }
        if next_frontier.is_empty() {
            return None;
        }
        frontier = next_frontier;
        distance += 1;
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;
