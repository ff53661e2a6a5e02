//! Course-identity documents: `{branch -> head_structure_id}` maps plus
//! course-wide metadata.

use regex::Regex;

use crate::{
    model::{CourseIndex, StructureId},
    store::{Criterion, DocumentConnector, Query},
    Error, Result,
};

pub struct IndexStore<'a, C: DocumentConnector> {
    connector: &'a C,
}

impl<'a, C: DocumentConnector> IndexStore<'a, C> {
    pub fn new(connector: &'a C) -> IndexStore<'a, C> {
        IndexStore { connector }
    }

    pub fn get(&self, package_id: &str) -> Result<CourseIndex> {
        self.connector
            .get_course_index(package_id)?
            .ok_or_else(|| Error::item_not_found(format!("course {}", package_id)))
    }

    pub fn insert(&self, index: CourseIndex) -> Result<()> {
        self.connector.insert_course_index(index)
    }

    pub fn update(&self, index: CourseIndex) -> Result<()> {
        self.connector.update_course_index(index)
    }

    pub fn delete(&self, package_id: &str) -> Result<()> {
        self.connector.delete_course_index(package_id)
    }

    pub fn head(&self, package_id: &str, branch: &str) -> Result<StructureId> {
        let index = self.get(package_id)?;
        index
            .head(branch)
            .ok_or_else(|| Error::item_not_found(format!("branch {} of {}", branch, package_id)))
    }

    /// Strip to `id_root` (defaulting to `org`) and append the lowest decimal
    /// suffix making the id unique under `^<id_root>(\d+)?$`.
    pub fn allocate_package_id(&self, org: &str, id_root: Option<&str>) -> Result<String> {
        let id_root = id_root.unwrap_or(org);

        let pattern = format!("^{}(\\d+)?$", regex::escape(id_root));
        let matcher = err_at!(FailConvert, Regex::new(&pattern))?;

        let mut query = Query::new();
        query.insert("package_id".to_string(), Criterion::Regex(pattern.clone()));
        let existing = self.connector.find_matching_course_indexes(&query)?;

        if existing.is_empty() {
            return Ok(id_root.to_string());
        }

        let mut suffixes: Vec<u64> = existing
            .iter()
            .filter_map(|index| matcher.captures(&index.package_id))
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse::<u64>().ok())
            .collect();
        suffixes.sort_unstable();

        let mut n = 1u64;
        let taken_unsuffixed = existing.iter().any(|index| index.package_id == id_root);
        if !taken_unsuffixed {
            return Ok(id_root.to_string());
        }
        while suffixes.contains(&n) {
            n += 1;
        }
        Ok(format!("{}{}", id_root, n))
    }
}

#[cfg(test)]
#[path = "index_store_test.rs"]
mod index_store_test;
