//! Typed access to the three document collections (indexes, structures,
//! definitions), plus the in-memory predicate matcher used by
//! `find_matching_*`.
//!
//! The document-store driver is an external collaborator: a real
//! deployment would back [DocumentConnector] with whatever store the
//! surrounding system already runs. This crate ships [MemoryConnector],
//! an in-process implementation sufficient to exercise and test the
//! versioning engine end to end, and treats the trait as the seam a real
//! backing store would plug into.

mod memory;
mod query;

pub use memory::MemoryConnector;
pub use query::{Criterion, Query, QueryMatcher};

use crate::{
    model::{CourseIndex, Definition, DefinitionId, Structure, StructureId},
    Result,
};

/// Three named collections, each atomic per-document: no multi-document
/// transactions, and nothing in this crate depends on them.
pub trait DocumentConnector {
    fn get_course_index(&self, package_id: &str) -> Result<Option<CourseIndex>>;
    fn find_matching_course_indexes(&self, query: &Query) -> Result<Vec<CourseIndex>>;
    fn insert_course_index(&self, index: CourseIndex) -> Result<()>;
    fn update_course_index(&self, index: CourseIndex) -> Result<()>;
    fn delete_course_index(&self, package_id: &str) -> Result<()>;

    fn get_structure(&self, id: StructureId) -> Result<Option<Structure>>;
    fn find_matching_structures(&self, query: &Query) -> Result<Vec<Structure>>;
    fn insert_structure(&self, structure: Structure) -> Result<()>;
    fn update_structure(&self, structure: Structure) -> Result<()>;

    fn get_definition(&self, id: DefinitionId) -> Result<Option<Definition>>;
    fn find_matching_definitions(&self, query: &Query) -> Result<Vec<Definition>>;
    fn insert_definition(&self, definition: Definition) -> Result<()>;
}
