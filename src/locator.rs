//! Opaque reference types naming a course and, optionally, a block or
//! definition.
//!
//! Parsing a URL-shaped string into one of these structs is a concern of
//! the caller, not this module; this module only defines the shapes every
//! other component consumes and the one predicate (`is_fully_specified`)
//! they all need.

use crate::model::StructureId;

/// Names a course: some combination of `package_id`, `branch`, and
/// `version_guid`. At least one of `package_id` or `version_guid` must be
/// present for [CourseLocator::is_fully_specified] to hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CourseLocator {
    pub package_id: Option<String>,
    pub branch: Option<String>,
    pub version_guid: Option<StructureId>,
}

impl CourseLocator {
    pub fn by_branch(package_id: impl Into<String>, branch: impl Into<String>) -> CourseLocator {
        CourseLocator {
            package_id: Some(package_id.into()),
            branch: Some(branch.into()),
            version_guid: None,
        }
    }

    pub fn by_version(version_guid: StructureId) -> CourseLocator {
        CourseLocator {
            package_id: None,
            branch: None,
            version_guid: Some(version_guid),
        }
    }

    pub fn with_version(mut self, version_guid: StructureId) -> CourseLocator {
        self.version_guid = Some(version_guid);
        self
    }

    pub fn is_fully_specified(&self) -> bool {
        self.package_id.is_some() || self.version_guid.is_some()
    }
}

/// A [CourseLocator] plus a block id within that course's structure.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockUsageLocator {
    pub course: CourseLocator,
    pub block_id: String,
}

impl BlockUsageLocator {
    pub fn new(course: CourseLocator, block_id: impl Into<String>) -> BlockUsageLocator {
        BlockUsageLocator {
            course,
            block_id: block_id.into(),
        }
    }

    pub fn is_fully_specified(&self) -> bool {
        self.course.is_fully_specified()
    }
}

/// Names one revision of a [Definition](crate::model::Definition) directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DefinitionLocator {
    pub definition_id: crate::model::DefinitionId,
    pub category: String,
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
