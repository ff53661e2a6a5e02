use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::model::StructureId;

/// The mutable identity of a course.
///
/// `versions` is the *only* place branch heads live; every other component
/// treats it as the single source of truth for "what does branch `b` point
/// at right now".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CourseIndex {
    pub package_id: String,
    pub org: String,
    pub prettyid: String,
    pub edited_by: String,
    pub edited_on: DateTime<Utc>,
    pub versions: BTreeMap<String, StructureId>,
}

impl CourseIndex {
    pub fn new(
        package_id: impl Into<String>,
        org: impl Into<String>,
        edited_by: impl Into<String>,
    ) -> CourseIndex {
        let package_id = package_id.into();
        CourseIndex {
            prettyid: package_id.clone(),
            package_id,
            org: org.into(),
            edited_by: edited_by.into(),
            edited_on: Utc::now(),
            versions: BTreeMap::new(),
        }
    }

    pub fn head(&self, branch: &str) -> Option<StructureId> {
        self.versions.get(branch).copied()
    }
}
