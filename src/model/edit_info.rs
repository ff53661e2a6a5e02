use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::StructureId;

/// Who/when/where a [BlockEntry](super::BlockEntry)'s field values last changed.
///
/// `update_version` may point outside the enclosing [Structure](super::Structure)'s
/// ancestry: a block published from a draft branch records the draft's
/// structure id here, not a structure in the published branch's own history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditInfo {
    pub edited_by: String,
    pub edited_on: DateTime<Utc>,
    pub update_version: StructureId,
    pub previous_version: Option<StructureId>,
}

impl EditInfo {
    pub fn new(edited_by: impl Into<String>, update_version: StructureId) -> EditInfo {
        EditInfo {
            edited_by: edited_by.into(),
            edited_on: Utc::now(),
            update_version,
            previous_version: None,
        }
    }

    /// Record a fresh edit, carrying the prior `update_version` forward as
    /// `previous_version`.
    pub fn bump(&self, edited_by: impl Into<String>, update_version: StructureId) -> EditInfo {
        EditInfo {
            edited_by: edited_by.into(),
            edited_on: Utc::now(),
            update_version,
            previous_version: Some(self.update_version),
        }
    }
}
