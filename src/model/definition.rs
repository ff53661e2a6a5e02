use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DefinitionId, Fields};

/// Revisioned content payload shared across structures and branches.
///
/// Two definitions with equal `original_version` descend from a common
/// ancestor; `previous_version` is `None` only for the first revision of a
/// content family.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Definition {
    pub id: DefinitionId,
    pub category: String,
    pub fields: Fields,
    pub edited_by: String,
    pub edited_on: DateTime<Utc>,
    pub previous_version: Option<DefinitionId>,
    pub original_version: DefinitionId,
}

impl Definition {
    pub fn fresh(category: impl Into<String>, fields: Fields, edited_by: impl Into<String>) -> Definition {
        let id = DefinitionId::new();
        Definition {
            id,
            category: category.into(),
            fields,
            edited_by: edited_by.into(),
            edited_on: Utc::now(),
            previous_version: None,
            original_version: id,
        }
    }

    /// Derive the next revision of this definition, sharing `original_version`.
    pub fn revise(&self, fields: Fields, edited_by: impl Into<String>) -> Definition {
        Definition {
            id: DefinitionId::new(),
            category: self.category.clone(),
            fields,
            edited_by: edited_by.into(),
            edited_on: Utc::now(),
            previous_version: Some(self.id),
            original_version: self.original_version,
        }
    }
}
