use serde::{Deserialize, Serialize};

use crate::model::{DefinitionId, EditInfo, Fields};

/// One node inside a [Structure](super::Structure).
///
/// `fields` holds settings-scope values only; content-scope values live in
/// the [Definition](super::Definition) pointed to by `definition`. The
/// children-scope field is hoisted into its own `children` vector rather
/// than left inside the generic `fields` bag, since every component in this
/// crate (publish reconciliation, inheritance traversal, orphan detection)
/// walks it directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub category: String,
    pub definition: DefinitionId,
    pub fields: Fields,
    pub children: Vec<String>,
    pub edit_info: EditInfo,
}

impl BlockEntry {
    pub fn new(category: impl Into<String>, definition: DefinitionId, edit_info: EditInfo) -> BlockEntry {
        BlockEntry {
            category: category.into(),
            definition,
            fields: Fields::new(),
            children: Vec::new(),
            edit_info,
        }
    }
}
