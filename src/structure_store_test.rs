use super::*;
use crate::{
    model::{BlockEntry, EditInfo},
    store::MemoryConnector,
};

fn course_structure() -> Structure {
    let mut structure = Structure::fresh("course".to_string(), "user1");
    let entry = BlockEntry::new(
        "course",
        crate::model::DefinitionId::new(),
        EditInfo::new("user1", structure.id),
    );
    structure.blocks.insert("course".to_string(), entry);
    structure
}

#[test]
fn test_version_structure_copies_with_new_id() {
    let connector = MemoryConnector::new();
    let store = StructureStore::new(&connector);
    let original = course_structure();

    let versioned = store.version_structure(&original, "user2");
    assert_ne!(versioned.id, original.id);
    assert_eq!(versioned.previous_version, Some(original.id));
    assert_eq!(versioned.blocks.len(), original.blocks.len());
    assert_eq!(versioned.edited_by, "user2");
}

#[test]
fn test_allocate_block_id_picks_lowest_unused_suffix() {
    let mut structure = course_structure();
    let first = StructureStore::<MemoryConnector>::allocate_block_id(&structure, "chapter");
    assert_eq!(first, "chapter1");

    structure.blocks.insert(
        first,
        BlockEntry::new(
            "chapter",
            crate::model::DefinitionId::new(),
            EditInfo::new("user1", structure.id),
        ),
    );
    let second = StructureStore::<MemoryConnector>::allocate_block_id(&structure, "chapter");
    assert_eq!(second, "chapter2");
}

#[test]
fn test_get_missing_structure_fails() {
    let connector = MemoryConnector::new();
    let store = StructureStore::new(&connector);
    let err = store.get(crate::model::StructureId::new()).unwrap_err();
    assert!(matches!(err, Error::ItemNotFound(_)));
}
