use super::*;
use crate::{
    index_store::IndexStore,
    scope::StaticRegistry,
    structure_store::StructureStore,
    versioning::{CreateCourseMode, CreateCourseRequest, CreateItemRequest, VersioningCore},
};

fn registry() -> StaticRegistry {
    StaticRegistry::new()
}

fn setup_course(core: &VersioningCore<MemoryConnector, StaticRegistry>) -> String {
    let package_id = core
        .create_course(CreateCourseRequest {
            org: "U".to_string(),
            id_root: Some("U.D.C".to_string()),
            user: "author".to_string(),
            master_branch: "draft".to_string(),
            mode: CreateCourseMode::Fresh {
                root_category: "course".to_string(),
                root_fields: crate::model::Fields::new(),
            },
            versions_dict: None,
        })
        .unwrap();

    core.create_item(CreateItemRequest {
        course: CourseLocator::by_branch(package_id.clone(), "draft"),
        parent_block_id: Some("course".to_string()),
        block_id: Some("unit1".to_string()),
        category: "chapter".to_string(),
        definition_id: None,
        fields: crate::model::Fields::new(),
        user: "author".to_string(),
        force: false,
        continue_version: false,
    })
    .unwrap();

    for leaf in ["a", "b", "c"] {
        core.create_item(CreateItemRequest {
            course: CourseLocator::by_branch(package_id.clone(), "draft"),
            parent_block_id: Some("unit1".to_string()),
            block_id: Some(leaf.to_string()),
            category: "html".to_string(),
            definition_id: None,
            fields: crate::model::Fields::new(),
            user: "author".to_string(),
            force: false,
            continue_version: false,
        })
        .unwrap();
    }

    package_id
}

use crate::store::MemoryConnector;

#[test]
fn test_first_publish_creates_destination_branch() {
    let connector = MemoryConnector::new();
    let reg = registry();
    let core = VersioningCore::new(&connector, &reg);
    let package_id = setup_course(&core);

    let engine = PublishEngine::new(&connector);
    let published_head = engine
        .publish(PublishRequest {
            source: CourseLocator::by_branch(package_id.clone(), "draft"),
            dest_package_id: package_id.clone(),
            dest_branch: "published".to_string(),
            subtree_roots: vec!["course".to_string()],
            blacklist: vec![],
            publisher: "publisher1".to_string(),
        })
        .unwrap();

    let structure = StructureStore::new(&connector).get(published_head).unwrap();
    assert!(structure.blocks.contains_key("unit1"));
    assert!(structure.blocks.contains_key("a"));
    assert!(structure.blocks.contains_key("b"));
    assert!(structure.blocks.contains_key("c"));
}

#[test]
fn test_blacklisted_child_becomes_unreachable_orphan() {
    let connector = MemoryConnector::new();
    let reg = registry();
    let core = VersioningCore::new(&connector, &reg);
    let package_id = setup_course(&core);
    let engine = PublishEngine::new(&connector);

    engine
        .publish(PublishRequest {
            source: CourseLocator::by_branch(package_id.clone(), "draft"),
            dest_package_id: package_id.clone(),
            dest_branch: "published".to_string(),
            subtree_roots: vec!["course".to_string()],
            blacklist: vec![],
            publisher: "publisher1".to_string(),
        })
        .unwrap();

    // Dirty unit1 in the source so the second publish actually re-copies it.
    core.create_item(CreateItemRequest {
        course: CourseLocator::by_branch(package_id.clone(), "draft"),
        parent_block_id: Some("unit1".to_string()),
        block_id: Some("d".to_string()),
        category: "html".to_string(),
        definition_id: None,
        fields: crate::model::Fields::new(),
        user: "author".to_string(),
        force: false,
        continue_version: false,
    })
    .unwrap();

    let published_head = engine
        .publish(PublishRequest {
            source: CourseLocator::by_branch(package_id.clone(), "draft"),
            dest_package_id: package_id.clone(),
            dest_branch: "published".to_string(),
            subtree_roots: vec!["unit1".to_string()],
            blacklist: vec!["b".to_string()],
            publisher: "publisher1".to_string(),
        })
        .unwrap();

    let structure = StructureStore::new(&connector).get(published_head).unwrap();
    let unit1 = &structure.blocks["unit1"];
    assert!(!unit1.children.contains(&"b".to_string()));
    assert!(unit1.children.contains(&"d".to_string()));
    assert!(structure.orphans().contains(&"b".to_string()));
}

#[test]
fn test_republish_is_a_noop() {
    let connector = MemoryConnector::new();
    let reg = registry();
    let core = VersioningCore::new(&connector, &reg);
    let package_id = setup_course(&core);
    let engine = PublishEngine::new(&connector);

    engine
        .publish(PublishRequest {
            source: CourseLocator::by_branch(package_id.clone(), "draft"),
            dest_package_id: package_id.clone(),
            dest_branch: "published".to_string(),
            subtree_roots: vec!["course".to_string()],
            blacklist: vec![],
            publisher: "publisher1".to_string(),
        })
        .unwrap();

    let head_before = IndexStore::new(&connector)
        .get(&package_id)
        .unwrap()
        .head("published")
        .unwrap();

    let head_after = engine
        .publish(PublishRequest {
            source: CourseLocator::by_branch(package_id.clone(), "draft"),
            dest_package_id: package_id.clone(),
            dest_branch: "published".to_string(),
            subtree_roots: vec!["course".to_string()],
            blacklist: vec![],
            publisher: "publisher1".to_string(),
        })
        .unwrap();

    assert_eq!(head_before, head_after);
}
