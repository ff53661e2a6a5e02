use std::collections::HashMap;

use serde_json::json;

use super::*;
use crate::{
    model::{DefinitionId, EditInfo, StructureId},
    scope::StaticRegistry,
};

fn block(category: &str, children: &[&str]) -> BlockEntry {
    let structure_id = StructureId::new();
    let mut entry = BlockEntry::new(category, DefinitionId::new(), EditInfo::new("alice", structure_id));
    entry.children = children.iter().map(|c| c.to_string()).collect();
    entry
}

fn registry() -> StaticRegistry {
    StaticRegistry::new().with_inheritable(&["visible_to_staff_only", "due"])
}

#[test]
fn test_root_inherits_nothing() {
    let mut blocks = HashMap::new();
    blocks.insert("course".to_string(), block("course", &[]));

    let engine = InheritanceEngine::new(&registry());
    let inherited = engine.compute("course", &blocks);
    assert_eq!(inherited.get("course"), Some(&Fields::new()));
}

#[test]
fn test_child_inherits_parent_own_field() {
    let mut root = block("course", &["chapter1"]);
    root.fields.insert("due".to_string(), json!("2026-01-01"));
    let chapter = block("chapter", &[]);

    let mut blocks = HashMap::new();
    blocks.insert("course".to_string(), root);
    blocks.insert("chapter1".to_string(), chapter);

    let engine = InheritanceEngine::new(&registry());
    let inherited = engine.compute("course", &blocks);
    assert_eq!(inherited["chapter1"].get("due"), Some(&json!("2026-01-01")));
}

#[test]
fn test_own_value_overrides_ancestor_for_descendants() {
    let mut root = block("course", &["chapter1"]);
    root.fields.insert("due".to_string(), json!("2026-01-01"));
    let mut chapter = block("chapter", &["seq1"]);
    chapter.fields.insert("due".to_string(), json!("2026-02-01"));
    let sequential = block("sequential", &[]);

    let mut blocks = HashMap::new();
    blocks.insert("course".to_string(), root);
    blocks.insert("chapter1".to_string(), chapter);
    blocks.insert("seq1".to_string(), sequential);

    let engine = InheritanceEngine::new(&registry());
    let inherited = engine.compute("course", &blocks);
    // chapter1 itself still sees the course's value...
    assert_eq!(inherited["chapter1"].get("due"), Some(&json!("2026-01-01")));
    // ...but seq1, a descendant of chapter1, sees chapter1's own override,
    // the nearest ancestor that sets `due` in its own fields.
    assert_eq!(inherited["seq1"].get("due"), Some(&json!("2026-02-01")));
}

#[test]
fn test_non_inheritable_field_does_not_propagate() {
    let mut root = block("course", &["chapter1"]);
    root.fields.insert("display_name".to_string(), json!("Course"));
    let chapter = block("chapter", &[]);

    let mut blocks = HashMap::new();
    blocks.insert("course".to_string(), root);
    blocks.insert("chapter1".to_string(), chapter);

    let engine = InheritanceEngine::new(&registry());
    let inherited = engine.compute("course", &blocks);
    assert!(inherited["chapter1"].get("display_name").is_none());
}

#[test]
fn test_missing_child_tolerated_silently() {
    let root = block("course", &["ghost"]);
    let mut blocks = HashMap::new();
    blocks.insert("course".to_string(), root);

    let engine = InheritanceEngine::new(&registry());
    let inherited = engine.compute("course", &blocks);
    assert_eq!(inherited.len(), 1);
    assert!(!inherited.contains_key("ghost"));
}

#[test]
fn test_invalidate_subtree_recomputes_descendants() {
    let mut root = block("course", &["chapter1"]);
    root.fields.insert("due".to_string(), json!("2026-01-01"));
    let chapter = block("chapter", &["seq1"]);
    let sequential = block("sequential", &[]);

    let mut blocks = HashMap::new();
    blocks.insert("course".to_string(), root);
    blocks.insert("chapter1".to_string(), chapter);
    blocks.insert("seq1".to_string(), sequential);

    let engine = InheritanceEngine::new(&registry());
    let mut cache = engine.compute("course", &blocks);
    assert_eq!(cache["seq1"].get("due"), Some(&json!("2026-01-01")));

    // chapter1 sets its own `due`, an inheritable field, after the cache
    // was populated.
    blocks
        .get_mut("chapter1")
        .unwrap()
        .fields
        .insert("due".to_string(), json!("2026-03-01"));

    assert!(engine.touches_inheritable("chapter", ["due"]));
    engine.invalidate_subtree("chapter1", &blocks, &mut cache);

    assert_eq!(cache["seq1"].get("due"), Some(&json!("2026-03-01")));
}
