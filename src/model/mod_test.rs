use super::*;

fn block(definition: DefinitionId, children: Vec<&str>) -> BlockEntry {
    let mut entry = BlockEntry::new("chapter", definition, EditInfo::new("u1", StructureId::new()));
    entry.children = children.into_iter().map(str::to_string).collect();
    entry
}

#[test]
fn test_structure_id_round_trip() {
    let id = StructureId::new();
    let text = id.to_string();
    let parsed: StructureId = text.parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn test_structure_fresh_invariants() {
    let s = Structure::fresh("course".to_string(), "u1");
    assert!(s.previous_version.is_none());
    assert_eq!(s.original_version, s.id);
}

#[test]
fn test_orphans_excludes_reachable_blocks() {
    let def = DefinitionId::new();
    let mut s = Structure::fresh("course".to_string(), "u1");
    s.blocks
        .insert("course".to_string(), block(def, vec!["chapter1"]));
    s.blocks.insert("chapter1".to_string(), block(def, vec![]));
    s.blocks.insert("orphan1".to_string(), block(def, vec![]));

    let mut orphans = s.orphans();
    orphans.sort();
    assert_eq!(orphans, vec!["orphan1".to_string()]);
}

#[test]
fn test_dangling_children_reports_missing_targets() {
    let def = DefinitionId::new();
    let mut s = Structure::fresh("course".to_string(), "u1");
    s.blocks
        .insert("course".to_string(), block(def, vec!["missing"]));

    let dangling = s.dangling_children();
    assert_eq!(dangling, vec![("course".to_string(), "missing".to_string())]);
}

#[test]
fn test_strip_filtered_fields_removes_derived_fields() {
    let mut fields = Fields::new();
    fields.insert("location".to_string(), serde_json::json!("loc"));
    fields.insert("category".to_string(), serde_json::json!("video"));
    fields.insert("display_name".to_string(), serde_json::json!("Intro"));

    let stripped = strip_filtered_fields(fields);
    assert_eq!(stripped.len(), 1);
    assert!(stripped.contains_key("display_name"));
}
