use super::*;

fn registry() -> StaticRegistry {
    StaticRegistry::new()
        .with_content_fields("html", &["data"])
        .with_children_fields("vertical", &["children"])
        .with_inheritable(&["visible_to_staff_only", "due"])
        .with_detached(&["static_tab"])
}

#[test]
fn test_children_field_is_always_children_scope() {
    let reg = registry();
    assert_eq!(reg.scope_of("vertical", "children"), FieldScope::Children);
}

#[test]
fn test_content_field_resolves_per_category() {
    let reg = registry();
    assert_eq!(reg.scope_of("html", "data"), FieldScope::Content);
    assert_eq!(reg.scope_of("problem", "data"), FieldScope::Settings);
}

#[test]
fn test_inheritable_fields_are_category_independent() {
    let reg = registry();
    assert!(reg.is_inheritable("vertical", "due"));
    assert!(!reg.is_inheritable("vertical", "data"));
}

#[test]
fn test_detached_categories() {
    let reg = registry();
    assert!(reg.is_detached("static_tab"));
    assert!(!reg.is_detached("vertical"));
}
