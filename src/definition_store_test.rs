use super::*;
use crate::store::MemoryConnector;
use serde_json::json;

fn fields(pairs: &[(&str, serde_json::Value)]) -> Fields {
    let mut fields = Fields::new();
    for (k, v) in pairs {
        fields.insert(k.to_string(), v.clone());
    }
    fields
}

#[test]
fn test_create_sets_original_equal_to_self() {
    let connector = MemoryConnector::new();
    let store = DefinitionStore::new(&connector);
    let id = store
        .create(fields(&[("data", json!("hello"))]), "html", "user1")
        .unwrap();

    let definition = store.get(id).unwrap().unwrap();
    assert_eq!(definition.original_version, id);
    assert!(definition.previous_version.is_none());
}

#[test]
fn test_create_strips_filtered_fields() {
    let connector = MemoryConnector::new();
    let store = DefinitionStore::new(&connector);
    let id = store
        .create(
            fields(&[("data", json!("x")), ("location", json!("U.D.C"))]),
            "html",
            "user1",
        )
        .unwrap();

    let definition = store.get(id).unwrap().unwrap();
    assert!(!definition.fields.contains_key("location"));
}

#[test]
fn test_update_with_identical_fields_is_noop() {
    let connector = MemoryConnector::new();
    let store = DefinitionStore::new(&connector);
    let id = store
        .create(fields(&[("data", json!("hello"))]), "html", "user1")
        .unwrap();

    let (new_id, changed) = store
        .update(id, fields(&[("data", json!("hello"))]), "user1")
        .unwrap();
    assert_eq!(new_id, id);
    assert!(!changed);
}

#[test]
fn test_update_with_changed_fields_creates_new_revision() {
    let connector = MemoryConnector::new();
    let store = DefinitionStore::new(&connector);
    let id = store
        .create(fields(&[("data", json!("hello"))]), "html", "user1")
        .unwrap();

    let (new_id, changed) = store
        .update(id, fields(&[("data", json!("goodbye"))]), "user2")
        .unwrap();
    assert!(changed);
    assert_ne!(new_id, id);

    let revised = store.get(new_id).unwrap().unwrap();
    assert_eq!(revised.previous_version, Some(id));
    assert_eq!(revised.original_version, id);
}

#[test]
fn test_update_missing_definition_fails() {
    let connector = MemoryConnector::new();
    let store = DefinitionStore::new(&connector);
    let err = store
        .update(DefinitionId::new(), Fields::new(), "user1")
        .unwrap_err();
    assert!(matches!(err, Error::ItemNotFound(_)));
}
