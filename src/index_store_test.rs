use super::*;
use crate::store::MemoryConnector;

#[test]
fn test_allocate_package_id_with_no_collision_uses_bare_root() {
    let connector = MemoryConnector::new();
    let store = IndexStore::new(&connector);
    let id = store.allocate_package_id("U", None).unwrap();
    assert_eq!(id, "U");
}

#[test]
fn test_allocate_package_id_appends_lowest_unused_suffix() {
    let connector = MemoryConnector::new();
    let store = IndexStore::new(&connector);

    store.insert(CourseIndex::new("U", "U", "user1")).unwrap();
    let id = store.allocate_package_id("U", None).unwrap();
    assert_eq!(id, "U1");

    store.insert(CourseIndex::new("U1", "U", "user1")).unwrap();
    let id = store.allocate_package_id("U", None).unwrap();
    assert_eq!(id, "U2");
}

#[test]
fn test_allocate_package_id_uses_explicit_id_root() {
    let connector = MemoryConnector::new();
    let store = IndexStore::new(&connector);
    let id = store.allocate_package_id("UnivOrg", Some("CS101")).unwrap();
    assert_eq!(id, "CS101");
}

#[test]
fn test_head_missing_branch_fails() {
    let connector = MemoryConnector::new();
    let store = IndexStore::new(&connector);
    store.insert(CourseIndex::new("U.D.C", "U", "user1")).unwrap();
    let err = store.head("U.D.C", "draft").unwrap_err();
    assert!(matches!(err, Error::ItemNotFound(_)));
}
