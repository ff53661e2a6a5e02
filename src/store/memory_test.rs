use super::*;
use crate::model::CourseIndex;

#[test]
fn test_insert_then_get_round_trips() {
    let store = MemoryConnector::new();
    let index = CourseIndex::new("U.D.C", "U", "user1");
    store.insert_course_index(index.clone()).unwrap();

    let fetched = store.get_course_index("U.D.C").unwrap().unwrap();
    assert_eq!(fetched.package_id, index.package_id);
}

#[test]
fn test_insert_duplicate_course_index_fails() {
    let store = MemoryConnector::new();
    let index = CourseIndex::new("U.D.C", "U", "user1");
    store.insert_course_index(index.clone()).unwrap();

    let err = store.insert_course_index(index).unwrap_err();
    assert!(matches!(err, Error::DuplicateItem(_)));
}

#[test]
fn test_update_missing_course_index_fails() {
    let store = MemoryConnector::new();
    let index = CourseIndex::new("U.D.C", "U", "user1");
    let err = store.update_course_index(index).unwrap_err();
    assert!(matches!(err, Error::ItemNotFound(_)));
}

#[test]
fn test_find_matching_course_indexes_by_org() {
    let store = MemoryConnector::new();
    store
        .insert_course_index(CourseIndex::new("U.D.C1", "U", "user1"))
        .unwrap();
    store
        .insert_course_index(CourseIndex::new("V.D.C2", "V", "user1"))
        .unwrap();

    let mut query = Query::new();
    query.insert("org".to_string(), Criterion::Eq(serde_json::json!("U")));
    let found = store.find_matching_course_indexes(&query).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].package_id, "U.D.C1");
}

#[test]
fn test_get_structure_missing_returns_none() {
    let store = MemoryConnector::new();
    assert!(store.get_structure(StructureId::new()).unwrap().is_none());
}
