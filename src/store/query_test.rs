use super::*;
use serde_json::json;

fn doc() -> Value {
    json!({
        "package_id": "U.D.C",
        "org": "U",
        "versions": { "draft": "s1", "published": "s2" },
        "tags": ["algebra", "intro"],
    })
}

#[test]
fn test_eq_matches_scalar() {
    let mut q = Query::new();
    q.insert("package_id".to_string(), Criterion::Eq(json!("U.D.C")));
    assert!(QueryMatcher::matches(&doc(), &q));
}

#[test]
fn test_eq_mismatch_fails() {
    let mut q = Query::new();
    q.insert("package_id".to_string(), Criterion::Eq(json!("other")));
    assert!(!QueryMatcher::matches(&doc(), &q));
}

#[test]
fn test_exists_dotted_path() {
    let mut q = Query::new();
    q.insert("versions.draft".to_string(), Criterion::Exists(true));
    assert!(QueryMatcher::matches(&doc(), &q));

    let mut q = Query::new();
    q.insert("versions.missing_branch".to_string(), Criterion::Exists(true));
    assert!(!QueryMatcher::matches(&doc(), &q));
}

#[test]
fn test_absent_key_matches_only_null_criterion() {
    let mut q = Query::new();
    q.insert("nope".to_string(), Criterion::Eq(Value::Null));
    assert!(QueryMatcher::matches(&doc(), &q));

    let mut q = Query::new();
    q.insert("nope".to_string(), Criterion::Eq(json!("x")));
    assert!(!QueryMatcher::matches(&doc(), &q));
}

#[test]
fn test_in_matches_list_membership() {
    let mut q = Query::new();
    q.insert(
        "tags".to_string(),
        Criterion::In(vec![json!("algebra"), json!("geometry")]),
    );
    assert!(QueryMatcher::matches(&doc(), &q));
}

#[test]
fn test_regex_matches_substring() {
    let mut q = Query::new();
    q.insert("package_id".to_string(), Criterion::Regex("^U\\.D".to_string()));
    assert!(QueryMatcher::matches(&doc(), &q));
}

#[test]
fn test_conjunction_requires_all_criteria() {
    let mut q = Query::new();
    q.insert("org".to_string(), Criterion::Eq(json!("U")));
    q.insert("package_id".to_string(), Criterion::Eq(json!("wrong")));
    assert!(!QueryMatcher::matches(&doc(), &q));
}
