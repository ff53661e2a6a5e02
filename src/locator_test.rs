use super::*;

#[test]
fn test_fully_specified_requires_package_or_version() {
    let empty = CourseLocator::default();
    assert!(!empty.is_fully_specified());

    let by_branch_only = CourseLocator {
        package_id: None,
        branch: Some("draft".to_string()),
        version_guid: None,
    };
    assert!(!by_branch_only.is_fully_specified());

    assert!(CourseLocator::by_branch("U.D.C", "draft").is_fully_specified());
    assert!(CourseLocator::by_version(StructureId::new()).is_fully_specified());
}

#[test]
fn test_block_usage_locator_defers_to_course() {
    let loc = BlockUsageLocator::new(CourseLocator::by_branch("U.D.C", "draft"), "chapter1");
    assert!(loc.is_fully_specified());
    assert_eq!(loc.block_id, "chapter1");
}
