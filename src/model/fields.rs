//! Field-value representation shared by [super::BlockEntry] and
//! [super::Definition].
//!
//! A block's fields split into content/settings/children scope without
//! constraining their value types (a field can be a string, a number, a
//! list, a nested dict...). `serde_json::Value` already models exactly
//! that shape, so we reuse it rather than inventing a bespoke
//! field-value enum.

pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Field names that are derived rather than persisted.
pub const FILTERED_CONTENT_FIELDS: &[&str] = &["location", "category"];

pub fn strip_filtered_fields(mut fields: Fields) -> Fields {
    for name in FILTERED_CONTENT_FIELDS {
        fields.remove(*name);
    }
    fields
}
