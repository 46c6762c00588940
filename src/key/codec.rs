//! Shard key codec
//!
//! Builds primary and field-index keys and splits their NUL-separated
//! sub-fields.
//!
//! Field names never contain the separator but field values may, so the
//! name/value split uses the *first* separator while uid extraction from a
//! field-index qualifier uses the *last* one.

use crate::cursor::Range;

use super::{Key, PartialKey};

/// Separator between sub-fields of a key component
pub const NULL: u8 = 0x00;

/// Sentinel byte sorting after every byte a uid can contain
pub const HIGH: u8 = 0xFF;

/// Column family prefix of field-index entries
pub const FIELD_INDEX_PREFIX: &[u8] = b"fi";

/// `(dataType, uid)` decoded from a primary column family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryFamily {
    pub data_type: String,
    pub uid: String,
}

/// `(fieldName, fieldValue)` decoded from a primary column qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub value: String,
}

// =============================================================================
// Splitting
// =============================================================================

/// Split at the first separator. A component without one yields an empty tail.
pub fn split_first(component: &[u8]) -> (&[u8], &[u8]) {
    match component.iter().position(|&b| b == NULL) {
        Some(at) => (&component[..at], &component[at + 1..]),
        None => (component, &component[component.len()..]),
    }
}

/// Bytes after the last separator, or the whole component if it has none
pub fn suffix_after_last(component: &[u8]) -> &[u8] {
    match component.iter().rposition(|&b| b == NULL) {
        Some(at) => &component[at + 1..],
        None => component,
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Decode `dataType \0 uid`
pub fn decode_primary_family(column_family: &[u8]) -> PrimaryFamily {
    let (data_type, uid) = split_first(column_family);
    PrimaryFamily {
        data_type: text(data_type),
        uid: text(uid),
    }
}

/// Decode `fieldName \0 fieldValue`; the value keeps any further separators
pub fn decode_primary_qualifier(column_qualifier: &[u8]) -> FieldEntry {
    let (name, value) = split_first(column_qualifier);
    FieldEntry {
        name: text(name),
        value: text(value),
    }
}

// =============================================================================
// Building
// =============================================================================

fn join(parts: &[&[u8]]) -> Vec<u8> {
    let len = parts.iter().map(|p| p.len() + 1).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(NULL);
        }
        out.extend_from_slice(part);
    }
    out
}

/// `dataType \0 uid`
pub fn primary_family(data_type: &str, uid: &str) -> Vec<u8> {
    join(&[data_type.as_bytes(), uid.as_bytes()])
}

/// `fi \0 fieldName`
pub fn field_index_family(field_name: &str) -> Vec<u8> {
    join(&[FIELD_INDEX_PREFIX, field_name.as_bytes()])
}

/// Key of one primary attribute entry
pub fn primary_key(row: &[u8], data_type: &str, uid: &str, field_name: &str, field_value: &str) -> Key {
    Key::new(
        row,
        primary_family(data_type, uid),
        join(&[field_name.as_bytes(), field_value.as_bytes()]),
    )
}

/// Key of one field-index entry
pub fn field_index_key(
    row: &[u8],
    field_name: &str,
    field_value: &str,
    data_type: &str,
    uid: &str,
) -> Key {
    Key::new(
        row,
        field_index_family(field_name),
        join(&[field_value.as_bytes(), data_type.as_bytes(), uid.as_bytes()]),
    )
}

/// Range covering every primary entry of one document
pub fn document_range(row: &[u8], data_type: &str, uid: &str) -> Range {
    let start = Key::with_family(row, primary_family(data_type, uid));
    let end = start.following_key(PartialKey::RowColFam);
    Range::new(start, true, end, false)
}

/// Range covering the index entries of one `(field, value, dataType)`,
/// ordered by uid.
///
/// Starts at `value \0 dataType \0` inclusive and ends at
/// `value \0 dataType HIGH` exclusive.
pub fn field_index_range(row: &[u8], field_name: &str, field_value: &str, data_type: &str) -> Range {
    let family = field_index_family(field_name);

    let mut prefix = join(&[field_value.as_bytes(), data_type.as_bytes()]);
    let mut stop = prefix.clone();
    prefix.push(NULL);
    stop.push(HIGH);

    Range::new(
        Key::new(row, family.clone(), prefix),
        true,
        Key::new(row, family, stop),
        false,
    )
}
