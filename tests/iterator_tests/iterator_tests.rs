//! Tests for the field-index merging iterator
//!
//! These tests verify:
//! - A seek returns the document only when every kept field is indexed
//! - Stray index entries (other values, other data types) do not matter
//! - Skip-list handling from host options
//! - Seek / advance / fork state transitions
//! - The same behavior over a shard file
//! - Store failures surface as errors and leave no result

use std::collections::{BTreeMap, HashMap};
use std::io;

use fimerge::config::FIELDS_TO_SKIP;
use fimerge::cursor::{Range, SortedKeyValueCursor, SortedMapCursor};
use fimerge::document;
use fimerge::key::{codec, Key, PartialKey, Value};
use fimerge::storage::SSTableReader;
use fimerge::{Config, Document, FiMergeError, FieldIndexMergingIterator, Result, ShardBuilder};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const SHARD: &str = "20200201_1";
const DATA_TYPE: &str = "dataType";
const DOC_ID: &str = "5c7e1a42-9d1b-4f8e-a1f3-3b0c9d2e7a10";

fn fields() -> BTreeMap<String, String> {
    [
        ("FIELDA", "value"),
        ("FIELDB", "value4"),
        ("FIELDC", "value3"),
        ("FIELDD", "value2"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn sample_document() -> Document {
    Document {
        doc_id: DOC_ID.to_string(),
        document_fields: fields(),
    }
}

/// Shard shaped like a real ingest: primary entries, their index entries,
/// `extra_fi` stray index entries per field, and index entries for the same
/// uid under other data types.
fn generate_shard(
    data_type: &str,
    other_data_types: &[&str],
    missing_fi: bool,
    extra_fi: usize,
) -> ShardBuilder {
    let doc = sample_document();
    let mut shard = ShardBuilder::new(SHARD);

    if missing_fi {
        shard.add_unindexed_document(data_type, &doc);
    } else {
        shard.add_document(data_type, &doc);
    }

    for (name, value) in &doc.document_fields {
        for i in 0..extra_fi {
            shard.add_field_index(name, &format!("stray-{:02}", i), data_type, DOC_ID);
        }
        for other in other_data_types {
            shard.add_field_index(name, value, other, DOC_ID);
        }
    }
    shard
}

fn document_range(data_type: &str, uid: &str) -> Range {
    let start = Key::with_family(SHARD, codec::primary_family(data_type, uid));
    let end = start.following_key(PartialKey::RowColFam);
    Range::new(start, true, end, false)
}

fn iterator_over(shard: &ShardBuilder) -> FieldIndexMergingIterator<SortedMapCursor> {
    FieldIndexMergingIterator::init(shard.to_cursor(), &HashMap::new())
}

/// Decoded top value; asserts the id too, since document equality ignores it
fn decoded_top(iterator: &FieldIndexMergingIterator<SortedMapCursor>) -> Document {
    let decoded = document::from_value(iterator.top_value().unwrap()).unwrap();
    assert_eq!(Some(decoded.doc_id.as_str()), iterator.top_document().map(|d| d.doc_id.as_str()));
    decoded
}

/// Cursor whose reads fail once positioned
struct FailingCursor(SortedMapCursor);

impl SortedKeyValueCursor for FailingCursor {
    fn seek(&mut self, range: &Range) -> Result<()> {
        self.0.seek(range)
    }

    fn top(&self) -> Option<(&Key, &Value)> {
        self.0.top()
    }

    fn advance(&mut self) -> Result<()> {
        Err(FiMergeError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "tablet went away",
        )))
    }

    fn fork(&self) -> Result<Box<dyn SortedKeyValueCursor>> {
        self.0.fork()
    }
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_find_doc() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    assert!(iterator.has_top());
    assert_eq!(decoded_top(&iterator), sample_document());
    assert_eq!(iterator.top_document().unwrap().doc_id, DOC_ID);
}

#[test]
fn test_extra_fi_keys() {
    let shard = generate_shard("datatypey", &[], false, 20);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range("datatypey", DOC_ID)).unwrap();

    assert!(iterator.has_top());
    assert_eq!(decoded_top(&iterator), sample_document());
}

#[test]
fn test_missing_fi() {
    let shard = generate_shard("datatypey", &[], true, 20);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range("datatypey", DOC_ID)).unwrap();

    assert!(!iterator.has_top());
    assert!(iterator.top_key().is_none());
    assert!(iterator.top_value().is_none());
}

#[test]
fn test_other_data_types() {
    let shard = generate_shard("datatypey", &["other", "otherstuff"], false, 20);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range("datatypey", DOC_ID)).unwrap();

    assert!(iterator.has_top());
    assert_eq!(decoded_top(&iterator), sample_document());
}

#[test]
fn test_index_only_under_other_data_type_is_rejected() {
    // Index entries exist, but only under "other"
    let shard = generate_shard("datatypey", &["other"], true, 0);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range("datatypey", DOC_ID)).unwrap();

    assert!(!iterator.has_top());
}

#[test]
fn test_wrong_data_type() {
    let shard = generate_shard("datatypey", &[], false, 20);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    assert!(!iterator.has_top());
}

#[test]
fn test_no_shard_unbounded_seek() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&Range::all()).unwrap();

    assert!(!iterator.has_top());
    assert!(!iterator.is_unseeked());
}

#[test]
fn test_deleting_one_index_entry_rejects_document() {
    let mut shard = ShardBuilder::new("S1");
    shard.add_document(
        "dataType",
        &Document::new("D1")
            .with_field("FIELDA", "v1")
            .with_field("FIELDB", "v2"),
    );
    let range = codec::document_range(b"S1", "dataType", "D1");

    let mut iterator = FieldIndexMergingIterator::new(shard.to_cursor(), Config::default());
    iterator.seek(&range).unwrap();
    let expected = Document::new("D1")
        .with_field("FIELDA", "v1")
        .with_field("FIELDB", "v2");
    let decoded = decoded_top(&iterator);
    assert_eq!(decoded, expected);
    assert_eq!(decoded.doc_id, "D1");
    assert_eq!(
        iterator.top_key(),
        Some(&codec::primary_key(b"S1", "dataType", "D1", "FIELDA", "v1"))
    );

    let removed = shard.remove(&codec::field_index_key(b"S1", "FIELDB", "v2", "dataType", "D1"));
    assert!(removed.is_some());

    let mut iterator = FieldIndexMergingIterator::new(shard.to_cursor(), Config::default());
    iterator.seek(&range).unwrap();
    assert!(!iterator.has_top());
}

#[test]
fn test_missing_document_yields_no_result() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range(DATA_TYPE, "no-such-doc")).unwrap();

    assert!(!iterator.has_top());
}

#[test]
fn test_neighbor_documents_are_not_merged() {
    let mut shard = ShardBuilder::new("S1");
    shard
        .add_document("dataType", &Document::new("D1").with_field("A", "1"))
        .add_document("dataType", &Document::new("D10").with_field("B", "2"));
    let mut iterator = FieldIndexMergingIterator::new(shard.to_cursor(), Config::default());

    iterator.seek(&codec::document_range(b"S1", "dataType", "D1")).unwrap();

    let top = iterator.top_document().unwrap();
    assert_eq!(top.doc_id, "D1");
    assert_eq!(top, &Document::new("D1").with_field("A", "1"));
}

// =============================================================================
// Skip List Tests
// =============================================================================

#[test]
fn test_default_skip_list_ignores_unindexed_load_date() {
    let mut shard = generate_shard(DATA_TYPE, &[], false, 0);
    shard.add_primary(DATA_TYPE, DOC_ID, "LOAD_DATE", "20200201");
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    let doc = decoded_top(&iterator);
    assert_eq!(doc, sample_document());
    assert_eq!(doc.field("LOAD_DATE"), None);
}

#[test]
fn test_skip_option_from_host() {
    let mut shard = generate_shard(DATA_TYPE, &[], false, 0);
    shard.add_primary(DATA_TYPE, DOC_ID, "UNINDEXED", "x");

    let mut options = HashMap::new();
    options.insert(FIELDS_TO_SKIP.to_string(), " UNINDEXED , FIELDD,".to_string());
    options.insert("unrelated".to_string(), "ignored".to_string());
    let mut iterator = FieldIndexMergingIterator::init(shard.to_cursor(), &options);

    assert_eq!(iterator.config().fields_to_skip.len(), 2);
    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    let doc = decoded_top(&iterator);
    assert_eq!(doc.field("FIELDD"), None);
    assert_eq!(doc.field("UNINDEXED"), None);
    assert_eq!(doc.document_fields.len(), 3);
}

#[test]
fn test_empty_skip_option_verifies_every_field() {
    let mut shard = generate_shard(DATA_TYPE, &[], false, 0);
    shard.add_primary(DATA_TYPE, DOC_ID, "LOAD_DATE", "20200201");

    let mut options = HashMap::new();
    options.insert(FIELDS_TO_SKIP.to_string(), String::new());
    let mut iterator = FieldIndexMergingIterator::init(shard.to_cursor(), &options);

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    // LOAD_DATE has no index entry
    assert!(!iterator.has_top());
}

#[test]
fn test_all_fields_skipped_is_rejected() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let config = Config::builder()
        .fields_to_skip(["FIELDA", "FIELDB", "FIELDC", "FIELDD"])
        .build();
    let mut iterator = FieldIndexMergingIterator::new(shard.to_cursor(), config);

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    assert!(!iterator.has_top());
}

// =============================================================================
// State Transition Tests
// =============================================================================

#[test]
fn test_new_iterator_is_unseeked() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let iterator = iterator_over(&shard);

    assert!(iterator.is_unseeked());
    assert!(!iterator.has_top());
}

#[test]
fn test_advance_exhausts() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut iterator = iterator_over(&shard);
    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();
    assert!(iterator.has_top());

    SortedKeyValueCursor::advance(&mut iterator).unwrap();
    assert!(!iterator.has_top());

    SortedKeyValueCursor::advance(&mut iterator).unwrap();
    assert!(!iterator.has_top());
}

#[test]
fn test_repeated_seeks() {
    let mut shard = generate_shard(DATA_TYPE, &[], false, 0);
    shard.add_unindexed_document(DATA_TYPE, &Document::new("D2").with_field("FIELDA", "z"));
    let mut iterator = iterator_over(&shard);

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();
    assert!(iterator.has_top());

    iterator.seek(&document_range(DATA_TYPE, "D2")).unwrap();
    assert!(!iterator.has_top());

    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();
    assert_eq!(decoded_top(&iterator), sample_document());
}

#[test]
fn test_fork_is_unseeked_and_independent() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut iterator = iterator_over(&shard);
    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    let mut fork = SortedKeyValueCursor::fork(&iterator).unwrap();
    assert!(!fork.has_top());

    fork.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();
    assert_eq!(fork.top_value(), iterator.top_value());

    fork.advance().unwrap();
    assert!(!fork.has_top());
    assert!(iterator.has_top());
}

#[test]
fn test_trait_top_matches_inherent_accessors() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut iterator = iterator_over(&shard);
    iterator.seek(&document_range(DATA_TYPE, DOC_ID)).unwrap();

    let (key, value) = SortedKeyValueCursor::top(&iterator).unwrap();
    assert_eq!(Some(key), iterator.top_key());
    assert_eq!(Some(value), iterator.top_value());
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_store_failure_is_returned_and_clears_top() {
    let shard = generate_shard(DATA_TYPE, &[], false, 0);
    let mut failing =
        FieldIndexMergingIterator::new(FailingCursor(shard.to_cursor()), Config::default());
    let result = failing.seek(&document_range(DATA_TYPE, DOC_ID));

    assert!(matches!(result, Err(FiMergeError::Io(_))));
    assert!(!failing.has_top());
}

// =============================================================================
// Shard File Tests
// =============================================================================

#[test]
fn test_lookup_over_shard_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("shard.sst");

    let mut shard = generate_shard("datatypey", &["other"], false, 5);
    shard.add_unindexed_document("datatypey", &Document::new("D2").with_field("FIELDA", "z"));
    shard.write_sstable(&path).unwrap();

    let reader = SSTableReader::open(&path).unwrap();
    let mut iterator = FieldIndexMergingIterator::new(reader.cursor().unwrap(), Config::default());

    iterator.seek(&document_range("datatypey", DOC_ID)).unwrap();
    assert!(iterator.has_top());
    assert_eq!(
        document::from_value(iterator.top_value().unwrap()).unwrap(),
        sample_document()
    );

    iterator.seek(&document_range("datatypey", "D2")).unwrap();
    assert!(!iterator.has_top());
}
