//! Shard Builder
//!
//! Collects the primary and field-index entries of one shard row, then serves
//! them from memory or writes them to a shard file.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::cursor::SortedMapCursor;
use crate::document::Document;
use crate::error::Result;
use crate::key::{codec, Key, Value};
use crate::storage::{SSTable, SSTableBuilder};

/// Sorted entries of one shard row
#[derive(Debug, Clone)]
pub struct ShardBuilder {
    row: Vec<u8>,
    entries: BTreeMap<Key, Value>,
}

impl ShardBuilder {
    pub fn new(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    /// Add a document: one primary entry and one index entry per field
    pub fn add_document(&mut self, data_type: &str, document: &Document) -> &mut Self {
        for (name, value) in &document.document_fields {
            self.add_primary(data_type, &document.doc_id, name, value);
            self.add_field_index(name, value, data_type, &document.doc_id);
        }
        self
    }

    /// Add only the primary entries of a document, leaving its index unwritten
    pub fn add_unindexed_document(&mut self, data_type: &str, document: &Document) -> &mut Self {
        for (name, value) in &document.document_fields {
            self.add_primary(data_type, &document.doc_id, name, value);
        }
        self
    }

    pub fn add_primary(
        &mut self,
        data_type: &str,
        uid: &str,
        field_name: &str,
        field_value: &str,
    ) -> &mut Self {
        let key = codec::primary_key(&self.row, data_type, uid, field_name, field_value);
        self.entries.insert(key, Value::empty());
        self
    }

    pub fn add_field_index(
        &mut self,
        field_name: &str,
        field_value: &str,
        data_type: &str,
        uid: &str,
    ) -> &mut Self {
        let key = codec::field_index_key(&self.row, field_name, field_value, data_type, uid);
        self.entries.insert(key, Value::empty());
        self
    }

    /// Insert an arbitrary entry
    pub fn insert(&mut self, key: Key, value: Value) -> &mut Self {
        self.entries.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn entries(&self) -> &BTreeMap<Key, Value> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot the entries behind an in-memory cursor
    pub fn to_cursor(&self) -> SortedMapCursor {
        SortedMapCursor::new(Arc::new(self.entries.clone()))
    }

    pub fn into_cursor(self) -> SortedMapCursor {
        SortedMapCursor::new(Arc::new(self.entries))
    }

    /// Write the entries to a new shard file at `path`
    pub fn write_sstable(&self, path: &Path) -> Result<SSTable> {
        let mut builder = SSTableBuilder::new(path)?;
        for (key, value) in &self.entries {
            builder.add(key, value)?;
        }
        builder.finish()
    }
}
