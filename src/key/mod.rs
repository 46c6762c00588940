//! Key Module
//!
//! Compound sorted keys and the values stored under them.
//!
//! ## Key Layout
//! ```text
//! ┌──────────┬─────────────────────┬──────────────────────────────────┐
//! │   Row    │    Column Family    │        Column Qualifier          │
//! ├──────────┼─────────────────────┼──────────────────────────────────┤
//! │  shard   │ dataType \0 uid     │ fieldName \0 fieldValue          │  primary
//! │  shard   │ fi \0 fieldName     │ fieldValue \0 dataType \0 uid    │  field index
//! └──────────┴─────────────────────┴──────────────────────────────────┘
//! ```
//!
//! Keys compare component by component, each component by raw bytes. All
//! entries of one document share `(row, column family)` and so are contiguous.

pub mod codec;
mod encoding;

use std::fmt;

use bytes::Bytes;

pub use encoding::{decode_sort_key, encode_sort_key};

/// How many leading components of a key take part in a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialKey {
    Row,
    RowColFam,
    RowColFamColQual,
}

/// A `(row, column family, column qualifier)` key
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    row: Vec<u8>,
    column_family: Vec<u8>,
    column_qualifier: Vec<u8>,
}

impl Key {
    pub fn new(
        row: impl Into<Vec<u8>>,
        column_family: impl Into<Vec<u8>>,
        column_qualifier: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row: row.into(),
            column_family: column_family.into(),
            column_qualifier: column_qualifier.into(),
        }
    }

    /// Key with an empty qualifier: the first key of a `(row, family)` group
    pub fn with_family(row: impl Into<Vec<u8>>, column_family: impl Into<Vec<u8>>) -> Self {
        Self::new(row, column_family, Vec::new())
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn column_family(&self) -> &[u8] {
        &self.column_family
    }

    pub fn column_qualifier(&self) -> &[u8] {
        &self.column_qualifier
    }

    /// Compare only the leading components selected by `part`
    pub fn equals_partial(&self, other: &Key, part: PartialKey) -> bool {
        match part {
            PartialKey::Row => self.row == other.row,
            PartialKey::RowColFam => {
                self.row == other.row && self.column_family == other.column_family
            }
            PartialKey::RowColFamColQual => self == other,
        }
    }

    /// The smallest key that sorts after every key sharing this key's `part`
    /// prefix.
    ///
    /// Appending a NUL byte to the last compared component yields its
    /// immediate successor; the trailing components are cleared.
    pub fn following_key(&self, part: PartialKey) -> Key {
        match part {
            PartialKey::Row => Key::new(successor(&self.row), Vec::new(), Vec::new()),
            PartialKey::RowColFam => Key::new(
                self.row.clone(),
                successor(&self.column_family),
                Vec::new(),
            ),
            PartialKey::RowColFamColQual => Key::new(
                self.row.clone(),
                self.column_family.clone(),
                successor(&self.column_qualifier),
            ),
        }
    }
}

fn successor(component: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(component.len() + 1);
    next.extend_from_slice(component);
    next.push(codec::NULL);
    next
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}",
            self.row.escape_ascii(),
            self.column_family.escape_ascii(),
            self.column_qualifier.escape_ascii()
        )
    }
}

/// An entry value; cheap to clone so cursors and forks can share payloads
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Value(Bytes);

impl Value {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// A zero-length value, as stored under index entries
    pub fn empty() -> Self {
        Self(Bytes::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self(Bytes::from(text))
    }
}

impl From<&'static str> for Value {
    fn from(text: &'static str) -> Self {
        Self(Bytes::from_static(text.as_bytes()))
    }
}

impl AsRef<[u8]> for Value {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
