//! Document Module
//!
//! The record assembled from one primary entry group, and its JSON form.
//!
//! ## JSON Shape
//! ```text
//! { "docId": "<uid>", "documentFields": { "<fieldName>": "<fieldValue>", ... } }
//! ```

mod json;

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

pub use json::{from_json, from_value, to_json, to_value};

/// An assembled document
///
/// Equality and hash are content-based: both cover the field map only, so
/// the same content under two ids compares equal. Compare `doc_id` explicitly
/// when identity matters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub doc_id: String,

    #[serde(default)]
    pub document_fields: BTreeMap<String, String>,
}

impl Document {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            document_fields: BTreeMap::new(),
        }
    }

    /// Add or replace a field, returning the document for chaining
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.document_fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.document_fields.get(name).map(String::as_str)
    }

    /// A blank id (empty or whitespace only) never identifies a document
    pub fn has_blank_id(&self) -> bool {
        self.doc_id.trim().is_empty()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.document_fields == other.document_fields
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document_fields.hash(state);
    }
}
