//! Document assembly
//!
//! Walks one primary record group and forks a verification cursor per kept
//! field.

use std::collections::BTreeSet;
use std::fmt;

use tracing::trace;

use crate::cursor::SortedKeyValueCursor;
use crate::document::Document;
use crate::error::Result;
use crate::key::{codec, Key, PartialKey};

/// A forked cursor seeked to the index range of one field
pub struct VerificationCursor {
    /// Field whose index entries the cursor walks
    pub field_name: String,
    pub cursor: Box<dyn SortedKeyValueCursor>,
}

impl fmt::Debug for VerificationCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationCursor")
            .field("field_name", &self.field_name)
            .field("top", &self.cursor.top_key())
            .finish()
    }
}

/// Output of one assembly pass
#[derive(Debug)]
pub struct AssembledDocument {
    /// First key of the group; its row and column family bound the group
    pub boundary: Key,
    pub document: Document,
    /// Raw uid bytes from the column family; `document.doc_id` is their lossy
    /// text form
    pub uid: Vec<u8>,
    /// One cursor per kept field, in group order
    pub verification_cursors: Vec<VerificationCursor>,
}

/// Builds a document from the primary group the source is positioned on
pub struct DocumentAssembler<'a> {
    fields_to_skip: &'a BTreeSet<String>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(fields_to_skip: &'a BTreeSet<String>) -> Self {
        Self { fields_to_skip }
    }

    /// Consume the group at the source's current position.
    ///
    /// Returns `Ok(None)` when the source has no current entry. On return the
    /// source sits on the first entry past the group, or is exhausted. Fork
    /// and read failures abort assembly.
    pub fn assemble(
        &self,
        source: &mut dyn SortedKeyValueCursor,
    ) -> Result<Option<AssembledDocument>> {
        let boundary = match source.top_key() {
            Some(key) => key.clone(),
            None => return Ok(None),
        };

        let mut document = Document::default();
        let mut uid = Vec::new();
        let mut verification_cursors = Vec::new();

        while let Some(key) = source.top_key() {
            if !key.equals_partial(&boundary, PartialKey::RowColFam) {
                break;
            }

            let field = codec::decode_primary_qualifier(key.column_qualifier());
            if self.fields_to_skip.contains(&field.name) {
                trace!(field = %field.name, "Skipping configured field");
                source.advance()?;
                continue;
            }

            let (_, raw_uid) = codec::split_first(key.column_family());
            uid = raw_uid.to_vec();
            let family = codec::decode_primary_family(key.column_family());
            let range =
                codec::field_index_range(key.row(), &field.name, &field.value, &family.data_type);
            trace!(field = %field.name, range = %range, "Forking verification cursor");

            let mut cursor = source.fork()?;
            cursor.seek(&range)?;
            verification_cursors.push(VerificationCursor {
                field_name: field.name.clone(),
                cursor,
            });

            document.doc_id = family.uid;
            document.document_fields.insert(field.name, field.value);

            source.advance()?;
        }

        Ok(Some(AssembledDocument {
            boundary,
            document,
            uid,
            verification_cursors,
        }))
    }
}
