//! Field-index verification
//!
//! Confirms every kept field of a document against its index entries.

use tracing::debug;

use crate::cursor::SortedKeyValueCursor;
use crate::document::Document;
use crate::error::Result;
use crate::key::codec;

use super::VerificationCursor;

/// Drives verification cursors forward to find the document's uid
pub struct FieldIndexVerifier;

impl FieldIndexVerifier {
    /// Confirm `document` against its verification cursors.
    ///
    /// Cursors are driven one at a time. A cursor confirms its field once it
    /// reaches an entry whose uid suffix (bytes after the last separator)
    /// equals `uid`; entries for other uids in between are skipped. The
    /// document is rejected with `Ok(None)` if its id is blank or any cursor
    /// runs out first.
    pub fn verify(
        document: Document,
        uid: &[u8],
        verification_cursors: Vec<VerificationCursor>,
    ) -> Result<Option<Document>> {
        if document.has_blank_id() {
            debug!("Rejecting document with blank id");
            return Ok(None);
        }

        for VerificationCursor {
            field_name,
            mut cursor,
        } in verification_cursors
        {
            if !Self::confirm(cursor.as_mut(), uid)? {
                debug!(
                    doc_id = %document.doc_id,
                    field = %field_name,
                    "Field index entry missing"
                );
                return Ok(None);
            }
        }

        Ok(Some(document))
    }

    /// Scan `cursor` forward until it shows `uid` or is exhausted.
    ///
    /// Uids compare as raw bytes, so distinct non-UTF-8 uids never match.
    pub fn confirm(cursor: &mut dyn SortedKeyValueCursor, uid: &[u8]) -> Result<bool> {
        loop {
            match cursor.top_key() {
                None => return Ok(false),
                Some(key) if codec::suffix_after_last(key.column_qualifier()) == uid => {
                    return Ok(true);
                }
                Some(_) => {}
            }
            cursor.advance()?;
        }
    }
}
