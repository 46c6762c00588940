//! Merge Module
//!
//! Sort-merge join of one primary document group against its field index.
//!
//! ```text
//!  primary cursor ──► DocumentAssembler ──► Document + N forked cursors
//!                                                  │
//!                                                  ▼
//!                                       FieldIndexVerifier ──► Some(Document) / None
//! ```
//!
//! The assembler makes one forward pass over the group. For every kept field it
//! forks the primary cursor and seeks the fork to that field's index range.
//! The verifier then drives each fork forward until it finds the document's
//! uid or runs out of entries. Neither stage seeks backwards or needs random
//! access.

mod assembler;
mod verifier;

pub use assembler::{AssembledDocument, DocumentAssembler, VerificationCursor};
pub use verifier::FieldIndexVerifier;
