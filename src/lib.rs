//! # fimerge
//!
//! Query-time verification of shard documents against their field index:
//! - Assembles one document from its primary entries per seek
//! - Confirms every field through forked, forward-only index cursors
//! - Returns the document as JSON only when every field is confirmed
//! - Serves shards from memory or from immutable shard files
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 FieldIndexMergingIterator                    │
//! │              (seek / has_top / top_key / top_value)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────┐  forks   ┌──────────────┐
//!   │  Assembler   │ ───────► │   Verifier   │
//!   │ (one pass)   │          │ (N cursors)  │
//!   └──────┬───────┘          └──────┬───────┘
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────────────────────────────────┐
//!   │   SortedKeyValueCursor (memory / SSTable)│
//!   └─────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod key;
pub mod cursor;
pub mod storage;
pub mod document;
pub mod merge;
pub mod shard;
pub mod iterator;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FiMergeError, Result};
pub use config::Config;
pub use cursor::{Range, SortedKeyValueCursor, SortedMapCursor};
pub use document::Document;
pub use iterator::FieldIndexMergingIterator;
pub use key::{Key, PartialKey, Value};
pub use shard::ShardBuilder;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fimerge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
