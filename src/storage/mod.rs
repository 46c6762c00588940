//! Storage Module
//!
//! Immutable shard files for serving cursors from disk.
//!
//! ## Responsibilities
//! - Persist a shard's sorted entries in one self-validating file
//! - Seek to any key in O(log n) through an in-memory index
//! - Hand out independent cursors over the same immutable file
//!
//! Shards are written once and never modified, which is what makes forked
//! cursors see a consistent snapshot without any locking.

mod sstable;

pub use sstable::{SSTable, SSTableBuilder, SSTableCursor, SSTableReader};
