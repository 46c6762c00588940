//! SSTable Module
//!
//! Immutable on-disk shard files holding sorted `(Key, Value)` entries.
//! Because a file never changes once written, every cursor opened on it reads
//! the same snapshot and forking a cursor is just opening another handle.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "FIMG" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Data Block (variable)                                   │
//! │   [KeyLen: u32][ValLen: u32][SortKey][Value]            │
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Index Block (variable)                                  │
//! │   [KeyLen: u32][Offset: u64][SortKey]                   │
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (16 bytes)                                       │
//! │   IndexOffset: u64 (8) | DataCRC: u32 (4) | Padding (4) │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! `SortKey` is the order-preserving encoding from [`crate::key::encode_sort_key`],
//! so the index can be searched as plain bytes.

mod builder;
mod cursor;
mod reader;

use std::io::Read;
use std::path::PathBuf;

pub use builder::SSTableBuilder;
pub use cursor::SSTableCursor;
pub use reader::SSTableReader;

use crate::error::Result;
use crate::key::Key;

// =============================================================================
// Shared Constants (used by builder, reader, cursor)
// =============================================================================

/// Magic bytes identifying a shard file
pub(crate) const MAGIC: &[u8; 4] = b"FIMG";

/// Current shard file format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8) = 14 bytes
pub(crate) const HEADER_SIZE: u64 = 14;

/// Footer size: IndexOffset (8) + DataCRC (4) + Padding (4) = 16 bytes
pub(crate) const FOOTER_SIZE: u64 = 16;

/// Entry header size: KeyLen (4) + ValLen (4)
pub(crate) const ENTRY_HEADER_SIZE: u64 = 8;

/// Read one data-block entry, returning `(sort_key, value)`
pub(crate) fn read_entry<R: Read>(reader: &mut R) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut header = [0u8; ENTRY_HEADER_SIZE as usize];
    reader.read_exact(&mut header)?;

    let key_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    let val_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

    let mut key = vec![0u8; key_len];
    reader.read_exact(&mut key)?;

    let mut value = vec![0u8; val_len];
    reader.read_exact(&mut value)?;

    Ok((key, value))
}

// =============================================================================
// SSTable Metadata
// =============================================================================

/// Metadata returned after writing a shard file
#[derive(Debug, Clone)]
pub struct SSTable {
    /// Path to the file
    pub path: PathBuf,
    /// Number of entries
    pub entry_count: u64,
    /// Smallest key, None when the file is empty
    pub min_key: Option<Key>,
    /// Largest key, None when the file is empty
    pub max_key: Option<Key>,
    /// File size in bytes
    pub file_size: u64,
}

impl SSTable {
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Quick check if a key might be in this file (range check)
    pub fn might_contain(&self, key: &Key) -> bool {
        match (&self.min_key, &self.max_key) {
            (Some(min), Some(max)) => key >= min && key <= max,
            _ => false,
        }
    }
}
