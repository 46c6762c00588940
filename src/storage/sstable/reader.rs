//! SSTable Reader
//!
//! Opens a shard file, validates it, and loads its index so cursors can seek
//! in O(log n).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{FiMergeError, Result};
use crate::key::{decode_sort_key, Key};

use super::cursor::SSTableCursor;
use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Validated, opened shard file
///
/// The index is shared with every cursor handed out, so cursors and their
/// forks cost one file handle each.
#[derive(Debug)]
pub struct SSTableReader {
    path: Arc<PathBuf>,
    /// In-memory index: sort key → file offset
    index: Arc<BTreeMap<Vec<u8>, u64>>,
    entry_count: u64,
    /// Index block starting offset (end of data block)
    index_offset: u64,
}

impl SSTableReader {
    /// Open a shard file for reading
    ///
    /// Checks magic, version, and the data block CRC, then loads the index.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = BufReader::new(File::open(path)?);
        let file_size = file.get_ref().metadata()?.len();

        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(FiMergeError::Corruption(format!(
                "{} is too small to be a shard file ({} bytes)",
                path.display(),
                file_size
            )));
        }

        // Header
        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(FiMergeError::Corruption(format!(
                "Invalid magic: expected FIMG, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(FiMergeError::Corruption(format!(
                "Unsupported shard file version: {}",
                version
            )));
        }

        let mut count = [0u8; 8];
        count.copy_from_slice(&header[6..14]);
        let entry_count = u64::from_le_bytes(count);

        // Footer
        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;

        let mut offset_bytes = [0u8; 8];
        offset_bytes.copy_from_slice(&footer[0..8]);
        let index_offset = u64::from_le_bytes(offset_bytes);
        let data_crc = u32::from_le_bytes([footer[8], footer[9], footer[10], footer[11]]);

        if index_offset < HEADER_SIZE || index_offset > file_size - FOOTER_SIZE {
            return Err(FiMergeError::Corruption(format!(
                "Index offset {} outside file of {} bytes",
                index_offset, file_size
            )));
        }

        // Data block CRC
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        let mut hasher = crc32fast::Hasher::new();
        let mut remaining = index_offset - HEADER_SIZE;
        let mut buf = vec![0u8; 64 * 1024];
        while remaining > 0 {
            let chunk = remaining.min(buf.len() as u64) as usize;
            file.read_exact(&mut buf[..chunk])?;
            hasher.update(&buf[..chunk]);
            remaining -= chunk as u64;
        }
        let actual_crc = hasher.finalize();
        if actual_crc != data_crc {
            return Err(FiMergeError::Corruption(format!(
                "Data CRC mismatch: footer {:08x}, computed {:08x}",
                data_crc, actual_crc
            )));
        }

        // Index block: [key_len(4)][offset(8)][key], right after the data block
        let index_block_size = (file_size - FOOTER_SIZE - index_offset) as usize;
        let mut index_data = vec![0u8; index_block_size];
        file.read_exact(&mut index_data)?;

        let mut index = BTreeMap::new();
        let mut pos = 0;
        while pos < index_data.len() {
            if pos + 12 > index_data.len() {
                return Err(FiMergeError::Corruption(
                    "Truncated index entry header".to_string(),
                ));
            }
            let key_len = u32::from_le_bytes([
                index_data[pos],
                index_data[pos + 1],
                index_data[pos + 2],
                index_data[pos + 3],
            ]) as usize;
            offset_bytes.copy_from_slice(&index_data[pos + 4..pos + 12]);
            let offset = u64::from_le_bytes(offset_bytes);
            pos += 12;

            if pos + key_len > index_data.len() {
                return Err(FiMergeError::Corruption("Truncated index key".to_string()));
            }
            index.insert(index_data[pos..pos + key_len].to_vec(), offset);
            pos += key_len;
        }

        if index.len() as u64 != entry_count {
            return Err(FiMergeError::Corruption(format!(
                "Header claims {} entries, index holds {}",
                entry_count,
                index.len()
            )));
        }

        tracing::debug!(
            path = %path.display(),
            entries = entry_count,
            "Opened shard file"
        );

        Ok(Self {
            path: Arc::new(path.to_path_buf()),
            index: Arc::new(index),
            entry_count,
            index_offset,
        })
    }

    /// Open an unpositioned cursor over this file
    pub fn cursor(&self) -> Result<SSTableCursor> {
        SSTableCursor::open(
            Arc::clone(&self.path),
            Arc::clone(&self.index),
            self.index_offset,
        )
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Smallest key in the file
    pub fn min_key(&self) -> Result<Option<Key>> {
        self.index.keys().next().map(|k| decode_sort_key(k)).transpose()
    }

    /// Largest key in the file
    pub fn max_key(&self) -> Result<Option<Key>> {
        self.index.keys().next_back().map(|k| decode_sort_key(k)).transpose()
    }
}
