//! SSTable Builder
//!
//! Writes sorted entries to a new shard file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{FiMergeError, Result};
use crate::key::{encode_sort_key, Key, Value};

use super::{SSTable, ENTRY_HEADER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Builder for creating shard files from sorted entries
pub struct SSTableBuilder {
    path: PathBuf,
    writer: BufWriter<File>,
    entry_count: u64,
    /// Offset the next data entry will be written at
    current_offset: u64,
    /// Sort key and data offset of every entry, in write order
    index: Vec<(Vec<u8>, u64)>,
    /// First and most recently added keys
    min_key: Option<Key>,
    max_key: Option<Key>,
    /// CRC over the data block only
    data_hasher: crc32fast::Hasher,
}

impl SSTableBuilder {
    /// Create a new builder
    ///
    /// Writes the header immediately; call `add()` in strictly increasing key
    /// order, then `finish()` to write index and footer.
    pub fn new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);

        // entry_count placeholder, rewritten in finish
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            entry_count: 0,
            current_offset: HEADER_SIZE,
            index: Vec::new(),
            min_key: None,
            max_key: None,
            data_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add an entry; keys must be strictly increasing
    pub fn add(&mut self, key: &Key, value: &Value) -> Result<()> {
        if let Some(last) = &self.max_key {
            if key <= last {
                return Err(FiMergeError::Storage(format!(
                    "Out of order key {} after {}",
                    key, last
                )));
            }
        }

        let sort_key = encode_sort_key(key);
        let value = value.as_bytes();

        let key_len_bytes = (sort_key.len() as u32).to_le_bytes();
        let val_len_bytes = (value.len() as u32).to_le_bytes();

        self.writer.write_all(&key_len_bytes)?;
        self.writer.write_all(&val_len_bytes)?;
        self.writer.write_all(&sort_key)?;
        self.writer.write_all(value)?;

        self.data_hasher.update(&key_len_bytes);
        self.data_hasher.update(&val_len_bytes);
        self.data_hasher.update(&sort_key);
        self.data_hasher.update(value);

        let entry_size = ENTRY_HEADER_SIZE + sort_key.len() as u64 + value.len() as u64;
        self.index.push((sort_key, self.current_offset));
        self.current_offset += entry_size;
        self.entry_count += 1;

        if self.min_key.is_none() {
            self.min_key = Some(key.clone());
        }
        self.max_key = Some(key.clone());

        Ok(())
    }

    /// Write the index block and footer, patch the header count, and return
    /// the file's metadata
    pub fn finish(mut self) -> Result<SSTable> {
        let index_offset = self.current_offset;
        self.write_index_block()?;
        self.write_footer(index_offset)?;

        let mut file = self
            .writer
            .into_inner()
            .map_err(|e| FiMergeError::Storage(format!("Failed to flush shard file: {}", e)))?;
        // Count lives right after magic and version
        file.seek(SeekFrom::Start(6))?;
        file.write_all(&self.entry_count.to_le_bytes())?;
        file.sync_all()?;

        let file_size = file.metadata()?.len();

        tracing::debug!(
            path = %self.path.display(),
            entries = self.entry_count,
            bytes = file_size,
            "Wrote shard file"
        );

        Ok(SSTable {
            path: self.path,
            entry_count: self.entry_count,
            min_key: self.min_key,
            max_key: self.max_key,
            file_size,
        })
    }

    /// `[KeyLen u32][Offset u64][SortKey]` per entry
    fn write_index_block(&mut self) -> Result<()> {
        for (sort_key, offset) in &self.index {
            self.writer.write_all(&(sort_key.len() as u32).to_le_bytes())?;
            self.writer.write_all(&offset.to_le_bytes())?;
            self.writer.write_all(sort_key)?;
        }
        Ok(())
    }

    /// `[IndexOffset u64][DataCRC u32][Padding 4]`
    fn write_footer(&mut self, index_offset: u64) -> Result<()> {
        let data_crc = self.data_hasher.clone().finalize();
        self.writer.write_all(&index_offset.to_le_bytes())?;
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;
        self.writer.flush()?;
        Ok(())
    }
}
