//! SSTable Cursor
//!
//! Seeks through the shared index, then reads the data block sequentially.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::ops::Bound;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cursor::{Range, SortedKeyValueCursor};
use crate::error::Result;
use crate::key::{decode_sort_key, encode_sort_key, Key, Value};

use super::{read_entry, ENTRY_HEADER_SIZE};

/// Cursor over one shard file
pub struct SSTableCursor {
    path: Arc<PathBuf>,
    /// Own file handle; forks open another one
    file: BufReader<File>,
    /// Index shared with the reader and every fork
    index: Arc<BTreeMap<Vec<u8>, u64>>,
    /// Stop reading when we reach this offset (start of index block)
    end_offset: u64,
    /// Offset of the next entry to read
    next_offset: u64,
    range: Range,
    top: Option<(Key, Value)>,
}

impl SSTableCursor {
    pub(super) fn open(
        path: Arc<PathBuf>,
        index: Arc<BTreeMap<Vec<u8>, u64>>,
        end_offset: u64,
    ) -> Result<Self> {
        let file = BufReader::new(File::open(path.as_path())?);
        Ok(Self {
            path,
            file,
            index,
            end_offset,
            next_offset: end_offset,
            range: Range::all(),
            top: None,
        })
    }

    /// Offset of the first indexed entry at or after `start`
    fn locate(&self, start: Bound<&Key>) -> Option<u64> {
        let lower = match start {
            Bound::Included(key) => Bound::Included(encode_sort_key(key)),
            Bound::Excluded(key) => Bound::Excluded(encode_sort_key(key)),
            Bound::Unbounded => Bound::Unbounded,
        };
        self.index
            .range::<Vec<u8>, _>((lower, Bound::Unbounded))
            .next()
            .map(|(_, &offset)| offset)
    }

    /// Read the entry at `next_offset` into `top`, honoring the range end
    fn read_next(&mut self) -> Result<()> {
        if self.next_offset >= self.end_offset {
            self.top = None;
            return Ok(());
        }

        let (sort_key, value) = read_entry(&mut self.file)?;
        self.next_offset += ENTRY_HEADER_SIZE + sort_key.len() as u64 + value.len() as u64;

        let key = decode_sort_key(&sort_key)?;
        self.top = if self.range.after_end_key(&key) {
            None
        } else {
            Some((key, Value::from(value)))
        };
        Ok(())
    }
}

impl SortedKeyValueCursor for SSTableCursor {
    fn seek(&mut self, range: &Range) -> Result<()> {
        self.range = range.clone();
        match self.locate(range.start()) {
            Some(offset) => {
                self.file.seek(SeekFrom::Start(offset))?;
                self.next_offset = offset;
                self.read_next()
            }
            None => {
                self.next_offset = self.end_offset;
                self.top = None;
                Ok(())
            }
        }
    }

    fn top(&self) -> Option<(&Key, &Value)> {
        self.top.as_ref().map(|(key, value)| (key, value))
    }

    fn advance(&mut self) -> Result<()> {
        if self.top.is_none() {
            return Ok(());
        }
        self.read_next()
    }

    fn fork(&self) -> Result<Box<dyn SortedKeyValueCursor>> {
        let fork = SSTableCursor::open(
            Arc::clone(&self.path),
            Arc::clone(&self.index),
            self.end_offset,
        )?;
        Ok(Box::new(fork))
    }
}
