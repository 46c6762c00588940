//! In-memory cursor
//!
//! Cursor over a shared `BTreeMap` snapshot. Each step is an O(log n) range
//! lookup from the current key, so forks only need the `Arc` and a position.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::error::Result;
use crate::key::{Key, Value};

use super::{Range, SortedKeyValueCursor};

/// Cursor over an immutable sorted map
#[derive(Debug, Clone)]
pub struct SortedMapCursor {
    /// Shared snapshot; never mutated after construction
    data: Arc<BTreeMap<Key, Value>>,
    /// Range of the last seek
    range: Range,
    /// Current entry (None = unseeked or exhausted)
    top: Option<(Key, Value)>,
}

impl SortedMapCursor {
    /// Create an unpositioned cursor over `data`
    pub fn new(data: Arc<BTreeMap<Key, Value>>) -> Self {
        Self {
            data,
            range: Range::all(),
            top: None,
        }
    }

    /// Number of entries in the snapshot
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First entry at or after `lower` that is still inside the current range
    fn first_from(&self, lower: Bound<&Key>) -> Option<(Key, Value)> {
        self.data
            .range::<Key, _>((lower, Bound::Unbounded))
            .next()
            .filter(|(key, _)| !self.range.after_end_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
    }
}

impl FromIterator<(Key, Value)> for SortedMapCursor {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Self::new(Arc::new(iter.into_iter().collect()))
    }
}

impl SortedKeyValueCursor for SortedMapCursor {
    fn seek(&mut self, range: &Range) -> Result<()> {
        self.range = range.clone();
        self.top = self.first_from(range.start());
        Ok(())
    }

    fn top(&self) -> Option<(&Key, &Value)> {
        self.top.as_ref().map(|(key, value)| (key, value))
    }

    fn advance(&mut self) -> Result<()> {
        if let Some((current, _)) = self.top.take() {
            self.top = self.first_from(Bound::Excluded(&current));
        }
        Ok(())
    }

    fn fork(&self) -> Result<Box<dyn SortedKeyValueCursor>> {
        Ok(Box::new(SortedMapCursor::new(Arc::clone(&self.data))))
    }
}
