//! Key ranges
//!
//! A range is an interval of keys with independently inclusive or exclusive
//! bounds. A range without a start bound is an unrestricted scan.

use std::fmt;
use std::ops::Bound;

use crate::key::Key;

/// An interval of keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    start: Bound<Key>,
    end: Bound<Key>,
}

impl Default for Range {
    fn default() -> Self {
        Self::all()
    }
}

impl Range {
    /// Range between two keys with explicit inclusiveness on each side
    pub fn new(start: Key, start_inclusive: bool, end: Key, end_inclusive: bool) -> Self {
        Self {
            start: if start_inclusive {
                Bound::Included(start)
            } else {
                Bound::Excluded(start)
            },
            end: if end_inclusive {
                Bound::Included(end)
            } else {
                Bound::Excluded(end)
            },
        }
    }

    /// Range from raw bounds
    pub fn from_bounds(start: Bound<Key>, end: Bound<Key>) -> Self {
        Self { start, end }
    }

    /// The unrestricted range covering every key
    pub fn all() -> Self {
        Self {
            start: Bound::Unbounded,
            end: Bound::Unbounded,
        }
    }

    /// Every key at or after `start`
    pub fn starting_at(start: Key) -> Self {
        Self {
            start: Bound::Included(start),
            end: Bound::Unbounded,
        }
    }

    pub fn start(&self) -> Bound<&Key> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Bound<&Key> {
        self.end.as_ref()
    }

    /// The start key, if the range has one
    pub fn start_key(&self) -> Option<&Key> {
        match &self.start {
            Bound::Included(key) | Bound::Excluded(key) => Some(key),
            Bound::Unbounded => None,
        }
    }

    pub fn is_infinite_start_key(&self) -> bool {
        matches!(self.start, Bound::Unbounded)
    }

    pub fn is_infinite_stop_key(&self) -> bool {
        matches!(self.end, Bound::Unbounded)
    }

    /// Whether `key` sorts before the start of this range
    pub fn before_start_key(&self, key: &Key) -> bool {
        match &self.start {
            Bound::Included(start) => key < start,
            Bound::Excluded(start) => key <= start,
            Bound::Unbounded => false,
        }
    }

    /// Whether `key` sorts after the end of this range
    pub fn after_end_key(&self, key: &Key) -> bool {
        match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        }
    }

    pub fn contains(&self, key: &Key) -> bool {
        !self.before_start_key(key) && !self.after_end_key(key)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.start {
            Bound::Included(key) => write!(f, "[{}", key)?,
            Bound::Excluded(key) => write!(f, "({}", key)?,
            Bound::Unbounded => write!(f, "(-inf")?,
        }
        match &self.end {
            Bound::Included(key) => write!(f, ", {}]", key),
            Bound::Excluded(key) => write!(f, ", {})", key),
            Bound::Unbounded => write!(f, ", +inf)"),
        }
    }
}
