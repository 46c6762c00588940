//! Cursor Module
//!
//! Forward-only sorted iteration over `(Key, Value)` entries.
//!
//! ## Responsibilities
//! - Position on the first entry of a `Range` (`seek`)
//! - Expose the current entry without consuming it (`top`)
//! - Move strictly forward (`advance`)
//! - Hand out independent copies over the same snapshot (`fork`)
//!
//! ## Forking
//! A fork reads the same immutable snapshot as its source but owns its own
//! position. Seeking or advancing a fork never moves the source. Forks start
//! unpositioned and must be seeked before use.

mod memory;
mod range;

pub use memory::SortedMapCursor;
pub use range::Range;

use crate::error::Result;
use crate::key::{Key, Value};

/// A forward-only cursor over a sorted snapshot
///
/// Store failures surface as errors from `seek`, `advance`, and `fork`; callers
/// propagate them rather than retrying.
pub trait SortedKeyValueCursor {
    /// Position on the first entry inside `range`, or on nothing
    fn seek(&mut self, range: &Range) -> Result<()>;

    /// The current entry, if the cursor is positioned on one
    fn top(&self) -> Option<(&Key, &Value)>;

    /// Move to the next entry inside the last seeked range.
    /// Does nothing once the cursor is exhausted.
    fn advance(&mut self) -> Result<()>;

    /// An independent, unpositioned cursor over the same snapshot
    fn fork(&self) -> Result<Box<dyn SortedKeyValueCursor>>;

    fn has_top(&self) -> bool {
        self.top().is_some()
    }

    fn top_key(&self) -> Option<&Key> {
        self.top().map(|(key, _)| key)
    }

    fn top_value(&self) -> Option<&Value> {
        self.top().map(|(_, value)| value)
    }
}

impl<C: SortedKeyValueCursor + ?Sized> SortedKeyValueCursor for Box<C> {
    fn seek(&mut self, range: &Range) -> Result<()> {
        (**self).seek(range)
    }

    fn top(&self) -> Option<(&Key, &Value)> {
        (**self).top()
    }

    fn advance(&mut self) -> Result<()> {
        (**self).advance()
    }

    fn fork(&self) -> Result<Box<dyn SortedKeyValueCursor>> {
        (**self).fork()
    }
}
