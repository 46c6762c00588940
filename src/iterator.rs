//! Iterator Module
//!
//! The seek / has-top / get-top surface a host scan engine drives.
//!
//! ## Responsibilities
//! - Turn host string options into a `Config`
//! - Run assembly, verification, and serialization for each seek
//! - Hold at most one result until the next seek
//!
//! ## State Machine
//! ```text
//! ┌────────────────────────┬──────────────────────────────┬────────────┐
//! │ Event                  │ Outcome                      │ Next state │
//! ├────────────────────────┼──────────────────────────────┼────────────┤
//! │ seek(range)            │ document verified            │ POSITIONED │
//! │ seek(range)            │ not found / rejected / error │ EXHAUSTED  │
//! │ seek(unbounded start)  │ -                            │ EXHAUSTED  │
//! │ advance()              │ -                            │ EXHAUSTED  │
//! └────────────────────────┴──────────────────────────────┴────────────┘
//! ```
//! Every iterator starts UNSEEKED.
//! A seek with an unbounded start is an unsupported full scan and yields no
//! result. Each seek answers exactly one document; the next document needs a
//! new seek with its own document range.

use std::collections::HashMap;

use tracing::debug;

use crate::config::Config;
use crate::cursor::{Range, SortedKeyValueCursor};
use crate::document::{self, Document};
use crate::error::Result;
use crate::key::{Key, Value};
use crate::merge::{DocumentAssembler, FieldIndexVerifier};

/// Where the iterator stands after the last seek
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Unseeked,
    Positioned {
        key: Key,
        value: Value,
        document: Document,
    },
    Exhausted,
}

/// Answers one verified document per seek
///
/// ## Resources
/// A seek forks one cursor per kept field of the document. The forks live
/// only for the duration of the seek.
pub struct FieldIndexMergingIterator<C> {
    /// Primary cursor over the shard
    source: C,
    config: Config,
    state: State,
}

impl<C: SortedKeyValueCursor> FieldIndexMergingIterator<C> {
    pub fn new(source: C, config: Config) -> Self {
        Self {
            source,
            config,
            state: State::Unseeked,
        }
    }

    /// Build an iterator from host string options (see [`Config::from_options`])
    pub fn init(source: C, options: &HashMap<String, String>) -> Self {
        Self::new(source, Config::from_options(options))
    }

    /// Seek to a document range and verify the document found there.
    ///
    /// A missing document, a failed verification, a blank id, and an unbounded
    /// start all leave the iterator without a top entry. Store and
    /// serialization failures are returned as errors and also leave it without
    /// a top entry.
    pub fn seek(&mut self, range: &Range) -> Result<()> {
        self.state = State::Exhausted;

        if range.is_infinite_start_key() {
            debug!("Unbounded seek is not supported; no result");
            return Ok(());
        }

        self.source.seek(range)?;

        let assembler = DocumentAssembler::new(&self.config.fields_to_skip);
        let assembled = match assembler.assemble(&mut self.source)? {
            Some(assembled) => assembled,
            None => {
                debug!(range = %range, "No document in range");
                return Ok(());
            }
        };

        let boundary = assembled.boundary;
        let verified = FieldIndexVerifier::verify(
            assembled.document,
            &assembled.uid,
            assembled.verification_cursors,
        )?;
        let document = match verified {
            Some(document) => document,
            None => return Ok(()),
        };

        let value = document::to_value(&document)?;
        debug!(
            doc_id = %document.doc_id,
            fields = document.document_fields.len(),
            "Document verified"
        );

        self.state = State::Positioned {
            key: boundary,
            value,
            document,
        };
        Ok(())
    }

    pub fn has_top(&self) -> bool {
        matches!(self.state, State::Positioned { .. })
    }

    /// First key of the verified document's group
    pub fn top_key(&self) -> Option<&Key> {
        match &self.state {
            State::Positioned { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The verified document as UTF-8 JSON
    pub fn top_value(&self) -> Option<&Value> {
        match &self.state {
            State::Positioned { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The verified document itself
    pub fn top_document(&self) -> Option<&Document> {
        match &self.state {
            State::Positioned { document, .. } => Some(document),
            _ => None,
        }
    }

    /// True before the first seek
    pub fn is_unseeked(&self) -> bool {
        self.state == State::Unseeked
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Lets a host stack the iterator like any other cursor
impl<C: SortedKeyValueCursor> SortedKeyValueCursor for FieldIndexMergingIterator<C> {
    fn seek(&mut self, range: &Range) -> Result<()> {
        FieldIndexMergingIterator::seek(self, range)
    }

    fn top(&self) -> Option<(&Key, &Value)> {
        match &self.state {
            State::Positioned { key, value, .. } => Some((key, value)),
            _ => None,
        }
    }

    /// There is never a second result; advancing exhausts the iterator.
    fn advance(&mut self) -> Result<()> {
        if self.has_top() {
            self.state = State::Exhausted;
        }
        Ok(())
    }

    fn fork(&self) -> Result<Box<dyn SortedKeyValueCursor>> {
        let source = self.source.fork()?;
        Ok(Box::new(FieldIndexMergingIterator::new(
            source,
            self.config.clone(),
        )))
    }
}
