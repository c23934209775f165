//! Ordered, indexable mint queue with a resumable cursor.

use crate::metadata::MetadataRecord;

/// Records in file order plus the index of the next item to process.
///
/// Index 0 holds the template row and is never handed out. The records are
/// fixed at construction; only the cursor moves.
#[derive(Debug, Clone)]
pub struct MintQueue {
    records: Vec<MetadataRecord>,
    cursor: usize,
}

impl MintQueue {
    /// Build a queue starting at `start`.
    ///
    /// An unset or non-positive start means 1. A start beyond the last record
    /// is clamped to the queue length, which leaves nothing to process.
    pub fn new(records: Vec<MetadataRecord>, start: Option<i64>) -> Self {
        let requested = start
            .filter(|s| *s > 0)
            .map(|s| usize::try_from(s).unwrap_or(usize::MAX))
            .unwrap_or(1);
        let cursor = requested.min(records.len().max(1));

        Self { records, cursor }
    }

    /// Number of records including the template row.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the next item to process.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Items left between the cursor and the end of the queue.
    pub fn actionable(&self) -> usize {
        self.records.len().saturating_sub(self.cursor)
    }

    /// The next unprocessed item, if any.
    pub fn current(&self) -> Option<(usize, &MetadataRecord)> {
        self.records.get(self.cursor).map(|record| (self.cursor, record))
    }

    /// Move past the current item. Does nothing once the queue is exhausted.
    pub fn advance(&mut self) {
        if self.cursor < self.records.len() {
            self.cursor += 1;
        }
    }
}
