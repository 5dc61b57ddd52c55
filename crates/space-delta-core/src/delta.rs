//! Delta and EditScript: the data model of the delta engine.
//!
//! A [`Delta`] removes `delete` bytes at `offset` and inserts `insert` in
//! their place. Offsets are *evolving*: they address the buffer produced by
//! every earlier delta of the same script, never the untouched source.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::apply::apply_script;

/// Number of inserted bytes shown by the `Debug` impl before truncating.
const DEBUG_PREVIEW: usize = 8;

/// One edit operation.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delta {
    /// Byte position in the evolving buffer.
    pub offset: u64,
    /// Number of bytes removed starting at `offset`.
    pub delete: u64,
    /// Bytes inserted at `offset` after removal.
    pub insert: Bytes,
}

impl Delta {
    /// Create a delta.
    pub fn new(offset: u64, delete: u64, insert: impl Into<Bytes>) -> Self {
        Self {
            offset,
            delete,
            insert: insert.into(),
        }
    }

    /// Create an insert-only delta.
    pub fn insertion(offset: u64, insert: impl Into<Bytes>) -> Self {
        Self::new(offset, 0, insert)
    }

    /// Create a delete-only delta.
    pub fn deletion(offset: u64, delete: u64) -> Self {
        Self::new(offset, delete, Bytes::new())
    }

    /// True if applying this delta to an in-range buffer changes nothing.
    pub fn is_noop(&self) -> bool {
        self.delete == 0 && self.insert.is_empty()
    }

    /// True if this delta only inserts.
    pub fn is_insert_only(&self) -> bool {
        self.delete == 0 && !self.insert.is_empty()
    }

    /// End of the deleted span, saturating at `u64::MAX`.
    pub fn delete_end(&self) -> u64 {
        self.offset.saturating_add(self.delete)
    }
}

impl fmt::Debug for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.insert[..self.insert.len().min(DEBUG_PREVIEW)];
        let ellipsis = if self.insert.len() > DEBUG_PREVIEW { "..." } else { "" };
        write!(
            f,
            "Delta(offset={}, delete={}, insert={}{} [{}B])",
            self.offset,
            self.delete,
            hex::encode(shown),
            ellipsis,
            self.insert.len()
        )
    }
}

/// An ordered sequence of deltas, replayed front to back.
///
/// Order is significant: each delta's offset is relative to the buffer left
/// behind by the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript(Vec<Delta>);

impl EditScript {
    /// Create an empty script.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of deltas.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the script has no deltas.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a delta.
    pub fn push(&mut self, delta: Delta) {
        self.0.push(delta);
    }

    /// Iterate over the deltas in replay order.
    pub fn iter(&self) -> std::slice::Iter<'_, Delta> {
        self.0.iter()
    }

    /// Borrow the deltas as a slice.
    pub fn as_slice(&self) -> &[Delta] {
        &self.0
    }

    /// Unwrap into the underlying vector.
    pub fn into_deltas(self) -> Vec<Delta> {
        self.0
    }

    /// Total number of inserted bytes.
    pub fn inserted_len(&self) -> usize {
        self.0.iter().map(|d| d.insert.len()).sum()
    }

    /// Replay the script against `source`, returning the resulting buffer.
    pub fn apply_to(&self, source: &[u8]) -> Vec<u8> {
        apply_script(self, source)
    }
}

impl From<Vec<Delta>> for EditScript {
    fn from(deltas: Vec<Delta>) -> Self {
        Self(deltas)
    }
}

impl FromIterator<Delta> for EditScript {
    fn from_iter<I: IntoIterator<Item = Delta>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Delta> for EditScript {
    fn extend<I: IntoIterator<Item = Delta>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for EditScript {
    type Item = Delta;
    type IntoIter = std::vec::IntoIter<Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Delta;
    type IntoIter = std::slice::Iter<'a, Delta>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl AsRef<[Delta]> for EditScript {
    fn as_ref(&self) -> &[Delta] {
        &self.0
    }
}
