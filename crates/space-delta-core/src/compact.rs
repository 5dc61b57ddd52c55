//! Compaction: folding adjacent deltas into fewer operations.
//!
//! Two neighbours merge when the second is anchored where the first starts,
//! or where the first's deleted span ends. The merged delta keeps the first
//! offset, sums the delete counts and concatenates the inserts in order.
//!
//! A merge is replay-neutral when the first delta inserts nothing (same
//! anchor) or inserts exactly as many bytes as it deletes (adjacent
//! anchor). Forward-delete runs and overwrite runs have these shapes.

use bytes::{Bytes, BytesMut};

use crate::delta::{Delta, EditScript};

/// Compact a script in one greedy left-to-right pass.
///
/// A freshly merged delta is tested again against the next one, so runs
/// collapse transitively. The output has no two adjacent mergeable deltas,
/// which makes `compact` idempotent.
pub fn compact<I>(script: I) -> EditScript
where
    I: IntoIterator<Item = Delta>,
{
    let mut out = EditScript::new();
    let mut pending: Option<Delta> = None;

    for next in script {
        pending = Some(match pending.take() {
            Some(current) if mergeable(&current, &next) => merge(current, next),
            Some(current) => {
                out.push(current);
                next
            }
            None => next,
        });
    }

    out.extend(pending);
    out
}

/// True if `second` may be folded into `first`.
pub fn mergeable(first: &Delta, second: &Delta) -> bool {
    second.offset == first.offset || Some(second.offset) == first.offset.checked_add(first.delete)
}

/// Merge two mergeable deltas.
fn merge(first: Delta, second: Delta) -> Delta {
    Delta {
        offset: first.offset,
        delete: first.delete.saturating_add(second.delete),
        insert: concat(first.insert, second.insert),
    }
}

fn concat(head: Bytes, tail: Bytes) -> Bytes {
    if tail.is_empty() {
        return head;
    }
    if head.is_empty() {
        return tail;
    }
    let mut buf = BytesMut::with_capacity(head.len() + tail.len());
    buf.extend_from_slice(&head);
    buf.extend_from_slice(&tail);
    buf.freeze()
}
