//! Delta application and chain replay.
//!
//! Offsets are evolving, so a script is only meaningful when folded in
//! order over a single buffer. [`Replayer`] is that fold.

use crate::delta::Delta;

/// Apply one delta to `buffer`, returning a new buffer.
///
/// For `offset <= len` the result is `buffer[..offset] ++ insert ++
/// buffer[offset + delete..]`, with the tail empty once the deleted span
/// runs past the end. For `offset > len` nothing from `buffer` is kept and
/// the result is `insert` alone.
pub fn apply(delta: &Delta, buffer: &[u8]) -> Vec<u8> {
    let n = buffer.len() as u64;
    if delta.offset > n {
        return delta.insert.to_vec();
    }

    let start = delta.offset as usize;
    let end = delta.delete_end().min(n) as usize;

    let mut out = Vec::with_capacity(start + delta.insert.len() + (buffer.len() - end));
    out.extend_from_slice(&buffer[..start]);
    out.extend_from_slice(&delta.insert);
    out.extend_from_slice(&buffer[end..]);
    out
}

/// Replay every delta of `script` against `source`, in order.
pub fn apply_script<'a, I>(script: I, source: &[u8]) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Delta>,
{
    let mut replayer = Replayer::from_content(source.to_vec());
    replayer.extend(script);
    replayer.finish()
}

/// Accumulator threading one evolving buffer through a chain of deltas.
///
/// Deltas must be pushed in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replayer {
    buffer: Vec<u8>,
    applied: u64,
}

impl Replayer {
    /// Start from an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously materialized content.
    pub fn from_content(content: Vec<u8>) -> Self {
        Self {
            buffer: content,
            applied: 0,
        }
    }

    /// Fold one delta into the buffer.
    pub fn push(&mut self, delta: &Delta) {
        let n = self.buffer.len() as u64;
        if delta.offset > n {
            self.buffer.clear();
            self.buffer.extend_from_slice(&delta.insert);
        } else {
            let start = delta.offset as usize;
            let end = delta.delete_end().min(n) as usize;
            self.buffer
                .splice(start..end, delta.insert.iter().copied());
        }
        self.applied += 1;
    }

    /// Fold every delta of `deltas`, in order.
    pub fn extend<'a, I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = &'a Delta>,
    {
        for delta in deltas {
            self.push(delta);
        }
    }

    /// Current content.
    pub fn content(&self) -> &[u8] {
        &self.buffer
    }

    /// Current content length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if the current content is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of deltas folded so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Consume the replayer, returning the content.
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_apply_append_at_end() {
        let delta = Delta::insertion(6, "blah");
        assert_eq!(apply(&delta, b"foobar"), b"foobarblah");
    }

    #[test]
    fn test_apply_replace_middle() {
        let delta = Delta::new(3, 2, "Ea");
        assert_eq!(apply(&delta, b"Hi World"), b"Hi Earld");
    }

    #[test]
    fn test_apply_delete_past_end_truncates() {
        let delta = Delta::deletion(3, 100);
        assert_eq!(apply(&delta, b"foobar"), b"foo");
    }

    #[test]
    fn test_apply_offset_beyond_buffer_keeps_insert_only() {
        let delta = Delta::new(10, 2, "xyz");
        assert_eq!(apply(&delta, b"foobar"), b"xyz");

        let empty = Delta::deletion(7, 1);
        assert!(apply(&empty, b"foobar").is_empty());
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let source = b"foobar".to_vec();
        let out = apply(&Delta::deletion(0, 3), &source);
        assert_eq!(source, b"foobar");
        assert_eq!(out, b"bar");
    }

    #[test]
    fn test_apply_script_threads_buffer() {
        let script = [
            Delta::new(1, 4, "i"),
            Delta::new(3, 2, "Ea"),
            Delta::new(6, 2, "th"),
        ];
        assert_eq!(apply_script(&script, b"Hello World"), b"Hi Earth");
    }

    #[test]
    fn test_replayer_counts_and_reads() {
        let mut replayer = Replayer::new();
        assert!(replayer.is_empty());

        replayer.push(&Delta::insertion(0, "foobarfoob"));
        replayer.push(&Delta::insertion(10, "ar"));

        assert_eq!(replayer.applied(), 2);
        assert_eq!(replayer.len(), 12);
        assert_eq!(replayer.content(), b"foobarfoobar");
        assert_eq!(replayer.finish(), b"foobarfoobar");
    }

    fn arb_delta() -> impl Strategy<Value = Delta> {
        (0u64..40, 0u64..40, prop::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(offset, delete, insert)| Delta::new(offset, delete, insert))
    }

    proptest! {
        #[test]
        fn test_apply_length_formula(
            buffer in prop::collection::vec(any::<u8>(), 0..32),
            delta in arb_delta(),
        ) {
            let n = buffer.len() as u64;
            let out = apply(&delta, &buffer);
            let expected = if delta.offset <= n {
                n - delta.delete.min(n - delta.offset) + delta.insert.len() as u64
            } else {
                delta.insert.len() as u64
            };
            prop_assert_eq!(out.len() as u64, expected);
        }

        #[test]
        fn test_replayer_matches_apply(
            buffer in prop::collection::vec(any::<u8>(), 0..32),
            deltas in prop::collection::vec(arb_delta(), 0..8),
        ) {
            let folded = deltas
                .iter()
                .fold(buffer.clone(), |acc, d| apply(d, &acc));

            let mut replayer = Replayer::from_content(buffer);
            replayer.extend(&deltas);

            prop_assert_eq!(replayer.applied(), deltas.len() as u64);
            prop_assert_eq!(replayer.finish(), folded);
        }
    }
}
