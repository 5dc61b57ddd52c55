//! Proptest generators for property-based testing.

use proptest::prelude::*;

use space_delta_core::{Delta, EditScript};

/// Generate content bytes of at most `max_len` bytes.
pub fn buffer(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate content over a tiny alphabet, so diffs find plenty of matches.
pub fn text(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abc\n".to_vec()), 0..=max_len)
}

/// Generate an arbitrary delta with bounded fields.
pub fn delta(max_offset: u64, max_delete: u64, max_insert: usize) -> impl Strategy<Value = Delta> {
    (0..=max_offset, 0..=max_delete, buffer(max_insert))
        .prop_map(|(offset, delete, insert)| Delta::new(offset, delete, insert))
}

/// Generate an arbitrary script; offsets may fall past the buffer.
pub fn script(max_len: usize) -> impl Strategy<Value = EditScript> {
    prop::collection::vec(delta(32, 8, 8), 0..=max_len).prop_map(EditScript::from)
}

/// Two versions of the same content.
#[derive(Debug, Clone)]
pub struct EditPair {
    pub before: Vec<u8>,
    pub after: Vec<u8>,
}

/// A single random edit applied to a base buffer.
#[derive(Debug, Clone)]
enum Edit {
    Insert(usize, Vec<u8>),
    Delete(usize, usize),
    Replace(usize, usize, Vec<u8>),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), text(6)).prop_map(|(at, bytes)| Edit::Insert(at, bytes)),
        (any::<usize>(), 0usize..6).prop_map(|(at, len)| Edit::Delete(at, len)),
        (any::<usize>(), 0usize..6, text(6))
            .prop_map(|(at, len, bytes)| Edit::Replace(at, len, bytes)),
    ]
}

fn apply_edit(buf: &mut Vec<u8>, edit: Edit) {
    let clamp = |at: usize, buf: &Vec<u8>| at % (buf.len() + 1);
    match edit {
        Edit::Insert(at, bytes) => {
            let at = clamp(at, buf);
            buf.splice(at..at, bytes);
        }
        Edit::Delete(at, len) => {
            let at = clamp(at, buf);
            let end = (at + len).min(buf.len());
            buf.drain(at..end);
        }
        Edit::Replace(at, len, bytes) => {
            let at = clamp(at, buf);
            let end = (at + len).min(buf.len());
            buf.splice(at..end, bytes);
        }
    }
}

/// Generate a base buffer and a version with a handful of local edits.
pub fn edit_pair() -> impl Strategy<Value = EditPair> {
    (text(64), prop::collection::vec(edit(), 0..5)).prop_map(|(before, edits)| {
        let mut after = before.clone();
        for e in edits {
            apply_edit(&mut after, e);
        }
        EditPair { before, after }
    })
}

impl Arbitrary for EditPair {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        edit_pair().boxed()
    }
}
