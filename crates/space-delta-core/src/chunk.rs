//! Chunking: turning a byte stream into bounded insert-only deltas.
//!
//! Used to seed brand-new content as a chain of records that each respect
//! the record layer's payload bound. [`split`] applies the same bound to a
//! single oversized delta.

use bytes::Bytes;
use std::io::Read;

use crate::delta::{Delta, EditScript};
use crate::error::ChunkError;

/// Lazily read `reader` into insert-only deltas of at most `max_chunk`
/// bytes each.
///
/// The iterator is finite and not restartable. Each chunk is filled
/// completely before it is emitted, so a stream of `len` bytes yields
/// `ceil(len / max_chunk)` deltas.
pub fn generate<R: Read>(reader: R, max_chunk: usize) -> Result<ChunkedDeltas<R>, ChunkError> {
    if max_chunk == 0 {
        return Err(ChunkError::ZeroChunkSize);
    }
    Ok(ChunkedDeltas {
        reader,
        max_chunk,
        offset: 0,
        done: false,
    })
}

/// Read the whole stream and collect its deltas.
pub fn generate_all<R: Read>(reader: R, max_chunk: usize) -> Result<EditScript, ChunkError> {
    generate(reader, max_chunk)?.collect()
}

/// Iterator returned by [`generate`].
///
/// Yields `Err` at most once; after an error or end of stream it only
/// returns `None`.
#[derive(Debug)]
pub struct ChunkedDeltas<R> {
    reader: R,
    max_chunk: usize,
    offset: u64,
    done: bool,
}

impl<R> ChunkedDeltas<R> {
    /// Bytes emitted so far, which is also the offset of the next delta.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The chunk bound this iterator was created with.
    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Give back the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ChunkedDeltas<R> {
    type Item = Result<Delta, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // read_to_end retries Interrupted and keeps partial reads in `chunk`.
        let mut chunk = Vec::new();
        let result = self
            .reader
            .by_ref()
            .take(self.max_chunk as u64)
            .read_to_end(&mut chunk);

        match result {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(read) => {
                let delta = Delta::insertion(self.offset, chunk);
                self.offset += read as u64;
                Some(Ok(delta))
            }
            Err(source) => {
                self.done = true;
                Some(Err(ChunkError::Read {
                    offset: self.offset + chunk.len() as u64,
                    source,
                }))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for ChunkedDeltas<R> {}

/// Split `delta` so no piece inserts more than `max_insert` bytes.
///
/// The first piece carries the whole delete and the first slice of the
/// insert; the rest are insert-only, each anchored just past the previous
/// slice. Replaying the pieces equals replaying `delta` whenever its offset
/// lies within the buffer. Piece offsets saturate at `u64::MAX`.
pub fn split(delta: &Delta, max_insert: usize) -> Result<EditScript, ChunkError> {
    if max_insert == 0 {
        return Err(ChunkError::ZeroChunkSize);
    }
    if delta.insert.len() <= max_insert {
        return Ok(EditScript::from(vec![delta.clone()]));
    }

    let mut pieces = EditScript::new();
    let mut offset = delta.offset;
    let mut start = 0;
    while start < delta.insert.len() {
        let end = (start + max_insert).min(delta.insert.len());
        let slice: Bytes = delta.insert.slice(start..end);
        let delete = if start == 0 { delta.delete } else { 0 };
        pieces.push(Delta::new(offset, delete, slice));
        offset = offset.saturating_add((end - start) as u64);
        start = end;
    }
    Ok(pieces)
}

/// Split every delta of `script`, keeping order.
pub fn split_script<'a, I>(script: I, max_insert: usize) -> Result<EditScript, ChunkError>
where
    I: IntoIterator<Item = &'a Delta>,
{
    let mut out = EditScript::new();
    for delta in script {
        out.extend(split(delta, max_insert)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::Replayer;
    use proptest::prelude::*;
    use std::io::{self, Cursor};

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Reader that fails after `ok` bytes.
    struct Broken {
        ok: usize,
        pos: usize,
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos >= self.ok {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "link dropped"));
            }
            let n = buf.len().min(self.ok - self.pos);
            buf[..n].fill(b'x');
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_generate_two_chunks() {
        let deltas = generate_all(Cursor::new(b"foobarfoobar"), 10).unwrap();
        assert_eq!(
            deltas.into_deltas(),
            vec![Delta::insertion(0, "foobarfoob"), Delta::insertion(10, "ar")]
        );
    }

    #[test]
    fn test_generate_empty_stream() {
        let mut chunks = generate(io::empty(), 4).unwrap();
        assert!(chunks.next().is_none());
        assert!(chunks.next().is_none());
        assert_eq!(chunks.offset(), 0);
    }

    #[test]
    fn test_generate_exact_multiple() {
        let deltas = generate_all(Cursor::new(b"abcdef"), 3).unwrap();
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas.apply_to(b""), b"abcdef");
    }

    #[test]
    fn test_generate_rejects_zero_chunk() {
        assert!(matches!(
            generate(io::empty(), 0),
            Err(ChunkError::ZeroChunkSize)
        ));
    }

    #[test]
    fn test_generate_coalesces_short_reads() {
        let reader = Trickle {
            data: b"foobarfoobar".to_vec(),
            pos: 0,
            step: 3,
        };
        let deltas = generate_all(reader, 5).unwrap();
        let sizes: Vec<usize> = deltas.iter().map(|d| d.insert.len()).collect();
        assert_eq!(sizes, vec![5, 5, 2]);
    }

    #[test]
    fn test_generate_stops_after_read_error() {
        let mut chunks = generate(Broken { ok: 7, pos: 0 }, 4).unwrap();

        let first = chunks.next().unwrap().unwrap();
        assert_eq!(first, Delta::insertion(0, "xxxx"));

        match chunks.next() {
            Some(Err(ChunkError::Read { offset, source })) => {
                assert_eq!(offset, 7);
                assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
            }
            other => panic!("expected read error, got {other:?}"),
        }

        assert!(chunks.next().is_none());
        assert_eq!(chunks.offset(), 4);
    }

    #[test]
    fn test_split_small_delta_unchanged() {
        let delta = Delta::new(2, 1, "abc");
        assert_eq!(split(&delta, 3).unwrap().into_deltas(), vec![delta]);
    }

    #[test]
    fn test_split_carries_delete_on_first_piece() {
        let delta = Delta::new(1, 4, "abcdefg");
        let pieces = split(&delta, 3).unwrap();
        assert_eq!(
            pieces.into_deltas(),
            vec![
                Delta::new(1, 4, "abc"),
                Delta::insertion(4, "def"),
                Delta::insertion(7, "g"),
            ]
        );
    }

    #[test]
    fn test_split_offset_saturates() {
        let pieces = split(&Delta::insertion(u64::MAX, "abcd"), 2).unwrap();
        assert_eq!(
            pieces.into_deltas(),
            vec![
                Delta::insertion(u64::MAX, "ab"),
                Delta::insertion(u64::MAX, "cd"),
            ]
        );

        let pieces = split(&Delta::new(u64::MAX - 1, 3, "abcd"), 1).unwrap();
        let offsets: Vec<u64> = pieces.iter().map(|d| d.offset).collect();
        assert_eq!(offsets, vec![u64::MAX - 1, u64::MAX, u64::MAX, u64::MAX]);
    }

    #[test]
    fn test_split_rejects_zero() {
        assert!(matches!(
            split(&Delta::insertion(0, "a"), 0),
            Err(ChunkError::ZeroChunkSize)
        ));
    }

    proptest! {
        #[test]
        fn test_chunking_completeness(
            data in prop::collection::vec(any::<u8>(), 0..200),
            max_chunk in 1usize..32,
        ) {
            let deltas = generate_all(Cursor::new(data.clone()), max_chunk).unwrap();
            prop_assert_eq!(deltas.len(), data.len().div_ceil(max_chunk));

            let mut replayer = Replayer::new();
            for delta in &deltas {
                prop_assert_eq!(delta.delete, 0);
                prop_assert!(delta.insert.len() <= max_chunk);
                prop_assert_eq!(delta.offset, replayer.len() as u64);
                replayer.push(delta);
            }
            prop_assert_eq!(replayer.finish(), data);
        }

        #[test]
        fn test_split_is_neutral(
            buffer in prop::collection::vec(any::<u8>(), 0..32),
            offset_seed in any::<u64>(),
            delete in 0u64..40,
            insert in prop::collection::vec(any::<u8>(), 0..64),
            max_insert in 1usize..16,
        ) {
            let offset = offset_seed % (buffer.len() as u64 + 1);
            let delta = Delta::new(offset, delete, insert);
            let pieces = split(&delta, max_insert).unwrap();

            prop_assert!(pieces.iter().all(|d| d.insert.len() <= max_insert));
            prop_assert_eq!(pieces.apply_to(&buffer), crate::apply::apply(&delta, &buffer));
        }
    }
}
