//! Test fixtures and helpers.
//!
//! Readers with the awkward behavior real streams show, plus quick
//! document setup for integration tests.

use std::io::{self, Read};

use space_delta::{Document, DocumentConfig};

/// A reader that returns at most `step` bytes per call.
#[derive(Debug, Clone)]
pub struct TrickleReader {
    data: Vec<u8>,
    pos: usize,
    step: usize,
}

impl TrickleReader {
    pub fn new(data: Vec<u8>, step: usize) -> Self {
        Self {
            data,
            pos: 0,
            step: step.max(1),
        }
    }
}

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.step).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// A reader that serves `data`, then fails with `kind` on every call.
#[derive(Debug, Clone)]
pub struct FailingReader {
    data: Vec<u8>,
    pos: usize,
    kind: io::ErrorKind,
}

impl FailingReader {
    pub fn new(data: Vec<u8>, kind: io::ErrorKind) -> Self {
        Self { data, pos: 0, kind }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos == self.data.len() {
            return Err(io::Error::new(self.kind, "injected failure"));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// A reader that fails with `Interrupted` before every successful read.
#[derive(Debug, Clone)]
pub struct InterruptingReader<R> {
    inner: R,
    interrupt: bool,
    interrupts: usize,
}

impl<R> InterruptingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            interrupt: true,
            interrupts: 0,
        }
    }

    /// Number of `Interrupted` errors returned so far.
    pub fn interrupts(&self) -> usize {
        self.interrupts
    }
}

impl<R: Read> Read for InterruptingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt {
            self.interrupt = false;
            self.interrupts += 1;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.interrupt = true;
        self.inner.read(buf)
    }
}

/// Create a document already seeded with `content`.
pub fn seeded_document(content: &[u8], max_chunk: usize) -> Document {
    let config = DocumentConfig::default().with_max_chunk(max_chunk);
    let mut doc = Document::new(config).expect("valid config");
    doc.seed(content).expect("in-memory seed");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_delta::{ChunkError, Delta, DocumentError};
    use space_delta_core::{generate, generate_all};

    #[test]
    fn test_trickle_reader_coalesced() {
        let reader = TrickleReader::new(b"foobarfoobar".to_vec(), 3);
        let deltas = generate_all(reader, 10).unwrap();
        assert_eq!(
            deltas.into_deltas(),
            vec![Delta::insertion(0, "foobarfoob"), Delta::insertion(10, "ar")]
        );
    }

    #[test]
    fn test_interrupts_are_retried() {
        let mut reader = InterruptingReader::new(TrickleReader::new(b"foobarfoobar".to_vec(), 2));
        let deltas = generate_all(&mut reader, 5).unwrap();

        assert!(reader.interrupts() > 0);
        assert_eq!(deltas.len(), 3);
        assert_eq!(deltas.apply_to(b""), b"foobarfoobar");
    }

    #[test]
    fn test_failing_reader_reports_offset() {
        let reader = FailingReader::new(b"foobarf".to_vec(), io::ErrorKind::ConnectionReset);
        let mut iter = generate(reader, 4).unwrap();

        assert_eq!(iter.next().unwrap().unwrap(), Delta::insertion(0, "foob"));
        match iter.next() {
            Some(Err(ChunkError::Read { offset, source })) => {
                assert_eq!(offset, 7);
                assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
            }
            other => panic!("unexpected item: {other:?}"),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_seeded_document() {
        let doc = seeded_document(b"foobarfoobar", 5);
        assert_eq!(doc.content(), b"foobarfoobar");
        assert_eq!(doc.revision(), 3);
    }

    #[test]
    fn test_seed_from_failing_reader() {
        let mut doc = Document::new(DocumentConfig::default().with_max_chunk(4)).unwrap();
        let reader = FailingReader::new(b"foobarf".to_vec(), io::ErrorKind::BrokenPipe);

        let err = doc.seed(reader).unwrap_err();
        assert!(matches!(err, DocumentError::SeedInterrupted { ref emitted, .. } if emitted.len() == 1));
        assert_eq!(doc.content(), b"foob");
    }
}
