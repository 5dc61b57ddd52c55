//! The Document: one file's content as a chain of deltas.
//!
//! A Document holds the materialized content that the record layer has
//! seen so far. New content is seeded as bounded chunks, later versions are
//! described by diffing against what is already known, and recorded chains
//! are replayed strictly in order.

use std::io::Read;

use space_delta_core::{diff, generate, split_script, ContentHash, Delta, EditScript, Replayer};
use tracing::{debug, warn};

use crate::canonical::decode_script;
use crate::error::{DocumentError, Result};

/// Placeholder payload bound; the record layer normally supplies its own.
pub const DEFAULT_MAX_CHUNK: usize = 1024 * 1024;

/// Configuration for a Document.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Maximum inserted bytes per delta handed to the record layer.
    pub max_chunk: usize,
    /// Split update deltas whose insert exceeds `max_chunk`.
    pub split_updates: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_chunk: DEFAULT_MAX_CHUNK,
            split_updates: true,
        }
    }
}

impl DocumentConfig {
    /// Set the payload bound.
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk;
        self
    }

    /// Enable or disable splitting of update deltas.
    pub fn with_splitting(mut self, enabled: bool) -> Self {
        self.split_updates = enabled;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk == 0 {
            return Err(DocumentError::InvalidConfig(
                "max_chunk must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Materialized content plus the number of deltas that produced it.
#[derive(Debug, Clone)]
pub struct Document {
    content: Vec<u8>,
    hash: ContentHash,
    revision: u64,
    config: DocumentConfig,
}

impl Document {
    /// Create an empty document.
    pub fn new(config: DocumentConfig) -> Result<Self> {
        Self::from_content(Vec::new(), config)
    }

    /// Create a document from previously materialized content.
    pub fn from_content(content: Vec<u8>, config: DocumentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            hash: ContentHash::of(&content),
            content,
            revision: 0,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Current content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Current content length.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// True if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Hash of the current content.
    pub fn content_hash(&self) -> ContentHash {
        self.hash
    }

    /// Number of deltas applied since the document was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Consume the document, returning its content.
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Producing deltas
    // ─────────────────────────────────────────────────────────────────────────

    /// Seed an empty document from `reader`.
    ///
    /// Returns the insert-only deltas, each at most `max_chunk` bytes, in
    /// the order they must be recorded. If the stream fails, the deltas
    /// read so far are applied and returned inside the error.
    pub fn seed<R: Read>(&mut self, reader: R) -> Result<EditScript> {
        if !self.content.is_empty() {
            return Err(DocumentError::AlreadySeeded {
                len: self.content.len(),
            });
        }

        let mut emitted = EditScript::new();
        let mut failure = None;
        for item in generate(reader, self.config.max_chunk)? {
            match item {
                Ok(delta) => emitted.push(delta),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        self.fold(&emitted);

        match failure {
            None => {
                debug!(
                    len = self.content.len(),
                    deltas = emitted.len(),
                    hash = %self.hash,
                    "seeded document"
                );
                Ok(emitted)
            }
            Some(source) => {
                warn!(
                    len = self.content.len(),
                    deltas = emitted.len(),
                    error = %source,
                    "seed interrupted"
                );
                Err(DocumentError::SeedInterrupted { emitted, source })
            }
        }
    }

    /// Describe the change to `new_content` and adopt it.
    ///
    /// Returns an empty script when the content is unchanged.
    pub fn update(&mut self, new_content: &[u8]) -> Result<EditScript> {
        let target = ContentHash::of(new_content);
        if target == self.hash {
            debug!(hash = %target, "update is a no-op");
            return Ok(EditScript::new());
        }

        // Hunks are separated by at least one shared byte, so no two of
        // them can be merged without changing the result.
        let mut script = diff(&self.content, new_content);
        let hunks = script.len();

        if self.config.split_updates {
            script = split_script(&script, self.config.max_chunk)?;
        }

        self.content = new_content.to_vec();
        self.hash = target;
        self.revision += script.len() as u64;

        debug!(
            hunks,
            deltas = script.len(),
            len = self.content.len(),
            hash = %self.hash,
            "updated document"
        );
        Ok(script)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consuming deltas
    // ─────────────────────────────────────────────────────────────────────────

    /// Replay recorded deltas, in order, onto the current content.
    pub fn replay<'a, I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = &'a Delta>,
    {
        let before = self.revision;
        self.fold(deltas);
        debug!(
            applied = self.revision - before,
            len = self.content.len(),
            hash = %self.hash,
            "replayed deltas"
        );
    }

    /// Decode a canonically encoded script and replay it.
    pub fn replay_encoded(&mut self, bytes: &[u8]) -> Result<()> {
        let script = decode_script(bytes)?;
        self.replay(&script);
        Ok(())
    }

    /// Check the current content against an expected hash.
    pub fn verify(&self, expected: &ContentHash) -> Result<()> {
        if self.hash != *expected {
            return Err(DocumentError::ContentMismatch {
                expected: *expected,
                actual: self.hash,
            });
        }
        Ok(())
    }

    fn fold<'a, I>(&mut self, deltas: I)
    where
        I: IntoIterator<Item = &'a Delta>,
    {
        let mut replayer = Replayer::from_content(std::mem::take(&mut self.content));
        replayer.extend(deltas);
        self.revision += replayer.applied();
        self.content = replayer.finish();
        self.hash = ContentHash::of(&self.content);
    }
}

/// Rebuild content from a chronological chain, starting from nothing.
pub fn reconstruct<'a, I>(chain: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Delta>,
{
    let mut replayer = Replayer::new();
    replayer.extend(chain);
    replayer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn config(max_chunk: usize) -> DocumentConfig {
        DocumentConfig::default().with_max_chunk(max_chunk)
    }

    #[test]
    fn test_config_rejects_zero_chunk() {
        let result = Document::new(config(0));
        assert!(matches!(result, Err(DocumentError::InvalidConfig(_))));
    }

    #[test]
    fn test_seed_chunks_content() {
        let mut doc = Document::new(config(10)).unwrap();
        let deltas = doc.seed(Cursor::new(b"foobarfoobar")).unwrap();

        assert_eq!(
            deltas.into_deltas(),
            vec![Delta::insertion(0, "foobarfoob"), Delta::insertion(10, "ar")]
        );
        assert_eq!(doc.content(), b"foobarfoobar");
        assert_eq!(doc.revision(), 2);
        assert_eq!(doc.content_hash(), ContentHash::of(b"foobarfoobar"));
    }

    #[test]
    fn test_seed_requires_empty_document() {
        let mut doc = Document::from_content(b"abc".to_vec(), config(4)).unwrap();
        let result = doc.seed(Cursor::new(b"x"));
        assert!(matches!(result, Err(DocumentError::AlreadySeeded { len: 3 })));
    }

    #[test]
    fn test_seed_empty_stream() {
        let mut doc = Document::new(config(4)).unwrap();
        assert!(doc.seed(io::empty()).unwrap().is_empty());
        assert!(doc.is_empty());
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_update_returns_replayable_script() {
        let mut doc = Document::from_content(b"Hello World".to_vec(), config(64)).unwrap();
        let script = doc.update(b"Hi Earth").unwrap();

        assert_eq!(script.len(), 3);
        assert_eq!(script.apply_to(b"Hello World"), b"Hi Earth");
        assert_eq!(doc.content(), b"Hi Earth");
        assert_eq!(doc.revision(), 3);
    }

    #[test]
    fn test_update_unchanged_is_empty() {
        let mut doc = Document::from_content(b"same".to_vec(), config(64)).unwrap();
        assert!(doc.update(b"same").unwrap().is_empty());
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_update_splits_large_insert() {
        let mut doc = Document::from_content(b"ab".to_vec(), config(4)).unwrap();
        let script = doc.update(b"a0123456789b").unwrap();

        assert!(script.iter().all(|d| d.insert.len() <= 4));
        assert_eq!(script.len(), 3);
        assert_eq!(script.apply_to(b"ab"), b"a0123456789b");
    }

    #[test]
    fn test_update_without_splitting_keeps_hunk() {
        let mut doc =
            Document::from_content(b"ab".to_vec(), config(4).with_splitting(false)).unwrap();
        let script = doc.update(b"a0123456789b").unwrap();
        assert_eq!(script.into_deltas(), vec![Delta::insertion(1, "0123456789")]);
    }

    #[test]
    fn test_update_hunks_are_not_merge_candidates() {
        let mut doc = Document::from_content(b"pAs".to_vec(), config(64)).unwrap();
        let script = doc.update(b"At").unwrap();

        assert_eq!(
            script.clone().into_deltas(),
            vec![Delta::deletion(0, 1), Delta::new(1, 1, "t")]
        );
        assert_eq!(script.apply_to(b"pAs"), b"At");
    }

    #[test]
    fn test_replay_and_verify() {
        let mut source = Document::from_content(b"foobar".to_vec(), config(64)).unwrap();
        let script = source.update(b"barfoo").unwrap();

        let mut mirror = Document::from_content(b"foobar".to_vec(), config(64)).unwrap();
        mirror.replay(&script);

        assert_eq!(mirror.content(), b"barfoo");
        assert!(mirror.verify(&source.content_hash()).is_ok());
        assert!(matches!(
            mirror.verify(&ContentHash::of(b"foobar")),
            Err(DocumentError::ContentMismatch { .. })
        ));
    }

    #[test]
    fn test_replay_encoded_rejects_garbage() {
        let mut doc = Document::new(config(4)).unwrap();
        assert!(matches!(
            doc.replay_encoded(&[0xff]),
            Err(DocumentError::Core(_))
        ));
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_reconstruct_from_chain() {
        let chain = vec![
            Delta::insertion(0, "foobarfoob"),
            Delta::insertion(10, "ar"),
            Delta::deletion(0, 3),
        ];
        assert_eq!(reconstruct(&chain), b"barfoobar");
    }
}
