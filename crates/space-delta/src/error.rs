//! Error types for the Document API.

use space_delta_core::{ChunkError, ContentHash, CoreError, EditScript};
use thiserror::Error;

/// Errors that can occur during Document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Chunking error.
    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),

    /// Decoding error.
    #[error("decoding error: {0}")]
    Core(#[from] CoreError),

    /// The stream failed part way through seeding.
    ///
    /// `emitted` holds the deltas read before the failure; they have been
    /// applied to the document and remain valid.
    #[error("seed interrupted after {} deltas: {source}", .emitted.len())]
    SeedInterrupted {
        emitted: EditScript,
        #[source]
        source: ChunkError,
    },

    /// Seeding requires an empty document.
    #[error("document already has {len} bytes of content")]
    AlreadySeeded { len: usize },

    /// Replayed content does not match the expected hash.
    #[error("content mismatch: expected {expected}, got {actual}")]
    ContentMismatch {
        expected: ContentHash,
        actual: ContentHash,
    },

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for Document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
