//! Error types for the Space delta core.
//!
//! Diffing, compaction and application are total and never fail. Errors
//! only come from decoding foreign bytes and from reading streams.

use std::io;
use thiserror::Error;

/// Errors from decoding serialized deltas.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("malformed delta: {0}")]
    MalformedDelta(String),
}

/// Errors from chunking a stream into deltas.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// A chunk bound of zero can never make progress.
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    /// The stream failed for a reason other than end-of-stream.
    #[error("stream read failed at offset {offset}: {source}")]
    Read {
        /// Stream position at which the read failed.
        offset: u64,
        #[source]
        source: io::Error,
    },
}
