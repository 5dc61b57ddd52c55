//! # Space Delta
//!
//! The unified API for describing file content as chains of deltas.
//!
//! ## Overview
//!
//! A file's history is recorded as an ordered chain of deltas:
//!
//! - **Seeding**: brand-new content is chunked into insert-only deltas that
//!   each fit the record layer's payload bound
//! - **Updating**: later versions are diffed against the known content
//! - **Replaying**: recorded chains are folded, in order, to rebuild content
//!
//! ## Key Concepts
//!
//! - **Delta**: Immutable. Delete then insert at an offset.
//! - **Evolving offset**: Each delta addresses the buffer left by the
//!   previous delta, never the original.
//! - **Document**: The materialized content plus how many deltas built it.
//!
//! ## Usage
//!
//! ```rust
//! use space_delta::{Document, DocumentConfig};
//!
//! let config = DocumentConfig::default().with_max_chunk(10);
//! let mut doc = Document::new(config).unwrap();
//!
//! // Seed new content as bounded chunks
//! let seed = doc.seed(&b"foobarfoobar"[..]).unwrap();
//! assert_eq!(seed.len(), 2);
//!
//! // Describe an edit
//! let edit = doc.update(b"foobazfoobar").unwrap();
//! assert_eq!(edit.len(), 1);
//!
//! // Rebuild from the full chain
//! let chain: Vec<_> = seed.iter().chain(edit.iter()).cloned().collect();
//! assert_eq!(space_delta::reconstruct(&chain), doc.content());
//! ```
//!
//! ## Re-exports
//!
//! - `space_delta::core` - Core primitives (Delta, diff, compact, ...)
//!
//! ## Canonicalization
//!
//! Deltas handed to the record layer are encoded with deterministic CBOR.
//! See [`canonical`] module.

pub mod canonical;
pub mod document;
pub mod error;

// Re-export component crates
pub use space_delta_core as core;

// Re-export main types for convenience
pub use canonical::{decode_delta, decode_script, encode_delta, encode_script};
pub use document::{reconstruct, Document, DocumentConfig, DEFAULT_MAX_CHUNK};
pub use error::{DocumentError, Result};

// Re-export commonly used core types
pub use space_delta_core::{
    apply, apply_script, compact, diff, generate, split, ChunkError, ContentHash, CoreError,
    Delta, EditScript, Replayer,
};
