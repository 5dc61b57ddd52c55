//! # Space Delta Core
//!
//! Pure primitives for describing how one byte buffer becomes another.
//!
//! This crate has no storage, no networking and no wire format. The
//! only I/O is reading a caller-supplied stream in [`chunk::generate`].
//!
//! ## Key Types
//!
//! - [`Delta`] - One edit: delete `delete` bytes at `offset`, then insert
//! - [`EditScript`] - An ordered list of deltas with evolving offsets
//! - [`Replayer`] - Folds a chain of deltas over one evolving buffer
//! - [`ContentHash`] - Blake3 digest of materialized content
//!
//! ## Operations
//!
//! - [`diff`] - Minimal edit script between two buffers
//! - [`compact`] - Merge adjacent deltas
//! - [`apply`] / [`apply_script`] - Replay deltas
//! - [`generate`] - Chunk a stream into bounded insert-only deltas
//! - [`split`] - Bound the insert size of an existing delta

pub mod apply;
pub mod chunk;
pub mod compact;
pub mod delta;
pub mod diff;
pub mod error;
pub mod hash;

pub use apply::{apply, apply_script, Replayer};
pub use chunk::{generate, generate_all, split, split_script, ChunkedDeltas};
pub use compact::{compact, mergeable};
pub use delta::{Delta, EditScript};
pub use diff::diff;
pub use error::{ChunkError, CoreError};
pub use hash::ContentHash;
