//! # Space Delta Testkit
//!
//! Testing utilities for the Space delta engine.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known diffs with expected scripts and canonical bytes
//! - **Generators**: Proptest strategies for buffers, deltas and edit pairs
//! - **Fixtures**: Readers with awkward behavior for exercising chunking
//!
//! ## Golden Vectors
//!
//! Golden vectors pin the diff output and its encoding across implementations:
//!
//! ```rust
//! use space_delta_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let script = space_delta_core::diff(vector.a, vector.b);
//!     assert_eq!(script, vector.expected_script(), "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use space_delta_testkit::generators::EditPair;
//!
//! proptest! {
//!     #[test]
//!     fn diff_replays(pair: EditPair) {
//!         let script = space_delta_core::diff(&pair.before, &pair.after);
//!         prop_assert_eq!(script.apply_to(&pair.before), pair.after);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Feed content through a reader that never returns more than 3 bytes:
//!
//! ```rust
//! use space_delta_testkit::fixtures::TrickleReader;
//!
//! let reader = TrickleReader::new(b"foobarfoobar".to_vec(), 3);
//! let deltas = space_delta_core::generate_all(reader, 10).unwrap();
//! assert_eq!(deltas.len(), 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{seeded_document, FailingReader, InterruptingReader, TrickleReader};
pub use generators::{edit_pair, EditPair};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
