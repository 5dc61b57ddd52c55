//! Golden test vectors for deterministic verification.
//!
//! These vectors ensure that diffing, compaction and canonical encoding
//! produce identical results across all implementations.

use serde_json::{json, Value};
use space_delta::encode_script;
use space_delta_core::{compact, diff, Delta, EditScript};

/// A delta written as `(offset, delete, insert)`.
pub type RawDelta = (u64, u64, &'static [u8]);

fn to_script(raw: &[RawDelta]) -> EditScript {
    raw.iter()
        .map(|&(offset, delete, insert)| Delta::new(offset, delete, insert))
        .collect()
}

/// A golden diff vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Old content.
    pub a: &'static [u8],
    /// New content.
    pub b: &'static [u8],
    /// Expected edit script.
    pub expected: &'static [RawDelta],
    /// Expected canonical script bytes (hex). Empty if not pinned.
    pub expected_script_hex: &'static str,
}

impl GoldenVector {
    /// The expected script as deltas.
    pub fn expected_script(&self) -> EditScript {
        to_script(self.expected)
    }
}

/// Get all golden diff vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty",
            a: b"",
            b: b"",
            expected: &[],
            expected_script_hex: "80",
        },
        GoldenVector {
            name: "equal",
            a: b"foobar",
            b: b"foobar",
            expected: &[],
            expected_script_hex: "80",
        },
        GoldenVector {
            name: "greeting",
            a: b"Hello World",
            b: b"Hi Earth",
            expected: &[(1, 4, b"i"), (3, 2, b"Ea"), (6, 2, b"th")],
            expected_script_hex: concat!(
                "83",
                "a3", "6664656c657465", "04", "66696e73657274", "4169", "666f6666736574", "01",
                "a3", "6664656c657465", "02", "66696e73657274", "424561", "666f6666736574", "03",
                "a3", "6664656c657465", "02", "66696e73657274", "427468", "666f6666736574", "06",
            ),
        },
        GoldenVector {
            name: "insert_prefix",
            a: b"bar",
            b: b"foobar",
            expected: &[(0, 0, b"foo")],
            expected_script_hex: concat!(
                "81",
                "a3", "6664656c657465", "00", "66696e73657274", "43666f6f", "666f6666736574", "00",
            ),
        },
        GoldenVector {
            name: "insert_infix",
            a: b"foar",
            b: b"foobar",
            expected: &[(2, 0, b"ob")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "insert_suffix",
            a: b"foo",
            b: b"foobar",
            expected: &[(3, 0, b"bar")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "delete_prefix",
            a: b"foobar",
            b: b"bar",
            expected: &[(0, 3, b"")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "delete_infix",
            a: b"foobar",
            b: b"foar",
            expected: &[(2, 2, b"")],
            expected_script_hex: concat!(
                "81",
                "a3", "6664656c657465", "02", "66696e73657274", "40", "666f6666736574", "02",
            ),
        },
        GoldenVector {
            name: "delete_suffix",
            a: b"foobar",
            b: b"foo",
            expected: &[(3, 3, b"")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "swap",
            a: b"foobar",
            b: b"barfoo",
            expected: &[(0, 3, b""), (3, 0, b"foo")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "delete_vowels",
            a: b"foobar",
            b: b"fbr",
            expected: &[(1, 2, b""), (2, 1, b"")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "delete_consonants",
            a: b"foobar",
            b: b"ooa",
            expected: &[(0, 1, b""), (2, 1, b""), (3, 1, b"")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "insert_vowels",
            a: b"fbr",
            b: b"foobar",
            expected: &[(1, 0, b"oo"), (4, 0, b"a")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "insert_consonants",
            a: b"ooa",
            b: b"foobar",
            expected: &[(0, 0, b"f"), (3, 0, b"b"), (5, 0, b"r")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "replace",
            a: b"foo",
            b: b"bar",
            expected: &[(0, 3, b"bar")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "reverse",
            a: b"foobar",
            b: b"raboof",
            expected: &[(0, 1, b"rab"), (5, 3, b"f")],
            expected_script_hex: "",
        },
        GoldenVector {
            name: "binary",
            a: &[0x00, 0xff, 0x10, 0x20],
            b: &[0x00, 0x10, 0x20, 0xfe],
            expected: &[(1, 1, b""), (3, 0, &[0xfe])],
            expected_script_hex: "",
        },
    ]
}

/// A golden compaction vector.
#[derive(Debug, Clone)]
pub struct CompactVector {
    pub name: &'static str,
    pub input: &'static [RawDelta],
    pub expected: &'static [RawDelta],
}

impl CompactVector {
    /// The input script.
    pub fn input_script(&self) -> EditScript {
        to_script(self.input)
    }

    /// The expected compacted script.
    pub fn expected_script(&self) -> EditScript {
        to_script(self.expected)
    }
}

/// Get all golden compaction vectors.
pub fn compact_vectors() -> Vec<CompactVector> {
    vec![
        CompactVector {
            name: "empty",
            input: &[],
            expected: &[],
        },
        CompactVector {
            name: "single",
            input: &[(0, 0, b"")],
            expected: &[(0, 0, b"")],
        },
        CompactVector {
            name: "consecutive",
            input: &[(0, 0, b""), (1, 0, b"")],
            expected: &[(0, 0, b""), (1, 0, b"")],
        },
        CompactVector {
            name: "delete_delete",
            input: &[(0, 1, b""), (1, 1, b"")],
            expected: &[(0, 2, b"")],
        },
        CompactVector {
            name: "insert_insert",
            input: &[(0, 0, b"a"), (0, 0, b"b")],
            expected: &[(0, 0, b"ab")],
        },
        CompactVector {
            name: "delete_insert",
            input: &[(0, 1, b""), (0, 0, b"a")],
            expected: &[(0, 1, b"a")],
        },
        CompactVector {
            name: "insert_delete",
            input: &[(0, 0, b"a"), (0, 1, b"")],
            expected: &[(0, 1, b"a")],
        },
        CompactVector {
            name: "run",
            input: &[(4, 1, b"x"), (5, 1, b"y"), (6, 1, b"z"), (20, 0, b"tail")],
            expected: &[(4, 3, b"xyz"), (20, 0, b"tail")],
        },
    ]
}

fn raw_to_json(raw: &[RawDelta]) -> Value {
    raw.iter()
        .map(|&(offset, delete, insert)| {
            json!({ "offset": offset, "delete": delete, "insert": hex::encode(insert) })
        })
        .collect()
}

/// Export every vector as JSON, with byte strings in hex.
///
/// This is the file handed to other implementations.
pub fn export_json() -> Value {
    let diffs: Vec<Value> = all_vectors()
        .iter()
        .map(|v| {
            json!({
                "name": v.name,
                "a": hex::encode(v.a),
                "b": hex::encode(v.b),
                "expected": raw_to_json(v.expected),
                "script": hex::encode(encode_script(&v.expected_script())),
            })
        })
        .collect();

    let compactions: Vec<Value> = compact_vectors()
        .iter()
        .map(|v| {
            json!({
                "name": v.name,
                "input": raw_to_json(v.input),
                "expected": raw_to_json(v.expected),
            })
        })
        .collect();

    json!({ "diff": diffs, "compact": compactions })
}

/// Verify all golden diff vectors.
///
/// Returns `(name, matches, script_hex)` for each vector. Vectors without
/// pinned bytes only check the script itself.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let script = diff(v.a, v.b);
            let hex = hex::encode(encode_script(&script));

            let script_matches = script == v.expected_script();
            let bytes_match = v.expected_script_hex.is_empty() || hex == v.expected_script_hex;

            (v.name.to_string(), script_matches && bytes_match, hex)
        })
        .collect()
}

/// Verify all golden compaction vectors, returning the names that failed.
pub fn verify_compact_vectors() -> Vec<String> {
    compact_vectors()
        .iter()
        .filter(|v| compact(v.input_script()) != v.expected_script())
        .map(|v| v.name.to_string())
        .collect()
}
