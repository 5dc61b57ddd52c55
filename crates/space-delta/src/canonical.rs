//! Canonical CBOR encoding of deltas.
//!
//! Deltas are encoded as CBOR (RFC 8949) with deterministic rules:
//! - A delta is a map `{ "delete": uint, "insert": bytes, "offset": uint }`
//! - Map keys sorted by CBOR-encoded bytes (all three are 6-byte strings,
//!   so the order is lexicographic)
//! - Integers: smallest valid encoding
//! - Lengths: definite only
//! - A script is an array of delta maps
//!
//! **CRITICAL**: This encoding is FROZEN. Records sign these bytes.
//! Decoding accepts only the canonical form: input that decodes but does
//! not re-encode to the same bytes is rejected.

use ciborium::value::Value;

use space_delta_core::{CoreError, Delta, EditScript};

/// CBOR map key names, in canonical order.
mod keys {
    pub const DELETE: &str = "delete";
    pub const INSERT: &str = "insert";
    pub const OFFSET: &str = "offset";
}

/// Encode one delta to canonical CBOR bytes.
pub fn encode_delta(delta: &Delta) -> Vec<u8> {
    let mut buf = Vec::with_capacity(delta.insert.len() + 32);
    encode_delta_to(&mut buf, delta);
    buf
}

/// Encode a script to canonical CBOR bytes.
pub fn encode_script(script: &EditScript) -> Vec<u8> {
    let mut buf = Vec::with_capacity(script.inserted_len() + 32 * script.len() + 9);
    encode_uint(&mut buf, 4, script.len() as u64);
    for delta in script {
        encode_delta_to(&mut buf, delta);
    }
    buf
}

/// Decode one delta from canonical CBOR bytes.
pub fn decode_delta(bytes: &[u8]) -> Result<Delta, CoreError> {
    let value = parse(bytes)?;
    let delta = value_to_delta(&value)?;
    ensure_canonical(bytes, &encode_delta(&delta))?;
    Ok(delta)
}

/// Decode a script from canonical CBOR bytes.
pub fn decode_script(bytes: &[u8]) -> Result<EditScript, CoreError> {
    let value = parse(bytes)?;
    let items = match &value {
        Value::Array(items) => items,
        _ => return Err(CoreError::MalformedDelta("expected array".into())),
    };

    let script = items
        .iter()
        .map(value_to_delta)
        .collect::<Result<EditScript, _>>()?;
    ensure_canonical(bytes, &encode_script(&script))?;
    Ok(script)
}

fn parse(bytes: &[u8]) -> Result<Value, CoreError> {
    let cursor = std::io::Cursor::new(bytes);
    ciborium::from_reader(cursor).map_err(|e| CoreError::DecodingError(e.to_string()))
}

fn ensure_canonical(input: &[u8], reencoded: &[u8]) -> Result<(), CoreError> {
    if input != reencoded {
        return Err(CoreError::MalformedDelta("non-canonical encoding".into()));
    }
    Ok(())
}

/// Convert a CBOR map back to a delta.
fn value_to_delta(value: &Value) -> Result<Delta, CoreError> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedDelta("expected map".into())),
    };
    if map.len() != 3 {
        return Err(CoreError::MalformedDelta(format!(
            "expected 3 fields, got {}",
            map.len()
        )));
    }

    // Helper to get value by string key
    let get = |key: &str| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
            .map(|(_, v)| v)
    };

    let offset = get_uint(get(keys::OFFSET), keys::OFFSET)?;
    let delete = get_uint(get(keys::DELETE), keys::DELETE)?;

    let insert = match get(keys::INSERT) {
        Some(Value::Bytes(b)) => b.clone(),
        _ => return Err(CoreError::MalformedDelta("invalid insert".into())),
    };

    Ok(Delta::new(offset, delete, insert))
}

fn get_uint(value: Option<&Value>, name: &str) -> Result<u64, CoreError> {
    match value {
        Some(Value::Integer(i)) => {
            let n: i128 = (*i).into();
            u64::try_from(n).map_err(|_| CoreError::MalformedDelta(format!("{name} out of range")))
        }
        _ => Err(CoreError::MalformedDelta(format!("invalid {name}"))),
    }
}

fn encode_delta_to(buf: &mut Vec<u8>, delta: &Delta) {
    encode_uint(buf, 5, 3);
    encode_text(buf, keys::DELETE);
    encode_uint(buf, 0, delta.delete);
    encode_text(buf, keys::INSERT);
    encode_bytes(buf, &delta.insert);
    encode_text(buf, keys::OFFSET);
    encode_uint(buf, 0, delta.offset);
}

fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}
