//! Stable hashing helpers for tables, pipelines, and manifests.

use blake3::Hasher;
use serde::Serialize;

use crate::schema::DataType;
use crate::table::Table;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        // blake3 hex(32b) is 64 hex chars
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    let out = h.finalize();
    Hash256(out.into())
}

pub fn hash_str(s: &str) -> Hash256 {
    hash_bytes(s.as_bytes())
}

/// Hash any serde-serializable value deterministically (via JSON).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v)?;
    Ok(hash_bytes(&bytes))
}

/// Content fingerprint of a table: names, types, and every cell in column order.
///
/// Two tables have the same fingerprint iff they are equal under grouping
/// semantics (so `NaN` cells hash alike).
pub fn fingerprint(table: &Table) -> Hash256 {
    let mut h = Hasher::new();
    h.update(&(table.num_columns() as u64).to_le_bytes());
    h.update(&(table.num_rows() as u64).to_le_bytes());
    for col in table.columns() {
        h.update(&(col.name.len() as u64).to_le_bytes());
        h.update(col.name.as_bytes());
        h.update(&[type_tag(col.data_type)]);
        for v in &col.values {
            hash_value(v, &mut h);
        }
    }
    Hash256(h.finalize().into())
}

fn type_tag(t: DataType) -> u8 {
    match t {
        DataType::Boolean => 1,
        DataType::Integer => 2,
        DataType::Float => 3,
        DataType::Calendar => 4,
        DataType::Text => 5,
    }
}

/// Hash a value into a hasher, discriminant first.
fn hash_value(value: &Value, hasher: &mut Hasher) {
    match value {
        Value::Missing => {
            hasher.update(&[0]);
        }
        Value::Boolean(b) => {
            hasher.update(&[1, *b as u8]);
        }
        Value::Integer(i) => {
            hasher.update(&[2]);
            hasher.update(&i.to_le_bytes());
        }
        Value::Float(f) => {
            hasher.update(&[3]);
            let bits = if f.is_nan() {
                f64::NAN.to_bits()
            } else if *f == 0.0 {
                0u64
            } else {
                f.to_bits()
            };
            hasher.update(&bits.to_le_bytes());
        }
        Value::Calendar(c) => {
            hasher.update(&[4, c.kind as u8]);
            hasher.update(&c.ordinal.to_le_bytes());
        }
        Value::Text(s) => {
            hasher.update(&[5]);
            hasher.update(&(s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }
    }
}
