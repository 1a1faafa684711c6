use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::memory::MemNode;

/// Domain tag prepended to every fingerprint computation.
const DOMAIN: &str = "converge-tree-v1";

/// Structural fingerprint of a tree: a domain-separated BLAKE3 hash of its
/// canonical JSON encoding.
///
/// Two trees with equal content have equal fingerprints regardless of
/// container identity or the mutation history that produced them. Object
/// keys are hashed in sorted order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(#[serde(serialize_with = "hex_bytes")] [u8; 32]);

impl Fingerprint {
    /// Fingerprint a plain value.
    pub fn of_value(value: &Value) -> Self {
        let mut canonical = Vec::new();
        write_canonical(value, &mut canonical);

        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(&canonical);
        Self(*hasher.finalize().as_bytes())
    }

    /// Fingerprint the current content of a managed container.
    pub fn of_node(node: &MemNode) -> Self {
        Self::of_value(&node.to_json())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for display.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

fn hex_bytes<S: serde::Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}

// Keys are sorted explicitly so the encoding does not depend on the map
// ordering serde_json was compiled with.
fn write_canonical(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push(b'{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                out.extend_from_slice(Value::String(key.clone()).to_string().as_bytes());
                out.push(b':');
                write_canonical(&map[key], out);
            }
            out.push(b'}');
        }
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(item, out);
            }
            out.push(b']');
        }
        scalar => out.extend_from_slice(scalar.to_string().as_bytes()),
    }
}
