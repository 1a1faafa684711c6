//! Values stored inside managed containers.

use serde_json::Value;

/// A value held by a managed map entry or sequence element.
#[derive(Clone, Debug)]
pub enum ManagedValue<N> {
    /// A primitive: null, bool, number or string.
    Scalar(Value),
    /// A node handle (usually a nested map or sequence).
    Node(N),
}

impl<N> ManagedValue<N> {
    /// Wrap a primitive.
    pub fn scalar(value: impl Into<Value>) -> Self {
        Self::Scalar(value.into())
    }

    /// The scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Node(_) => None,
        }
    }

    /// The node handle, if this is a node.
    pub fn as_node(&self) -> Option<&N> {
        match self {
            Self::Node(n) => Some(n),
            Self::Scalar(_) => None,
        }
    }

    /// Consume and return the node handle, if this is a node.
    pub fn into_node(self) -> Option<N> {
        match self {
            Self::Node(n) => Some(n),
            Self::Scalar(_) => None,
        }
    }
}

/// Value equality for primitives.
///
/// Numbers compare numerically, so `1` equals `1.0`. Everything else
/// compares by value. Objects and arrays are never scalars; comparing them
/// here falls back to plain `==`.
pub fn scalars_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return x == y;
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return x == y;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}
