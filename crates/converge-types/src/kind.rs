//! Classification tags.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// The primitive type of a scalar value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveTag {
    Null,
    Bool,
    Number,
    String,
}

impl PrimitiveTag {
    /// Tag a primitive JSON value. Returns `None` for objects and arrays.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::String),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PrimitiveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of shapes any value on either side classifies into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Managed node exposing key enumeration and keyed get.
    ManagedMap,
    /// Managed node exposing length and indexed get.
    ManagedSequence,
    /// Keyed object in the target tree.
    PlainObject,
    /// Ordered list in the target tree.
    PlainArray,
    /// A scalar on either side.
    Primitive(PrimitiveTag),
    /// A managed node with neither container capability.
    Other(&'static str),
    /// Nothing there: an absent key, a position past the end.
    Undefined,
}

impl Kind {
    /// Returns `true` for managed maps and managed sequences.
    pub fn is_managed_container(&self) -> bool {
        matches!(self, Self::ManagedMap | Self::ManagedSequence)
    }

    /// Returns `true` when a managed container of kind `self` can be
    /// reconciled in place against a target of kind `target`.
    pub fn is_compatible_container(&self, target: &Kind) -> bool {
        matches!(
            (self, target),
            (Self::ManagedMap, Self::PlainObject) | (Self::ManagedSequence, Self::PlainArray)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManagedMap => "managed map",
            Self::ManagedSequence => "managed sequence",
            Self::PlainObject => "object",
            Self::PlainArray => "array",
            Self::Primitive(tag) => tag.as_str(),
            Self::Other(tag) => *tag,
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitive_tags() {
        assert_eq!(PrimitiveTag::of(&json!(null)), Some(PrimitiveTag::Null));
        assert_eq!(PrimitiveTag::of(&json!(true)), Some(PrimitiveTag::Bool));
        assert_eq!(PrimitiveTag::of(&json!(1.5)), Some(PrimitiveTag::Number));
        assert_eq!(PrimitiveTag::of(&json!("x")), Some(PrimitiveTag::String));
        assert_eq!(PrimitiveTag::of(&json!([])), None);
        assert_eq!(PrimitiveTag::of(&json!({})), None);
    }

    #[test]
    fn container_compatibility() {
        assert!(Kind::ManagedMap.is_compatible_container(&Kind::PlainObject));
        assert!(Kind::ManagedSequence.is_compatible_container(&Kind::PlainArray));
        assert!(!Kind::ManagedMap.is_compatible_container(&Kind::PlainArray));
        assert!(!Kind::ManagedSequence.is_compatible_container(&Kind::PlainObject));
        assert!(!Kind::Undefined.is_compatible_container(&Kind::PlainObject));
        assert!(!Kind::Primitive(PrimitiveTag::String)
            .is_compatible_container(&Kind::Primitive(PrimitiveTag::String)));
    }

    #[test]
    fn display_names() {
        assert_eq!(Kind::ManagedMap.to_string(), "managed map");
        assert_eq!(Kind::Primitive(PrimitiveTag::Number).to_string(), "number");
        assert_eq!(Kind::Other("text").to_string(), "text");
    }
}
