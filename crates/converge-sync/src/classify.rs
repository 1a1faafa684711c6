//! Capability-based classification of managed and plain values.
//!
//! Managed nodes are classified by the capabilities they expose, never by
//! their concrete type: the sequence probe wins over the map probe, and a
//! node answering neither is tagged with its runtime type tag. Absent values
//! and scalars that are not primitives classify as [`Kind::Undefined`].
//! Classification never fails.

use converge_types::{Kind, ManagedNode, ManagedValue, PrimitiveTag};
use serde_json::Value;

/// The outcome of probing a node once for its capabilities.
pub enum Probe<'a, N: ManagedNode> {
    Sequence(&'a N::Sequence),
    Map(&'a N::Map),
    Other(&'static str),
}

impl<N: ManagedNode> Probe<'_, N> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Sequence(_) => Kind::ManagedSequence,
            Self::Map(_) => Kind::ManagedMap,
            Self::Other(tag) => Kind::Other(*tag),
        }
    }
}

/// Probe a node: sequence capability first, then map capability.
pub fn probe<N: ManagedNode>(node: &N) -> Probe<'_, N> {
    if let Some(seq) = node.as_sequence() {
        Probe::Sequence(seq)
    } else if let Some(map) = node.as_map() {
        Probe::Map(map)
    } else {
        Probe::Other(node.type_tag())
    }
}

/// Classify a managed node.
pub fn classify_node<N: ManagedNode>(node: &N) -> Kind {
    probe(node).kind()
}

/// Classify a value read from a managed container (`None` when absent).
pub fn classify_managed<N: ManagedNode>(value: Option<&ManagedValue<N>>) -> Kind {
    match value {
        None => Kind::Undefined,
        Some(ManagedValue::Scalar(v)) => {
            PrimitiveTag::of(v).map_or(Kind::Undefined, Kind::Primitive)
        }
        Some(ManagedValue::Node(node)) => classify_node(node),
    }
}

/// Classify a value from the target tree (`None` when absent).
pub fn classify_plain(value: Option<&Value>) -> Kind {
    match value {
        None => Kind::Undefined,
        Some(Value::Array(_)) => Kind::PlainArray,
        Some(Value::Object(_)) => Kind::PlainObject,
        Some(v) => PrimitiveTag::of(v).map_or(Kind::Undefined, Kind::Primitive),
    }
}
