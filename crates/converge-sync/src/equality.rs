//! Structural equality between a managed value and a plain value.

use converge_types::{
    scalars_equal, ManagedMap, ManagedNode, ManagedSequence, ManagedValue, PrimitiveTag,
};
use serde_json::Value;

use crate::classify::{probe, Probe};

/// Returns `true` if `managed` is semantically equal to `target`.
///
/// - A managed sequence equals an array of the same length whose elements
///   are pairwise equal.
/// - A managed map equals an object when every target key holds an equal
///   value and both sides have the same number of keys.
/// - Primitives compare by value. Any kind mismatch is unequal.
/// - Two absent values are equal.
///
/// Stops at the first mismatch.
pub fn equals<N: ManagedNode>(managed: Option<&ManagedValue<N>>, target: Option<&Value>) -> bool {
    match (managed, target) {
        (Some(ManagedValue::Node(node)), Some(target)) => node_equals(node, target),
        (Some(ManagedValue::Scalar(m)), Some(t)) => {
            PrimitiveTag::of(m).is_some() && PrimitiveTag::of(t).is_some() && scalars_equal(m, t)
        }
        (None, None) => true,
        _ => false,
    }
}

/// [`equals`] for a node that is known to be present.
pub fn node_equals<N: ManagedNode>(node: &N, target: &Value) -> bool {
    match (probe(node), target) {
        (Probe::Sequence(seq), Value::Array(items)) => {
            seq.len() == items.len()
                && items
                    .iter()
                    .enumerate()
                    .all(|(i, item)| equals(seq.get(i).as_ref(), Some(item)))
        }
        (Probe::Map(map), Value::Object(fields)) => {
            fields
                .iter()
                .all(|(key, field)| equals(map.get(key).as_ref(), Some(field)))
                && fields.len() == map.len()
        }
        _ => false,
    }
}
