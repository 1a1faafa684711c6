//! The capability traits a managed tree backend implements.
//!
//! Any data type exposing this surface can be driven by the reconciler
//! unmodified: a conflict-resolving shared document, a plain in-memory tree,
//! or a persisted document.

use crate::value::ManagedValue;

/// A keyed container with unique keys.
///
/// Mutating methods take `&self`: backends hand out shared handles and
/// synchronize internally.
pub trait ManagedMap {
    /// The node handle type stored in this map.
    type Node;

    /// Returns `true` if `key` is present.
    fn has(&self, key: &str) -> bool;

    /// Read the value stored under `key`.
    ///
    /// Returns `None` if the key is absent.
    fn get(&self, key: &str) -> Option<ManagedValue<Self::Node>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: ManagedValue<Self::Node>);

    /// Remove `key`. Removing an absent key is a no-op.
    fn delete(&self, key: &str);

    /// Enumerate the keys currently present.
    fn keys(&self) -> Vec<String>;

    /// Number of keys currently present.
    fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns `true` if the map has no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An ordered, index-addressable list.
pub trait ManagedSequence {
    /// The node handle type stored in this sequence.
    type Node;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Read the element at `index`.
    ///
    /// Returns `None` if `index` is past the end.
    fn get(&self, index: usize) -> Option<ManagedValue<Self::Node>>;

    /// Insert `values` so that the first lands at `index`.
    ///
    /// Elements previously at `index..` shift right by `values.len()`.
    fn insert_range(&self, index: usize, values: Vec<ManagedValue<Self::Node>>);

    /// Remove the element at `index`, shifting later elements left.
    fn delete_at(&self, index: usize);

    /// Returns `true` if the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle to a node stored in a managed tree.
///
/// Nodes advertise what they can do through the capability probes. A node
/// answering `as_sequence` is treated as a sequence even if it also answers
/// `as_map`; wrappers and specialised node types classify correctly as long
/// as they forward the probes.
pub trait ManagedNode: Clone {
    /// The keyed container view of this node type.
    type Map: ManagedMap<Node = Self>;
    /// The ordered container view of this node type.
    type Sequence: ManagedSequence<Node = Self>;

    /// Probe for the sequence capability (length + indexed get).
    fn as_sequence(&self) -> Option<&Self::Sequence>;

    /// Probe for the map capability (key enumeration + keyed get).
    fn as_map(&self) -> Option<&Self::Map>;

    /// Runtime type tag reported for nodes that are neither maps nor
    /// sequences.
    fn type_tag(&self) -> &'static str {
        "node"
    }

    /// Create an empty, detached map belonging to the same document as `self`.
    fn new_map(&self) -> Self;

    /// Create an empty, detached sequence belonging to the same document as
    /// `self`.
    fn new_sequence(&self) -> Self;
}
