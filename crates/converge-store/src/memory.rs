//! In-memory managed containers.
//!
//! [`MemMap`] and [`MemSequence`] keep their contents behind an
//! `Arc<RwLock<_>>`, so every clone of a handle addresses the same
//! container. All containers created through one [`MemDoc`] share its
//! journal.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use converge_types::{ManagedMap, ManagedNode, ManagedSequence, ManagedValue};
use serde_json::Value;
use tracing::warn;

use crate::journal::{Journal, JournalSummary, Mutation};

/// A managed document: the owner of a journal and a factory for containers.
#[derive(Clone, Default)]
pub struct MemDoc {
    journal: Arc<Journal>,
}

impl MemDoc {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map bound to this document.
    pub fn new_map(&self) -> MemNode {
        MemNode::Map(MemMap::new(Arc::clone(&self.journal)))
    }

    /// Create an empty sequence bound to this document.
    pub fn new_sequence(&self) -> MemNode {
        MemNode::Sequence(MemSequence::new(Arc::clone(&self.journal)))
    }

    /// Number of mutations recorded so far.
    pub fn mutation_count(&self) -> usize {
        self.journal.len()
    }

    /// All recorded mutations, oldest first.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.journal.snapshot()
    }

    /// Mutations recorded after `mark` (a previous [`mutation_count`]).
    ///
    /// [`mutation_count`]: MemDoc::mutation_count
    pub fn mutations_since(&self, mark: usize) -> Vec<Mutation> {
        self.journal.since(mark)
    }

    /// Per-kind counts of all recorded mutations.
    pub fn summary(&self) -> JournalSummary {
        JournalSummary::from_mutations(&self.journal.snapshot())
    }

    /// Forget all recorded mutations. Container contents are untouched.
    pub fn clear_journal(&self) {
        self.journal.clear();
    }
}

impl fmt::Debug for MemDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemDoc")
            .field("mutation_count", &self.journal.len())
            .finish()
    }
}

/// A handle to an in-memory container.
#[derive(Clone, Debug)]
pub enum MemNode {
    Map(MemMap),
    Sequence(MemSequence),
}

impl MemNode {
    /// Document-local id of the container.
    pub fn id(&self) -> u64 {
        match self {
            Self::Map(m) => m.id,
            Self::Sequence(s) => s.id,
        }
    }

    /// Returns `true` if both handles address the same container.
    pub fn ptr_eq(&self, other: &MemNode) -> bool {
        match (self, other) {
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(&a.entries, &b.entries),
            (Self::Sequence(a), Self::Sequence(b)) => Arc::ptr_eq(&a.items, &b.items),
            _ => false,
        }
    }

    /// Materialize the container as plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Map(m) => m.to_json(),
            Self::Sequence(s) => s.to_json(),
        }
    }

    fn journal(&self) -> &Arc<Journal> {
        match self {
            Self::Map(m) => &m.journal,
            Self::Sequence(s) => &s.journal,
        }
    }
}

impl ManagedNode for MemNode {
    type Map = MemMap;
    type Sequence = MemSequence;

    fn as_sequence(&self) -> Option<&MemSequence> {
        match self {
            Self::Sequence(s) => Some(s),
            Self::Map(_) => None,
        }
    }

    fn as_map(&self) -> Option<&MemMap> {
        match self {
            Self::Map(m) => Some(m),
            Self::Sequence(_) => None,
        }
    }

    fn new_map(&self) -> Self {
        Self::Map(MemMap::new(Arc::clone(self.journal())))
    }

    fn new_sequence(&self) -> Self {
        Self::Sequence(MemSequence::new(Arc::clone(self.journal())))
    }
}

fn value_to_json(value: &ManagedValue<MemNode>) -> Value {
    match value {
        ManagedValue::Scalar(v) => v.clone(),
        ManagedValue::Node(n) => n.to_json(),
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// An in-memory keyed container.
#[derive(Clone)]
pub struct MemMap {
    id: u64,
    entries: Arc<RwLock<BTreeMap<String, ManagedValue<MemNode>>>>,
    journal: Arc<Journal>,
}

impl MemMap {
    fn new(journal: Arc<Journal>) -> Self {
        Self {
            id: journal.allocate_id(),
            entries: Arc::new(RwLock::new(BTreeMap::new())),
            journal,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The nested container under `key`, if that entry is a node.
    pub fn get_node(&self, key: &str) -> Option<MemNode> {
        self.get(key).and_then(ManagedValue::into_node)
    }

    pub fn to_json(&self) -> Value {
        let entries = self.entries.read().expect("lock poisoned");
        Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        )
    }
}

impl ManagedMap for MemMap {
    type Node = MemNode;

    fn has(&self, key: &str) -> bool {
        self.entries
            .read()
            .expect("lock poisoned")
            .contains_key(key)
    }

    fn get(&self, key: &str) -> Option<ManagedValue<MemNode>> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: ManagedValue<MemNode>) {
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), value);
        self.journal.record(Mutation::MapSet {
            container: self.id,
            key: key.to_string(),
        });
    }

    fn delete(&self, key: &str) {
        let removed = self
            .entries
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some();
        if removed {
            self.journal.record(Mutation::MapDelete {
                container: self.id,
                key: key.to_string(),
            });
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }
}

impl fmt::Debug for MemMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemMap")
            .field("id", &self.id)
            .field("len", &ManagedMap::len(self))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// An in-memory ordered container.
#[derive(Clone)]
pub struct MemSequence {
    id: u64,
    items: Arc<RwLock<Vec<ManagedValue<MemNode>>>>,
    journal: Arc<Journal>,
}

impl MemSequence {
    fn new(journal: Arc<Journal>) -> Self {
        Self {
            id: journal.allocate_id(),
            items: Arc::new(RwLock::new(Vec::new())),
            journal,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The nested container at `index`, if that element is a node.
    pub fn get_node(&self, index: usize) -> Option<MemNode> {
        self.get(index).and_then(ManagedValue::into_node)
    }

    pub fn to_json(&self) -> Value {
        let items = self.items.read().expect("lock poisoned");
        Value::Array(items.iter().map(value_to_json).collect())
    }
}

impl ManagedSequence for MemSequence {
    type Node = MemNode;

    fn len(&self) -> usize {
        self.items.read().expect("lock poisoned").len()
    }

    fn get(&self, index: usize) -> Option<ManagedValue<MemNode>> {
        self.items.read().expect("lock poisoned").get(index).cloned()
    }

    fn insert_range(&self, index: usize, values: Vec<ManagedValue<MemNode>>) {
        if values.is_empty() {
            return;
        }
        let count = values.len();
        let index = {
            let mut items = self.items.write().expect("lock poisoned");
            let at = if index > items.len() {
                warn!(
                    container = self.id,
                    index,
                    len = items.len(),
                    "insert past end, appending"
                );
                items.len()
            } else {
                index
            };
            items.splice(at..at, values);
            at
        };
        self.journal.record(Mutation::SeqInsert {
            container: self.id,
            index,
            count,
        });
    }

    fn delete_at(&self, index: usize) {
        {
            let mut items = self.items.write().expect("lock poisoned");
            if index >= items.len() {
                warn!(
                    container = self.id,
                    index,
                    len = items.len(),
                    "delete past end ignored"
                );
                return;
            }
            items.remove(index);
        }
        self.journal.record(Mutation::SeqDelete {
            container: self.id,
            index,
        });
    }
}

impl fmt::Debug for MemSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemSequence")
            .field("id", &self.id)
            .field("len", &ManagedSequence::len(self))
            .finish()
    }
}
