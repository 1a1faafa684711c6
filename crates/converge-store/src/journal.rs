//! The document mutation journal.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

/// A single structural mutation against a container.
///
/// `container` is the document-local id of the container that was mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// A map key was written.
    MapSet { container: u64, key: String },
    /// A map key was removed.
    MapDelete { container: u64, key: String },
    /// `count` values were inserted starting at `index`.
    SeqInsert {
        container: u64,
        index: usize,
        count: usize,
    },
    /// The element at `index` was removed.
    SeqDelete { container: u64, index: usize },
}

impl Mutation {
    pub fn container(&self) -> u64 {
        match self {
            Self::MapSet { container, .. }
            | Self::MapDelete { container, .. }
            | Self::SeqInsert { container, .. }
            | Self::SeqDelete { container, .. } => *container,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MapSet { container, key } => write!(f, "#{container} set {key:?}"),
            Self::MapDelete { container, key } => write!(f, "#{container} delete {key:?}"),
            Self::SeqInsert {
                container,
                index,
                count,
            } => write!(f, "#{container} insert {count} at {index}"),
            Self::SeqDelete { container, index } => write!(f, "#{container} delete at {index}"),
        }
    }
}

/// Per-kind mutation counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JournalSummary {
    pub sets: usize,
    pub map_deletes: usize,
    pub inserts: usize,
    pub seq_deletes: usize,
}

impl JournalSummary {
    /// Tally a slice of mutations.
    pub fn from_mutations(mutations: &[Mutation]) -> Self {
        let mut summary = Self::default();
        for m in mutations {
            match m {
                Mutation::MapSet { .. } => summary.sets += 1,
                Mutation::MapDelete { .. } => summary.map_deletes += 1,
                Mutation::SeqInsert { .. } => summary.inserts += 1,
                Mutation::SeqDelete { .. } => summary.seq_deletes += 1,
            }
        }
        summary
    }

    /// Total number of mutations.
    pub fn total(&self) -> usize {
        self.sets + self.map_deletes + self.inserts + self.seq_deletes
    }

    /// Map and sequence deletions combined.
    pub fn deletes(&self) -> usize {
        self.map_deletes + self.seq_deletes
    }
}

/// Document-wide shared state: the journal and the container id allocator.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Mutex<Vec<Mutation>>,
    next_id: AtomicU64,
}

impl Journal {
    pub(crate) fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn record(&self, mutation: Mutation) {
        tracing::trace!(%mutation, "journal append");
        self.entries.lock().expect("lock poisoned").push(mutation);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().expect("lock poisoned").len()
    }

    pub(crate) fn snapshot(&self) -> Vec<Mutation> {
        self.entries.lock().expect("lock poisoned").clone()
    }

    pub(crate) fn since(&self, mark: usize) -> Vec<Mutation> {
        let entries = self.entries.lock().expect("lock poisoned");
        entries.get(mark..).map(<[Mutation]>::to_vec).unwrap_or_default()
    }

    pub(crate) fn clear(&self) {
        self.entries.lock().expect("lock poisoned").clear();
    }
}
