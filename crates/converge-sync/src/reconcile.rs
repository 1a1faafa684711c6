//! The reconciler: converge a managed container onto a plain value in place.
//!
//! Maps are reconciled in three passes (remove, update, insert) so that the
//! final key set equals the target's regardless of enumeration order and a
//! key whose container kind changed is rebuilt exactly once.
//!
//! Sequences are aligned left to right with a moving cursor. For each target
//! element the first equal managed element at or after the cursor is taken as
//! its match and everything skipped is deleted. This is a greedy heuristic,
//! not a minimal edit script: it is deterministic and cheap for appends,
//! prepends, single-element edits and removals, and may churn more than
//! necessary on reorderings.

use converge_types::{Kind, ManagedMap, ManagedNode, ManagedSequence, ManagedValue};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::classify::{classify_managed, classify_plain, probe, Probe};
use crate::equality::equals;
use crate::error::{SyncError, SyncResult};

/// Counts of the mutations issued during one reconcile call.
///
/// Mutations against freshly built subtrees are included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub map_sets: usize,
    pub map_deletes: usize,
    pub seq_inserts: usize,
    pub seq_deletes: usize,
    /// Containers visited, including the root.
    pub containers: usize,
}

impl SyncStats {
    /// Total number of mutations.
    pub fn mutations(&self) -> usize {
        self.map_sets + self.map_deletes + self.seq_inserts + self.seq_deletes
    }
}

/// The outcome of a reconcile call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// `true` iff at least one mutation was issued.
    pub changed: bool,
    pub stats: SyncStats,
}

/// Drives a managed tree to structurally match a target value.
#[derive(Debug, Default)]
pub struct Reconciler {
    stats: SyncStats,
}

/// A sequence position, possibly past the end.
enum Slot<T> {
    At(T),
    OutOfRange,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile `managed` against `target`.
    ///
    /// Fails with [`SyncError::ShapeMismatch`] if `managed` is not a
    /// container or `target` has the wrong shape for it. The check happens
    /// before anything at that level is mutated.
    pub fn run<N: ManagedNode>(mut self, managed: &N, target: &Value) -> SyncResult<SyncReport> {
        let changed = self.sync_node(managed, target)?;
        debug!(
            changed,
            mutations = self.stats.mutations(),
            containers = self.stats.containers,
            "reconcile complete"
        );
        Ok(SyncReport {
            changed,
            stats: self.stats,
        })
    }

    pub(crate) fn sync_node<N: ManagedNode>(
        &mut self,
        managed: &N,
        target: &Value,
    ) -> SyncResult<bool> {
        self.stats.containers += 1;
        match (probe(managed), target) {
            (Probe::Sequence(seq), Value::Array(items)) => {
                debug!(len = seq.len(), target_len = items.len(), "reconciling sequence");
                self.sync_sequence(managed, seq, items)
            }
            (Probe::Map(map), Value::Object(fields)) => {
                debug!(len = map.len(), target_len = fields.len(), "reconciling map");
                self.sync_map(managed, map, fields)
            }
            (probed, target) => {
                let managed = probed.kind();
                let expected = match managed {
                    Kind::ManagedSequence => "array",
                    Kind::ManagedMap => "object",
                    _ => "managed map or managed sequence",
                };
                Err(SyncError::ShapeMismatch {
                    expected,
                    managed,
                    target: classify_plain(Some(target)),
                })
            }
        }
    }

    fn sync_map<N: ManagedNode>(
        &mut self,
        owner: &N,
        map: &N::Map,
        target: &Map<String, Value>,
    ) -> SyncResult<bool> {
        let mut changed = false;

        // Remove keys the target no longer has.
        for key in map.keys() {
            if !target.contains_key(&key) {
                trace!(%key, "map delete: absent from target");
                map.delete(&key);
                self.stats.map_deletes += 1;
                changed = true;
            }
        }

        // Update shared keys; drop the ones whose kind changed.
        for key in map.keys() {
            let Some(target_child) = target.get(&key) else {
                continue;
            };
            let Some(current) = map.get(&key) else {
                continue;
            };
            let managed_kind = classify_managed(Some(&current));
            let target_kind = classify_plain(Some(target_child));

            if managed_kind.is_managed_container() {
                match current.as_node() {
                    Some(child) if managed_kind.is_compatible_container(&target_kind) => {
                        changed |= self.sync_node(child, target_child)?;
                    }
                    _ => {
                        trace!(
                            %key,
                            from = %managed_kind,
                            to = %target_kind,
                            "map delete: kind changed"
                        );
                        map.delete(&key);
                        self.stats.map_deletes += 1;
                        changed = true;
                    }
                }
            } else if managed_kind != target_kind {
                trace!(%key, from = %managed_kind, to = %target_kind, "map delete: kind changed");
                map.delete(&key);
                self.stats.map_deletes += 1;
                changed = true;
            } else if !equals(Some(&current), Some(target_child)) {
                trace!(%key, "map set: value changed");
                map.set(&key, ManagedValue::Scalar(target_child.clone()));
                self.stats.map_sets += 1;
                changed = true;
            }
        }

        // Insert everything still missing, including keys dropped above.
        for (key, target_child) in target {
            if !map.has(key) {
                let child = self.build(owner, target_child)?;
                trace!(%key, "map set: new key");
                map.set(key, child);
                self.stats.map_sets += 1;
                changed = true;
            }
        }

        Ok(changed)
    }

    fn sync_sequence<N: ManagedNode>(
        &mut self,
        owner: &N,
        seq: &N::Sequence,
        target: &[Value],
    ) -> SyncResult<bool> {
        let mut changed = false;
        // managed[..cursor] equals target[..i] at the top of every iteration.
        let mut cursor = 0;

        for (i, target_item) in target.iter().enumerate() {
            let bound = seq.len().max(target.len());
            let found = (cursor..bound).find(|&j| {
                let managed = seq.get(j).map_or(Slot::OutOfRange, Slot::At);
                let wanted = target.get(i).map_or(Slot::OutOfRange, Slot::At);
                slots_match(managed, wanted)
            });

            match found {
                Some(j) => {
                    for skipped in (cursor..j).rev() {
                        trace!(index = skipped, "sequence delete: skipped by match");
                        seq.delete_at(skipped);
                        self.stats.seq_deletes += 1;
                        changed = true;
                    }
                    // The match now sits at `cursor`.
                    cursor += 1;
                }
                None => {
                    let current = seq.get(cursor);
                    let managed_kind = classify_managed(current.as_ref());
                    let target_kind = classify_plain(Some(target_item));

                    match current.as_ref().and_then(ManagedValue::as_node) {
                        Some(child) if managed_kind.is_compatible_container(&target_kind) => {
                            trace!(index = cursor, "sequence recurse: diverged container");
                            self.sync_node(child, target_item)?;
                        }
                        _ => {
                            let value = self.build(owner, target_item)?;
                            trace!(index = cursor, "sequence insert");
                            seq.insert_range(cursor, vec![value]);
                            self.stats.seq_inserts += 1;
                        }
                    }
                    cursor += 1;
                    changed = true;
                }
            }
        }

        let mut len = seq.len();
        while len > target.len() {
            len -= 1;
            trace!(index = len, "sequence delete: trailing excess");
            seq.delete_at(len);
            self.stats.seq_deletes += 1;
            changed = true;
        }

        Ok(changed)
    }
}

// Both positions past their ends count as a match.
fn slots_match<N: ManagedNode>(managed: Slot<ManagedValue<N>>, target: Slot<&Value>) -> bool {
    match (managed, target) {
        (Slot::OutOfRange, Slot::OutOfRange) => true,
        (Slot::At(m), Slot::At(t)) => equals(Some(&m), Some(t)),
        _ => false,
    }
}

/// Reconcile `managed` in place so it structurally equals `target`.
///
/// Returns `true` if any mutation was issued. Re-running with an unchanged
/// target issues no mutations and returns `false`.
pub fn reconcile<N: ManagedNode>(managed: &N, target: &Value) -> SyncResult<bool> {
    Reconciler::new().run(managed, target).map(|report| report.changed)
}
