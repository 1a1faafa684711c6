//! Tree reconciliation for converge.
//!
//! Converges a managed container tree (nested maps and sequences reachable
//! only through get/set/delete/insert primitives) onto a plain JSON snapshot
//! in place, preserving the identity of containers that survive, and reports
//! whether anything was mutated.
//!
//! # Operations
//!
//! - [`reconcile`] / [`Reconciler::run`] -- mutate the managed tree to match
//!   the target; `Ok(false)` means nothing was touched
//! - [`equals`] / [`node_equals`] -- structural equality between a managed
//!   value and a plain value
//! - [`build`] -- materialize a fresh managed subtree from a plain value
//! - [`classify_managed`] / [`classify_plain`] -- capability-based
//!   classification into [`Kind`](converge_types::Kind)
//!
//! # Concurrency
//!
//! A call is synchronous and depth-first. The caller must guarantee that
//! nothing else mutates the managed subtree for the duration of the call. On
//! a [`SyncError::ShapeMismatch`] raised below the root, mutations already
//! applied elsewhere in the tree stay in place.

pub mod builder;
pub mod classify;
pub mod equality;
pub mod error;
pub mod reconcile;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod testing;

pub use builder::build;
pub use classify::{classify_managed, classify_node, classify_plain, probe, Probe};
pub use equality::{equals, node_equals};
pub use error::{SyncError, SyncResult};
pub use reconcile::{reconcile, Reconciler, SyncReport, SyncStats};
