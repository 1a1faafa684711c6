//! Foundation types for converge.
//!
//! converge drives a mutable, capability-restricted container tree (the
//! *managed* tree) towards an immutable plain-data snapshot (the *target*
//! tree, a [`serde_json::Value`]). This crate holds the vocabulary shared by
//! every backend and by the reconciler itself.
//!
//! # Key Types
//!
//! - [`ManagedValue`] -- a scalar or a node stored inside a managed container
//! - [`ManagedMap`] / [`ManagedSequence`] -- the consumed capability surface
//! - [`ManagedNode`] -- capability probing and container factories
//! - [`Kind`] / [`PrimitiveTag`] -- the closed classification tag set
//!
//! # Design Rules
//!
//! 1. Managed containers are addressed through handles. Cloning a handle never
//!    copies the container; mutations through any clone are visible to all.
//! 2. A nested container is owned by exactly one parent. No aliasing, no cycles.
//! 3. Classification is by capability, never by concrete type.

pub mod kind;
pub mod traits;
pub mod value;

pub use kind::{Kind, PrimitiveTag};
pub use traits::{ManagedMap, ManagedNode, ManagedSequence};
pub use value::{scalars_equal, ManagedValue};
