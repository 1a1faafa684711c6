//! In-memory managed document for converge.
//!
//! This crate provides a reference backend for the capability traits in
//! `converge-types`. It behaves like a shared document: containers are
//! handles, every structural mutation is appended to a document-wide
//! journal, and a structural fingerprint identifies the current content.
//!
//! # Key Types
//!
//! - [`MemDoc`] -- document owning the journal and handing out roots
//! - [`MemNode`] / [`MemMap`] / [`MemSequence`] -- container handles
//! - [`Mutation`] / [`JournalSummary`] -- the recorded mutation log
//! - [`Fingerprint`] -- domain-separated BLAKE3 hash of a tree's content
//!
//! # Design Rules
//!
//! 1. Handles are cheap to clone and share the underlying container.
//! 2. Every mutation is journaled, including mutations against containers
//!    that are still detached.
//! 3. The journal never changes unless a mutating call was made, so an
//!    unchanged journal length proves a no-op.

pub mod fingerprint;
pub mod journal;
pub mod memory;

pub use fingerprint::Fingerprint;
pub use journal::{JournalSummary, Mutation};
pub use memory::{MemDoc, MemMap, MemNode, MemSequence};
