//! Error types for reconciliation.

use converge_types::Kind;

/// Errors that can occur while reconciling a managed tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The managed node is not a container, or the target's shape cannot
    /// correspond to the managed container kind.
    #[error("shape mismatch: expected {expected}, managed side is {managed}, target is {target}")]
    ShapeMismatch {
        expected: &'static str,
        managed: Kind,
        target: Kind,
    },
}

/// Convenience alias for reconciliation results.
pub type SyncResult<T> = Result<T, SyncError>;
