//! Materialize fresh managed subtrees from plain values.

use converge_types::{ManagedNode, ManagedValue};
use serde_json::Value;

use crate::error::SyncResult;
use crate::reconcile::Reconciler;

/// Build a managed value mirroring `target`.
///
/// Arrays and objects become new containers created through `context` (any
/// node of the destination document) and are fully populated before being
/// returned. Primitives are returned as scalars.
pub fn build<N: ManagedNode>(context: &N, target: &Value) -> SyncResult<ManagedValue<N>> {
    Reconciler::new().build(context, target)
}

impl Reconciler {
    pub(crate) fn build<N: ManagedNode>(
        &mut self,
        context: &N,
        target: &Value,
    ) -> SyncResult<ManagedValue<N>> {
        let node = match target {
            Value::Array(_) => context.new_sequence(),
            Value::Object(_) => context.new_map(),
            primitive => return Ok(ManagedValue::Scalar(primitive.clone())),
        };
        self.sync_node(&node, target)?;
        Ok(ManagedValue::Node(node))
    }
}
