//! A second, deliberately different backend for tests.
//!
//! Single-threaded (`Rc<RefCell<_>>`), insertion-ordered maps, and two node
//! variants [`MemNode`](converge_store::MemNode) does not have: a node that
//! answers both capability probes and a node that answers neither.

use std::cell::RefCell;
use std::rc::Rc;

use converge_types::{ManagedMap, ManagedNode, ManagedSequence, ManagedValue};
use serde_json::Value;

#[derive(Clone, Debug, Default)]
pub(crate) struct AltMap(Rc<RefCell<Vec<(String, ManagedValue<AltNode>)>>>);

#[derive(Clone, Debug, Default)]
pub(crate) struct AltSeq(Rc<RefCell<Vec<ManagedValue<AltNode>>>>);

#[derive(Clone, Debug)]
pub(crate) enum AltNode {
    Map(AltMap),
    Seq(AltSeq),
    /// Exposes both capabilities.
    Dual(AltMap, AltSeq),
    /// Exposes neither capability.
    Text(String),
}

impl AltNode {
    pub(crate) fn map() -> Self {
        Self::Map(AltMap::default())
    }

    pub(crate) fn seq() -> Self {
        Self::Seq(AltSeq::default())
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            Self::Map(m) => m.to_json(),
            Self::Seq(s) | Self::Dual(_, s) => s.to_json(),
            Self::Text(t) => Value::String(format!("<text {t}>")),
        }
    }
}

fn to_json(value: &ManagedValue<AltNode>) -> Value {
    match value {
        ManagedValue::Scalar(v) => v.clone(),
        ManagedValue::Node(n) => n.to_json(),
    }
}

impl AltMap {
    fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        )
    }
}

impl AltSeq {
    fn to_json(&self) -> Value {
        Value::Array(self.0.borrow().iter().map(to_json).collect())
    }
}

impl ManagedMap for AltMap {
    type Node = AltNode;

    fn has(&self, key: &str) -> bool {
        self.0.borrow().iter().any(|(k, _)| k == key)
    }

    fn get(&self, key: &str) -> Option<ManagedValue<AltNode>> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn set(&self, key: &str, value: ManagedValue<AltNode>) {
        let mut entries = self.0.borrow_mut();
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key.to_string(), value)),
        }
    }

    fn delete(&self, key: &str) {
        self.0.borrow_mut().retain(|(k, _)| k != key);
    }

    fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl ManagedSequence for AltSeq {
    type Node = AltNode;

    fn len(&self) -> usize {
        self.0.borrow().len()
    }

    fn get(&self, index: usize) -> Option<ManagedValue<AltNode>> {
        self.0.borrow().get(index).cloned()
    }

    fn insert_range(&self, index: usize, values: Vec<ManagedValue<AltNode>>) {
        self.0.borrow_mut().splice(index..index, values);
    }

    fn delete_at(&self, index: usize) {
        self.0.borrow_mut().remove(index);
    }
}

impl ManagedNode for AltNode {
    type Map = AltMap;
    type Sequence = AltSeq;

    fn as_sequence(&self) -> Option<&AltSeq> {
        match self {
            Self::Seq(s) | Self::Dual(_, s) => Some(s),
            _ => None,
        }
    }

    fn as_map(&self) -> Option<&AltMap> {
        match self {
            Self::Map(m) | Self::Dual(m, _) => Some(m),
            _ => None,
        }
    }

    fn type_tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            _ => "node",
        }
    }

    fn new_map(&self) -> Self {
        Self::map()
    }

    fn new_sequence(&self) -> Self {
        Self::seq()
    }
}
