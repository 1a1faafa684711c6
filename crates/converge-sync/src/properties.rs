//! Property tests: convergence and idempotence over generated JSON trees.

use converge_store::{Fingerprint, JournalSummary, MemDoc, MemNode, Mutation};
use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::equality::node_equals;
use crate::reconcile::reconcile;
use crate::testing::AltNode;

// Integers only, so a converged tree serializes back to exactly the target.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-3i64..3).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-e]", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]", arb_json(), 0..5)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

fn arb_array() -> impl Strategy<Value = Value> {
    prop::collection::vec(arb_json(), 0..6).prop_map(Value::Array)
}

fn loaded_map(doc: &MemDoc, value: &Value) -> MemNode {
    let root = doc.new_map();
    reconcile(&root, value).unwrap();
    root
}

proptest! {
    #[test]
    fn converges_from_any_map(start in arb_object(), target in arb_object()) {
        let doc = MemDoc::new();
        let root = loaded_map(&doc, &start);

        reconcile(&root, &target).unwrap();

        prop_assert!(node_equals(&root, &target));
        prop_assert_eq!(root.to_json(), target);
    }

    #[test]
    fn converges_from_any_sequence(start in arb_array(), target in arb_array()) {
        let doc = MemDoc::new();
        let root = doc.new_sequence();
        reconcile(&root, &start).unwrap();

        reconcile(&root, &target).unwrap();

        prop_assert!(node_equals(&root, &target));
        prop_assert_eq!(root.to_json(), target);
    }

    #[test]
    fn second_run_is_a_no_op(start in arb_object(), target in arb_object()) {
        let doc = MemDoc::new();
        let root = loaded_map(&doc, &start);
        reconcile(&root, &target).unwrap();

        let mark = doc.mutation_count();
        let fingerprint = Fingerprint::of_node(&root);

        prop_assert!(!reconcile(&root, &target).unwrap());
        prop_assert_eq!(doc.mutation_count(), mark);
        prop_assert_eq!(Fingerprint::of_node(&root), fingerprint);
    }

    #[test]
    fn changed_flag_matches_journal(start in arb_object(), target in arb_object()) {
        let doc = MemDoc::new();
        let root = loaded_map(&doc, &start);
        let mark = doc.mutation_count();

        let changed = reconcile(&root, &target).unwrap();

        prop_assert_eq!(changed, doc.mutation_count() > mark);
        prop_assert_eq!(changed, start != target);
    }

    #[test]
    fn equality_agrees_with_materialized_json(a in arb_object(), b in arb_object()) {
        let doc = MemDoc::new();
        let root = loaded_map(&doc, &a);
        prop_assert_eq!(node_equals(&root, &b), a == b);
    }

    #[test]
    fn pure_append_inserts_once_at_end(base in arb_array(), extra in arb_json()) {
        let doc = MemDoc::new();
        let root = doc.new_sequence();
        reconcile(&root, &base).unwrap();
        let mut items = base.as_array().cloned().unwrap_or_default();
        let end = items.len();
        items.push(extra);
        let mark = doc.mutation_count();

        reconcile(&root, &Value::Array(items.clone())).unwrap();

        let applied = doc.mutations_since(mark);
        let on_root: Vec<&Mutation> = applied
            .iter()
            .filter(|m| m.container() == root.id())
            .collect();
        let expected = Mutation::SeqInsert {
            container: root.id(),
            index: end,
            count: 1,
        };
        prop_assert_eq!(on_root, vec![&expected]);
        prop_assert_eq!(JournalSummary::from_mutations(&applied).deletes(), 0);
        prop_assert_eq!(root.to_json(), Value::Array(items));
    }

    #[test]
    fn alternative_backend_converges(start in arb_object(), target in arb_object()) {
        let root = AltNode::map();
        reconcile(&root, &start).unwrap();
        reconcile(&root, &target).unwrap();
        prop_assert!(node_equals(&root, &target));
        prop_assert!(!reconcile(&root, &target).unwrap());
    }
}
