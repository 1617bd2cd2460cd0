use super::*;

use proptest::prelude::*;
use crate::kvs::KeyValueStore;
use crate::flat::FlatKvs;

fn validate_node<V>(node: &Node<V>, is_root: bool) -> (usize, usize) {
    if !is_root {
        assert!(node.subtree_len > 0, "every non-root node must lead to a value");
    }

    for pair in node.children.windows(2) {
        assert!(
            pair[0].key_fragment < pair[1].key_fragment,
            "children must be strictly sorted by key fragment"
        );
    }

    let (mut values, mut keys) = match node.bag.as_ref() {
        Some(bag) => {
            assert!(!bag.is_empty(), "an attached bag must not be empty");
            (bag.len(), 1)
        }
        None => (0, 0),
    };

    for child in &node.children {
        let (child_values, child_keys) = validate_node(child, false);
        values += child_values;
        keys += child_keys;
    }

    assert_eq!(node.subtree_len, values, "stored subtree length must match a recount");
    (values, keys)
}

fn validate_tree<V>(map: &PrefixTreeMultiMap<V>) {
    let (values, keys) = validate_node(&map.root, true);
    assert_eq!(values, map.len());
    assert_eq!(keys, map.key_count());
}

fn sorted(mut values: Vec<i64>) -> Vec<i64> {
    values.sort_unstable();
    values
}

fn key_strategy() -> impl Strategy<Value = String> + Clone {
    // A small alphabet makes shared prefixes and repeated keys common,
    // and the multi-byte characters exercise boundaries inside UTF-8.
    "[abé🐝]{0,6}"
}

#[derive(Clone, Debug)]
enum Op {
    Insert(String, i64),
    Search(String),
    PrefixSearch(String),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<i64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        25 => key.clone().prop_map(Op::Search),
        25 => key.clone().prop_map(Op::PrefixSearch),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_flat(ops in ops_strategy()) {
        let mut t: PrefixTreeMultiMap<i64> = PrefixTreeMultiMap::new();
        let mut f: FlatKvs<i64> = FlatKvs::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    t.insert(&key, value);
                    KeyValueStore::insert(&mut f, &key, value);
                }
                Op::Search(key) => {
                    prop_assert_eq!(sorted(t.search(&key)), sorted(f.search(&key)));
                }
                Op::PrefixSearch(prefix) => {
                    prop_assert_eq!(t.prefix_len(&prefix), f.prefix_search(&prefix).len());
                    prop_assert_eq!(
                        sorted(t.prefix_search(&prefix)),
                        sorted(f.prefix_search(&prefix))
                    );
                }
            }

            prop_assert_eq!(t.len(), f.count());
        }

        validate_tree(&t);
        prop_assert_eq!(sorted(t.prefix_search("")), sorted(f.prefix_search("")));
    }

    #[test]
    fn prop_prefix_is_union_of_exact_searches(
        entries in prop::collection::vec((key_strategy(), any::<i64>()), 0..200),
        prefix in key_strategy(),
    ) {
        let t: PrefixTreeMultiMap<i64> = entries.iter().map(|(k, v)| (k, *v)).collect();

        let mut expected = Vec::new();
        t.for_each_entry(|key, bag| {
            if key.starts_with(prefix.as_str()) {
                expected.extend(bag.iter().copied());
            }
        });

        let iter = t.prefix_iter(&prefix);
        prop_assert_eq!(iter.len(), expected.len());
        prop_assert_eq!(sorted(iter.copied().collect()), sorted(expected));
        validate_tree(&t);
    }
}

#[test]
fn entries_are_visited_in_byte_order() {
    let t = PrefixTreeMultiMap::from([
        ("🐝", 1),
        ("b", 2),
        ("", 3),
        ("ab", 4),
        ("a", 5),
        ("é", 6),
        ("a", 7),
    ]);

    let mut keys = Vec::new();
    t.for_each_entry(|key, bag| keys.push((key.to_owned(), bag.len())));

    let mut expected: Vec<(String, usize)> = vec![
        ("🐝".into(), 1),
        ("b".into(), 1),
        ("".into(), 1),
        ("ab".into(), 1),
        ("a".into(), 2),
        ("é".into(), 1),
    ];
    expected.sort();

    assert_eq!(keys, expected);
    validate_tree(&t);
}
