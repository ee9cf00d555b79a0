//! Property-based tests for the deep merge engine.
//!
//! These tests use proptest to generate random configuration trees and
//! verify that the merge laws hold for all of them. Generated trees never
//! contain null values, so "source wins" is unambiguous.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::{deep_merge, ConfigTree};
    use proptest::prelude::*;
    use serde_yaml::Mapping;

    fn leaf() -> impl Strategy<Value = ConfigTree> {
        prop_oneof![
            any::<i64>().prop_map(ConfigTree::from),
            any::<bool>().prop_map(ConfigTree::Bool),
            "[a-z]{0,6}".prop_map(ConfigTree::String),
        ]
    }

    fn to_mapping(entries: std::collections::BTreeMap<String, ConfigTree>) -> Mapping {
        entries
            .into_iter()
            .map(|(k, v)| (ConfigTree::String(k), v))
            .collect()
    }

    fn tree() -> impl Strategy<Value = ConfigTree> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(ConfigTree::Sequence),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| ConfigTree::Mapping(to_mapping(m))),
            ]
        })
    }

    fn mapping() -> impl Strategy<Value = ConfigTree> {
        prop::collection::btree_map("[a-e]", tree(), 0..5)
            .prop_map(|m| ConfigTree::Mapping(to_mapping(m)))
    }

    fn flat_mapping() -> impl Strategy<Value = ConfigTree> {
        prop::collection::btree_map("[a-e]", leaf(), 0..5)
            .prop_map(|m| ConfigTree::Mapping(to_mapping(m)))
    }

    fn keys(tree: &ConfigTree) -> Vec<ConfigTree> {
        tree.as_mapping()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    proptest! {
        /// Property: merging a tree with itself changes nothing
        #[test]
        fn merge_is_idempotent(t in tree()) {
            prop_assert_eq!(deep_merge(&t, &t), t);
        }

        /// Property: an empty source leaves the destination unchanged
        #[test]
        fn empty_source_is_identity(dest in mapping()) {
            let empty = ConfigTree::Mapping(Mapping::new());
            prop_assert_eq!(deep_merge(&empty, &dest), dest.clone());
            prop_assert_eq!(deep_merge(&ConfigTree::Null, &dest), dest);
        }

        /// Property: merging into an empty destination yields the source
        #[test]
        fn empty_destination_yields_source(source in mapping()) {
            let empty = ConfigTree::Mapping(Mapping::new());
            prop_assert_eq!(deep_merge(&source, &empty), source);
        }

        /// Property: the result's keys are the destination's keys followed by
        /// the keys only the source has
        #[test]
        fn keys_are_ordered_union(source in mapping(), dest in mapping()) {
            let merged = deep_merge(&source, &dest);
            let mut expected = keys(&dest);
            for key in keys(&source) {
                if !expected.contains(&key) {
                    expected.push(key);
                }
            }
            prop_assert_eq!(keys(&merged), expected);
        }

        /// Property: for scalar leaves the source always wins
        #[test]
        fn source_scalars_take_precedence(source in flat_mapping(), dest in flat_mapping()) {
            let merged = deep_merge(&source, &dest);
            for (key, value) in source.as_mapping().unwrap() {
                prop_assert_eq!(&merged[key], value);
            }
            for (key, value) in dest.as_mapping().unwrap() {
                if source.get(key).is_none() {
                    prop_assert_eq!(&merged[key], value);
                }
            }
        }

        /// Property: a null source value falls back to the destination
        #[test]
        fn null_source_values_fall_back(dest in flat_mapping()) {
            let nulls: Mapping = dest
                .as_mapping()
                .unwrap()
                .keys()
                .map(|k| (k.clone(), ConfigTree::Null))
                .collect();
            prop_assert_eq!(deep_merge(&ConfigTree::Mapping(nulls), &dest), dest);
        }
    }
}
