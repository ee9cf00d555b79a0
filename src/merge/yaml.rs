//! Deep merge of configuration trees
//!
//! This module folds two [`ConfigTree`]s into one. The pipeline always calls
//! `deep_merge(higher_priority, lower_priority)`: the first argument is the
//! *source*, the second the *destination* being enriched.
//!
//! ## Rules
//!
//! Applied by the shape of `(source, dest)`:
//!
//! 1. Both sequences: walk the source by index. Collection elements are
//!    merged with the destination element at the same index; scalar
//!    elements are taken from the source.
//! 2. Both mappings: the result has the destination's keys followed by the
//!    keys only the source has. Nested collections recurse; for leaves the
//!    source value wins unless it is null.
//! 3. Source is a collection, destination is null: the source.
//! 4. Anything else: the destination.
//!
//! Inputs are never mutated and the merge never fails. Shape mismatches are
//! logged at debug level and resolved in favour of the destination.

use log::debug;
use serde_yaml::Mapping;

use super::ConfigTree;

/// Merge `source` into `dest` and return the combined tree.
///
/// # Example
///
/// ```
/// use vagrant_bootstrap::merge::{deep_merge, ConfigTree};
///
/// let guest: ConfigTree = serde_yaml::from_str("memory: 2048").unwrap();
/// let template: ConfigTree = serde_yaml::from_str("cpus: 2\nmemory: 1024").unwrap();
///
/// let merged = deep_merge(&guest, &template);
/// assert_eq!(merged["cpus"], ConfigTree::from(2));
/// assert_eq!(merged["memory"], ConfigTree::from(2048));
/// ```
pub fn deep_merge(source: &ConfigTree, dest: &ConfigTree) -> ConfigTree {
    merge_at(source, dest, "")
}

fn merge_at(source: &ConfigTree, dest: &ConfigTree, path: &str) -> ConfigTree {
    match (source, dest) {
        (ConfigTree::Sequence(src_seq), ConfigTree::Sequence(dst_seq)) => {
            let merged = src_seq
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    if is_collection(value) {
                        let other = dst_seq.get(idx).unwrap_or(&ConfigTree::Null);
                        merge_at(value, other, &format!("{}[{}]", path, idx))
                    } else {
                        value.clone()
                    }
                })
                .collect();
            ConfigTree::Sequence(merged)
        }
        (ConfigTree::Mapping(src_map), ConfigTree::Mapping(dst_map)) => {
            ConfigTree::Mapping(merge_mappings(src_map, dst_map, path))
        }
        (src, ConfigTree::Null) if is_collection(src) => src.clone(),
        (src, dst) => {
            if !src.is_null() && type_name(src) != type_name(dst) {
                debug!(
                    "Type mismatch at path '{}': keeping {} over {}",
                    display_path(path),
                    type_name(dst),
                    type_name(src)
                );
            }
            dst.clone()
        }
    }
}

fn merge_mappings(src_map: &Mapping, dst_map: &Mapping, path: &str) -> Mapping {
    // Union of keys, destination-shaped.
    let mut union = dst_map.clone();
    for (key, value) in src_map {
        if !union.contains_key(key) {
            union.insert(key.clone(), value.clone());
        }
    }

    let mut merged = Mapping::with_capacity(union.len());
    for (key, dst_value) in &union {
        let src_value = src_map.get(key);
        let value = match dst_value {
            ConfigTree::Mapping(_) | ConfigTree::Sequence(_) => {
                let key_path = child_path(path, key);
                merge_at(src_value.unwrap_or(&ConfigTree::Null), dst_value, &key_path)
            }
            _ => match src_value {
                Some(src) if !src.is_null() => src.clone(),
                _ => dst_value.clone(),
            },
        };
        merged.insert(key.clone(), value);
    }
    merged
}

fn is_collection(value: &ConfigTree) -> bool {
    matches!(value, ConfigTree::Mapping(_) | ConfigTree::Sequence(_))
}

fn child_path(path: &str, key: &ConfigTree) -> String {
    let key_str = match key {
        ConfigTree::String(s) => s.clone(),
        other => format!("{:?}", other),
    };
    if path.is_empty() {
        key_str
    } else {
        format!("{}.{}", path, key_str)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Get a human-readable type name for a configuration value
///
/// Used for logging to describe the shape of a value.
pub fn type_name(value: &ConfigTree) -> &'static str {
    match value {
        ConfigTree::Null => "Null",
        ConfigTree::Bool(_) => "Bool",
        ConfigTree::Number(_) => "Number",
        ConfigTree::String(_) => "String",
        ConfigTree::Sequence(_) => "Sequence",
        ConfigTree::Mapping(_) => "Mapping",
        ConfigTree::Tagged(_) => "Tagged",
    }
}
