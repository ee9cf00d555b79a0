//! Configuration tree merging and navigation
//!
//! Every configuration layer is parsed into a [`ConfigTree`], a recursive
//! value that is either a mapping, an ordered sequence, or a scalar. The
//! [`yaml`] submodule holds the deep merge engine that folds two trees into
//! one; this module holds the path helpers the pipeline and the guest
//! planner use to read values back out of a merged tree.
//!
//! ## Paths
//!
//! Paths use dot notation with optional sequence indices, e.g.
//! `project.tag` or `guests.web.box.network.nics.default.ip` or
//! `playbooks[0]`.

pub mod yaml;

pub use yaml::deep_merge;

/// A parsed configuration document.
///
/// Mappings preserve insertion order so merges are reproducible.
pub type ConfigTree = serde_yaml::Value;

/// Represents a segment in a path expression for navigating nested structures
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A named key for accessing mapping members
    Key(String),
    /// A numeric index for accessing sequence elements
    Index(usize),
}

/// Parse a path string into segments.
///
/// Empty segments are skipped, so `a..b` is the same as `a.b`. A bracket
/// that does not contain a number is treated as a key.
///
/// # Examples
///
/// ```
/// use vagrant_bootstrap::merge::{parse_path, PathSegment};
///
/// let segments = parse_path("playbooks[1]");
/// assert_eq!(segments[1], PathSegment::Index(1));
/// ```
pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let mut rest = part;
        while let Some(open) = rest.find('[') {
            let key = &rest[..open];
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_string()));
            }
            let Some(close) = rest[open..].find(']') else {
                segments.push(PathSegment::Key(rest[open..].to_string()));
                rest = "";
                break;
            };
            let inner = rest[open + 1..open + close].trim();
            match inner.parse::<usize>() {
                Ok(idx) => segments.push(PathSegment::Index(idx)),
                Err(_) if !inner.is_empty() => segments.push(PathSegment::Key(inner.to_string())),
                Err(_) => {}
            }
            rest = &rest[open + close + 1..];
        }
        if !rest.is_empty() {
            segments.push(PathSegment::Key(rest.to_string()));
        }
    }
    segments
}

/// Look up the value at `path`, or `None` if any segment is missing.
pub fn lookup<'a>(tree: &'a ConfigTree, path: &str) -> Option<&'a ConfigTree> {
    let mut current = tree;
    for segment in parse_path(path) {
        current = match segment {
            PathSegment::Key(key) => current.as_mapping()?.get(key.as_str())?,
            PathSegment::Index(idx) => current.as_sequence()?.get(idx)?,
        };
    }
    Some(current)
}

/// Look up a scalar at `path` and render it as a string.
///
/// Numbers and booleans are stringified; mappings, sequences and nulls
/// yield `None`.
pub fn lookup_string(tree: &ConfigTree, path: &str) -> Option<String> {
    match lookup(tree, path)? {
        ConfigTree::String(s) => Some(s.clone()),
        ConfigTree::Number(n) => Some(n.to_string()),
        ConfigTree::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
