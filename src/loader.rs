//! # YAML Layer Loader
//!
//! Reads one configuration layer from disk into a [`ConfigTree`].
//!
//! Whether a failure is fatal is decided by the caller through
//! [`LoadOptions::required`], not by the loader: a required layer that cannot
//! be loaded is returned as [`Error::ConfigLoad`], while an optional layer
//! yields `Ok(None)` and, unless silenced, a warning.
//!
//! The [`LayerLoader`] trait sits between the pipeline and the filesystem so
//! tests can observe exactly which layers the pipeline asks for.

use std::path::Path;

use log::{info, warn};
use serde_yaml::Mapping;

use crate::error::{Error, Result};
use crate::merge::ConfigTree;
use crate::path;

/// How a layer should be loaded and what happens when it cannot be.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions<'a> {
    /// Failure is an error rather than an absent layer.
    pub required: bool,
    /// Suppress the warning for an absent optional layer.
    pub silent: bool,
    /// Human-readable layer name used in log lines and errors.
    pub label: &'a str,
    /// Rewrite every mapping key into its canonical string form.
    pub symbolize: bool,
}

impl<'a> LoadOptions<'a> {
    /// A layer the run cannot continue without.
    pub fn required(label: &'a str) -> Self {
        Self {
            required: true,
            silent: false,
            label,
            symbolize: true,
        }
    }

    /// A layer that may be absent without comment.
    pub fn optional(label: &'a str) -> Self {
        Self {
            required: false,
            silent: true,
            label,
            symbolize: true,
        }
    }
}

/// Source of configuration layers.
pub trait LayerLoader {
    /// Load the layer at `path`.
    ///
    /// Returns `Ok(None)` when an optional layer is absent or unreadable.
    fn load(&self, path: &Path, options: LoadOptions<'_>) -> Result<Option<ConfigTree>>;
}

/// The default [`LayerLoader`], reading YAML documents from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlLoader;

impl LayerLoader for YamlLoader {
    fn load(&self, path: &Path, options: LoadOptions<'_>) -> Result<Option<ConfigTree>> {
        load(path, options)
    }
}

/// Load a YAML layer from `path`.
///
/// The path is expanded to an absolute form first (see [`path::expand`]).
/// A document whose root is null is an empty mapping; any other non-mapping
/// root is a load failure.
pub fn load(path: &Path, options: LoadOptions<'_>) -> Result<Option<ConfigTree>> {
    let path = path::expand(path)?;
    match read_layer(&path) {
        Ok(tree) => {
            info!("Loaded {} from {}.", options.label, path.display());
            Ok(Some(if options.symbolize {
                symbolize(&tree)
            } else {
                tree
            }))
        }
        Err(message) if options.required => Err(Error::ConfigLoad {
            layer: options.label.to_string(),
            path: path.display().to_string(),
            message,
        }),
        Err(message) => {
            if !options.silent {
                warn!(
                    "Could not load {} from {}: {}",
                    options.label,
                    path.display(),
                    message
                );
            }
            Ok(None)
        }
    }
}

fn read_layer(path: &Path) -> std::result::Result<ConfigTree, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let tree: ConfigTree = serde_yaml::from_str(&content).map_err(|e| e.to_string())?;
    match tree {
        ConfigTree::Null => Ok(ConfigTree::Mapping(Mapping::new())),
        ConfigTree::Mapping(_) => Ok(tree),
        other => Err(format!(
            "expected a mapping at the document root, found {}",
            crate::merge::yaml::type_name(&other)
        )),
    }
}

/// Rewrite every mapping key into its canonical string form.
///
/// String, number and boolean keys become string keys (`1` becomes `"1"`).
/// Null and collection keys are kept as they are. Mappings nested in
/// mappings or sequences are rewritten recursively; sequences stay
/// sequences.
pub fn symbolize(tree: &ConfigTree) -> ConfigTree {
    match tree {
        ConfigTree::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map {
                out.insert(canonical_key(key), symbolize(value));
            }
            ConfigTree::Mapping(out)
        }
        ConfigTree::Sequence(seq) => ConfigTree::Sequence(seq.iter().map(symbolize).collect()),
        other => other.clone(),
    }
}

fn canonical_key(key: &ConfigTree) -> ConfigTree {
    match key {
        ConfigTree::Number(n) => ConfigTree::String(n.to_string()),
        ConfigTree::Bool(b) => ConfigTree::String(b.to_string()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(yaml: &str) -> ConfigTree {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_load_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vagrant-default-config.yml");
        fs::write(&path, "project:\n  tag: demo\n").unwrap();

        let loaded = load(&path, LoadOptions::required("default configuration")).unwrap();
        assert_eq!(loaded, Some(tree("project:\n  tag: demo\n")));
    }

    #[test]
    fn test_missing_required_layer_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yml");

        let result = load(&path, LoadOptions::required("project configuration"));
        match result {
            Err(Error::ConfigLoad { layer, path: p, .. }) => {
                assert_eq!(layer, "project configuration");
                assert!(p.ends_with("missing.yml"));
            }
            other => panic!("Expected ConfigLoad error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_optional_layer_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yml");

        let loaded = load(&path, LoadOptions::optional("local configuration")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_missing_optional_layer_warns_unless_silent() {
        testing_logger::setup();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yml");

        let loud = LoadOptions {
            silent: false,
            ..LoadOptions::optional("override configuration")
        };
        assert!(load(&path, loud).unwrap().is_none());
        assert!(load(&path, LoadOptions::optional("local configuration"))
            .unwrap()
            .is_none());

        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|log| log.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("override configuration"));
        });
    }

    #[test]
    fn test_invalid_yaml_optional_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.yml");
        fs::write(&path, "invalid: [yaml: {broken").unwrap();

        assert!(load(&path, LoadOptions::optional("local configuration"))
            .unwrap()
            .is_none());
        assert!(load(&path, LoadOptions::required("default configuration")).is_err());
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.yml");
        fs::write(&path, "").unwrap();

        let loaded = load(&path, LoadOptions::required("default configuration")).unwrap();
        assert_eq!(loaded, Some(ConfigTree::Mapping(Mapping::new())));
    }

    #[test]
    fn test_sequence_root_is_load_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("list.yml");
        fs::write(&path, "- a\n- b\n").unwrap();

        let err = load(&path, LoadOptions::required("project configuration")).unwrap_err();
        assert!(err.to_string().contains("expected a mapping"));
    }

    #[test]
    fn test_yaml_loader_delegates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layer.yml");
        fs::write(&path, "a: 1\n").unwrap();

        let loaded = YamlLoader
            .load(&path, LoadOptions::optional("layer"))
            .unwrap();
        assert_eq!(loaded, Some(tree("a: 1\n")));
    }

    mod symbolize_tests {
        use super::*;

        #[test]
        fn test_symbolize_stringifies_scalar_keys() {
            let symbolized = symbolize(&tree("1: one\ntrue: yes\nname: x\n"));
            let keys: Vec<_> = symbolized
                .as_mapping()
                .unwrap()
                .keys()
                .map(|k| k.as_str().unwrap().to_string())
                .collect();
            assert_eq!(keys, vec!["1", "true", "name"]);
        }

        #[test]
        fn test_symbolize_recurses_into_nested_mappings() {
            let symbolized = symbolize(&tree("nics:\n  default:\n    8080: 80\n"));
            assert_eq!(symbolized["nics"]["default"]["8080"], tree("80"));
        }

        #[test]
        fn test_symbolize_preserves_sequences() {
            let symbolized = symbolize(&tree("plugins:\n  - name: a\n    1: x\n  - plain\n"));
            let plugins = symbolized["plugins"].as_sequence().unwrap();
            assert_eq!(plugins.len(), 2);
            assert_eq!(plugins[0]["1"], tree("x"));
            assert_eq!(plugins[1], tree("plain"));
        }

        #[test]
        fn test_symbolize_keeps_scalars() {
            assert_eq!(symbolize(&tree("42")), tree("42"));
            assert_eq!(symbolize(&ConfigTree::Null), ConfigTree::Null);
        }
    }
}
