//! # Vagrant Bootstrap Library
//!
//! Prepares the environment of a Vagrant project before any virtual machine
//! is defined: it downloads the shared provisioning files, loads the layered
//! YAML configuration and folds it into one effective configuration tree.
//!
//! ## Quick Example
//!
//! ```
//! use vagrant_bootstrap::merge::{deep_merge, ConfigTree};
//!
//! let default: ConfigTree = serde_yaml::from_str("cpus: 2\nmemory: 512\n").unwrap();
//! let project: ConfigTree = serde_yaml::from_str("memory: 1024\n").unwrap();
//!
//! let merged = deep_merge(&project, &default);
//! assert_eq!(merged["cpus"], ConfigTree::from(2));
//! assert_eq!(merged["memory"], ConfigTree::from(1024));
//! ```
//!
//! ## Core Concepts
//!
//! - **Run context (`context`)**: the immutable settings of one run, including
//!   the environment profile (`prod`, `dev`, `local`, `build`).
//! - **Fetching (`fetch`)**: downloads each remote resource for the active
//!   environment, falls back to `prod` when the host answers "Not Found", and
//!   reuses the local copy when offline.
//! - **Loading (`loader`)**: reads one YAML layer; the caller decides whether
//!   a failure is fatal.
//! - **Merging (`merge`)**: the recursive deep merge where the source layer
//!   overrides the destination layer.
//! - **Pipeline (`pipeline`)**: `default` → `project` → guest expansion →
//!   `local` → `override`.
//! - **Guest plans (`guest`)**: the typed view handed to the orchestration
//!   driver.
//!
//! ## Execution Flow
//!
//! 1.  **Fetch**: download the resource list unless the environment is `local`.
//! 2.  **Settings**: create the per-user settings file on first run.
//! 3.  **Merge**: build the effective configuration from all layers.
//! 4.  **Plan**: derive one plan per guest and emit the handoff document.

pub mod context;
pub mod defaults;
pub mod error;
pub mod fetch;
pub mod guest;
pub mod loader;
pub mod merge;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod settings;
pub mod suggestions;

#[cfg(test)]
mod merge_proptest;
