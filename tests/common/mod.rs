//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture laid out like a Vagrant project: a `lib/`
//! directory holding the fetched files, the project layer next to it and a
//! private settings directory.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_default_config(configs::DEFAULT);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration YAML snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Default layer with a complete guest template.
    pub const DEFAULT: &str = r#"
vagrant:
  version: ">= 2.2.0"
  hostmanager:
    enabled: true
project:
  tag: base
default_guest:
  postfix: 1
  box:
    name: ubuntu/jammy64
    url: https://vagrantcloud.com/ubuntu/jammy64
    network:
      nics:
        default:
          ip: 192.168.56.10
    provider:
      virtualbox:
        cpus: 1
        memory: 512
    provisioner:
      ansible:
        playbooks: [site.yml]
    filesystem:
      folders:
        app:
          mounttype: nfs
          src: ./app
"#;

    /// Project layer defining two guests.
    pub const PROJECT: &str = r#"
project:
  tag: shop
guests:
  web:
    box:
      provider:
        virtualbox:
          memory: 1024
  db:
    postfix: 2
"#;

    /// Local layer allowing host management.
    pub const LOCAL: &str = "vagrant:\n  hostmanager:\n    manage_host: true\n";

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "invalid: [yaml: {broken";

    /// Hint shipped next to the default layer.
    pub const HINT: &str = "Read the setup guide at https://example.org/vagrant\n";
}

/// A temporary project directory with the bootstrapper's file layout.
///
/// ```text
/// <root>/
///   vagrant-project-config.yml
///   lib/vagrant-default-config.yml
///   lib/hint.txt
///   settings/vagrant-local-config.yml
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with empty `lib/` and `settings/` directories.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("lib")
            .create_dir_all()
            .expect("Failed to create lib directory");
        temp_dir
            .child("settings")
            .create_dir_all()
            .expect("Failed to create settings directory");
        Self { temp_dir }
    }

    /// A fixture with default, project and local layers plus a hint file.
    pub fn complete() -> Self {
        Self::new()
            .with_default_config(configs::DEFAULT)
            .with_project_config(configs::PROJECT)
            .with_local_config(configs::LOCAL)
            .with_hint(configs::HINT)
    }

    pub fn with_default_config(self, content: &str) -> Self {
        self.with_file("lib/vagrant-default-config.yml", content)
    }

    pub fn with_project_config(self, content: &str) -> Self {
        self.with_file("vagrant-project-config.yml", content)
    }

    pub fn with_local_config(self, content: &str) -> Self {
        self.with_file("settings/vagrant-local-config.yml", content)
    }

    /// Add an override layer for the given project tag.
    pub fn with_override_config(self, tag: &str, content: &str) -> Self {
        self.with_file(&format!("settings/{tag}/vagrant-override-config.yml"), content)
    }

    pub fn with_hint(self, content: &str) -> Self {
        self.with_file("lib/hint.txt", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.path().join("lib")
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.path().join("settings")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command pointed at this fixture, without colors.
    ///
    /// Environment variables that would redirect the run are cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("vagrant-bootstrap");
        cmd.current_dir(self.path())
            .env_remove("VAGRANT_BOOTSTRAP_BASE_URL")
            .env_remove("VAGRANT_BOOTSTRAP_LIB_DIR")
            .env_remove("VAGRANT_BOOTSTRAP_SETTINGS_DIR")
            .env_remove("VAGRANT_BOOTSTRAP_LOG")
            .arg("--color=never")
            .arg("--lib-dir")
            .arg(self.lib_dir())
            .arg("--settings-dir")
            .arg(self.settings_dir());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let fixture = TestFixture::complete();
        assert!(fixture.lib_dir().join("vagrant-default-config.yml").exists());
        assert!(fixture.path().join("vagrant-project-config.yml").exists());
        assert!(fixture.settings_dir().join("vagrant-local-config.yml").exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        for config in [configs::DEFAULT, configs::PROJECT, configs::LOCAL] {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
