//! Default values for vagrant-bootstrap configuration.
//!
//! This module provides centralized default values used by the CLI and the
//! library, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL the remote file set is served from.
///
/// Resources live at `<base>/<environment>/lib/<name>`.
pub const BASE_URL: &str = "https://raw.githubusercontent.com/Tobias-Fischer-Official/tfr-vagrant";

/// File name of the shipped default configuration layer.
pub const DEFAULT_CONFIG_FILENAME: &str = "vagrant-default-config.yml";

/// File name of the per-project configuration layer.
pub const PROJECT_CONFIG_FILENAME: &str = "vagrant-project-config.yml";

/// File name of the per-user configuration layer.
pub const LOCAL_CONFIG_FILENAME: &str = "vagrant-local-config.yml";

/// File name of the per-project, per-user override layer.
pub const OVERRIDE_CONFIG_FILENAME: &str = "vagrant-override-config.yml";

/// File name of the hint text attached to fatal errors.
pub const HINT_FILENAME: &str = "hint.txt";

/// Directory under `$HOME` holding per-user settings.
pub const LOCAL_USER_SETTINGS_DIR: &str = ".fourforbusiness_vagrant";

/// HTTP request timeout used when no `--timeout` is given.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the default per-user settings directory.
///
/// Resolves to `~/.fourforbusiness_vagrant`. Falls back to a directory of the
/// same name in the current directory if the home directory cannot be
/// determined.
///
/// This can be overridden by the `--settings-dir` CLI flag or the
/// `VAGRANT_BOOTSTRAP_SETTINGS_DIR` environment variable.
pub fn default_settings_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOCAL_USER_SETTINGS_DIR)
}

/// Returns the default project configuration path for a library directory.
///
/// The project layer lives one level above the directory holding the
/// fetched files.
pub fn default_project_config(lib_dir: &Path) -> PathBuf {
    lib_dir
        .parent()
        .unwrap_or(lib_dir)
        .join(PROJECT_CONFIG_FILENAME)
}
