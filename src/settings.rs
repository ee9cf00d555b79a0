//! First-run setup of the per-user settings file.
//!
//! The local configuration layer lives in the user's settings directory and
//! records whether the orchestration tool may manage host entries. When the
//! file is missing it is created from an explicit answer: build servers
//! always answer `true`, other environments take the `--manage-host` flag.
//! Without an answer the run continues with a warning and the layer stays
//! absent.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::context::{Environment, RunContext};
use crate::error::{Error, Result};
use crate::suggestions;

/// State of the per-user settings file after [`ensure_local_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalConfigStatus {
    /// The file already existed and was left untouched.
    Existing(PathBuf),
    /// The file was created with the given `manage_host` value.
    Created { path: PathBuf, manage_host: bool },
    /// The file is missing and no answer was available.
    Missing(PathBuf),
}

/// Make sure the per-user settings file exists when an answer is known.
///
/// # Errors
///
/// Returns [`Error::Settings`] if the directory or file cannot be written.
pub fn ensure_local_config(
    ctx: &RunContext,
    manage_host: Option<bool>,
) -> Result<LocalConfigStatus> {
    let path = ctx.local_config();
    if path.is_file() {
        return Ok(LocalConfigStatus::Existing(path));
    }

    let answer = match ctx.environment {
        Environment::Build => Some(true),
        _ => manage_host,
    };
    let Some(manage_host) = answer else {
        warn!("{}", suggestions::local_config_missing(&path));
        return Ok(LocalConfigStatus::Missing(path));
    };

    let settings_error = |e: std::io::Error| Error::Settings {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    fs::create_dir_all(&ctx.settings_dir).map_err(settings_error)?;
    fs::write(&path, local_config_document(manage_host)).map_err(settings_error)?;
    info!("Successfully created {}", path.display());

    Ok(LocalConfigStatus::Created { path, manage_host })
}

fn local_config_document(manage_host: bool) -> String {
    format!(
        "---\nvagrant:\n  hostmanager:\n    manage_host: {}\n",
        manage_host
    )
}
