//! Path manipulation utilities for vagrant-bootstrap

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a path into an absolute form.
///
/// A leading `~` is replaced with the user's home directory and relative
/// paths are resolved against the current working directory. `.` and `..`
/// components are folded lexically; the path does not need to exist.
pub fn expand<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or_else(|| Error::Path {
                message: format!("Cannot expand {}: home directory is unknown", path.display()),
            })?;
            home.join(rest)
        }
        Err(_) => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    Ok(normalize(&absolute))
}

/// Fold `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
