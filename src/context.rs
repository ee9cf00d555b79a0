//! # Run Context
//!
//! The immutable settings for one bootstrap run: which environment profile
//! is active, where remote files come from, and where every local file lives.
//! A `RunContext` is built once by the binary and handed by reference to the
//! fetcher, the settings bootstrap and the configuration pipeline.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::defaults;
use crate::error::Result;

/// Environment profile selecting the remote file set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Environment {
    /// Tested files from the `prod` branch. The default.
    #[default]
    #[serde(rename = "prod")]
    Production,
    /// Files not yet promoted to production.
    #[serde(rename = "dev")]
    Development,
    /// Use the files already on disk; never download.
    #[serde(rename = "local")]
    Local,
    /// Build servers: production files, no console interaction.
    #[serde(rename = "build")]
    Build,
}

impl Environment {
    /// Path segment used for this environment on the remote host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "prod",
            Environment::Development => "dev",
            Environment::Local => "local",
            Environment::Build => "build",
        }
    }

    /// Parse a flag value. Unknown values select `Production`.
    pub fn from_flag(value: &str) -> Self {
        match value {
            "dev" => Environment::Development,
            "local" => Environment::Local,
            "build" => Environment::Build,
            _ => Environment::Production,
        }
    }

    /// Scan an argument list for `--env` flags.
    ///
    /// Returns the environment selected by the last `--env...` argument, if
    /// any, together with the raw value it was parsed from and the remaining
    /// arguments in their original order.
    pub fn from_args<I, S>(args: I) -> (Option<(Self, String)>, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected = None;
        let mut rest = Vec::new();
        for arg in args {
            let arg = arg.into();
            if arg.starts_with("--env") {
                let value = arg.split('=').nth(1).unwrap_or_default().to_string();
                selected = Some((Environment::from_flag(&value), value));
            } else {
                rest.push(arg);
            }
        }
        (selected, rest)
    }

    /// Whether remote files are downloaded in this environment.
    pub fn fetches_remote(&self) -> bool {
        !matches!(self, Environment::Local)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file the bootstrapper depends on, by remote and local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResource {
    pub remote: String,
    pub local: String,
}

impl RemoteResource {
    pub fn new(remote: &str, local: &str) -> Self {
        Self {
            remote: remote.to_string(),
            local: local.to_string(),
        }
    }

    /// A resource stored locally under its remote name.
    pub fn same(name: &str) -> Self {
        Self::new(name, name)
    }
}

/// The static list of files fetched on every non-local run.
pub fn default_resources() -> Vec<RemoteResource> {
    vec![
        RemoteResource::same("tfr.vagrant.rb"),
        RemoteResource::same("ansible.cfg"),
        RemoteResource::same(defaults::HINT_FILENAME),
        RemoteResource::same(defaults::DEFAULT_CONFIG_FILENAME),
        RemoteResource::same("tfr.tools.rb"),
    ]
}

/// Subcommands of the orchestration tool recognised in forwarded arguments.
pub const KNOWN_COMMANDS: &[&str] = &[
    "box", "cloud", "destroy", "global-status", "halt", "help", "init", "login",
    "package", "plugin", "port", "powershell", "provision", "push", "rdp", "reload",
    "resume", "snapshot", "ssh", "ssh-config", "status", "suspend", "up", "upload",
    "validate", "version", "winrm", "winrm-config",
];

/// The first forwarded argument that is a known orchestration subcommand.
pub fn detect_command(args: &[String]) -> Option<&str> {
    args.iter()
        .map(String::as_str)
        .find(|arg| KNOWN_COMMANDS.contains(arg))
}

/// Immutable settings for a single run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub environment: Environment,
    pub base_url: Url,
    /// Directory holding the fetched files, including the default layer.
    pub lib_dir: PathBuf,
    pub project_config: PathBuf,
    /// Per-user directory holding the local and override layers.
    pub settings_dir: PathBuf,
    pub timeout: Duration,
    pub resources: Vec<RemoteResource>,
    /// Arguments forwarded untouched to the orchestration tool.
    pub passthrough: Vec<String>,
}

impl RunContext {
    /// Build a context with default resources and paths rooted at `lib_dir`.
    pub fn new(environment: Environment, lib_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            environment,
            base_url: Url::parse(defaults::BASE_URL)?,
            project_config: defaults::default_project_config(&lib_dir),
            lib_dir,
            settings_dir: defaults::default_settings_dir(),
            timeout: defaults::FETCH_TIMEOUT,
            resources: default_resources(),
            passthrough: Vec::new(),
        })
    }

    /// Path of the shipped default configuration layer.
    pub fn default_config(&self) -> PathBuf {
        self.lib_dir.join(defaults::DEFAULT_CONFIG_FILENAME)
    }

    /// Path of the per-user configuration layer.
    pub fn local_config(&self) -> PathBuf {
        self.settings_dir.join(defaults::LOCAL_CONFIG_FILENAME)
    }

    /// Path of the override layer for a project tag.
    pub fn override_config(&self, tag: &str) -> PathBuf {
        self.settings_dir
            .join(tag)
            .join(defaults::OVERRIDE_CONFIG_FILENAME)
    }

    /// Path of the hint text attached to fatal errors.
    pub fn hint_file(&self) -> PathBuf {
        self.lib_dir.join(defaults::HINT_FILENAME)
    }
}
