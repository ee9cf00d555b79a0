//! # Remote File Fetcher
//!
//! Downloads every [`RemoteResource`] of a run into the library directory.
//!
//! ## Behavior
//!
//! For each resource the fetcher requests
//! `<base>/<environment>/lib/<remote name>`:
//!
//! - A body starting with the "Not Found" sentinel is retried against the
//!   `prod` path of the same resource.
//! - A usable body overwrites the local file.
//! - A sentinel on every path, or a transport failure, keeps the existing
//!   local file with a warning. Without a local file the run cannot
//!   continue and [`Error::FetchUnavailable`] is returned.
//! - The `local` environment never fetches.
//!
//! Fetching is sequential and blocking. HTTP is hidden behind the
//! [`HttpClient`] trait so tests can script responses.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use url::Url;

use crate::context::{Environment, RemoteResource, RunContext};
use crate::error::{Error, Result};

/// Response-body prefixes marking a missing remote resource.
const NOT_FOUND_SENTINELS: [&str; 2] = ["Not Found", "404: Not Found"];

/// Trait for HTTP GET - allows mocking in tests
pub trait HttpClient {
    /// Fetch `url` and return the response body.
    ///
    /// Returns [`Error::Network`] for transport-level failures only; the
    /// status code is not inspected.
    fn get(&self, url: &Url) -> Result<String>;
}

/// The default [`HttpClient`], backed by a blocking `reqwest` client.
pub struct BlockingClient {
    inner: reqwest::blocking::Client,
}

impl BlockingClient {
    /// Build a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(format!("vagrant-bootstrap/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network {
                url: String::new(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { inner })
    }
}

impl HttpClient for BlockingClient {
    fn get(&self, url: &Url) -> Result<String> {
        let network_error = |e: reqwest::Error| Error::Network {
            url: url.to_string(),
            message: e.to_string(),
        };
        self.inner
            .get(url.clone())
            .send()
            .map_err(network_error)?
            .text()
            .map_err(network_error)
    }
}

/// What happened to one resource during a fetch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Downloaded from the environment's own path.
    Downloaded { url: String },
    /// Downloaded from the `prod` path after the environment's path was missing.
    FellBack { url: String },
    /// Nothing usable was downloaded; the existing local file was kept.
    KeptLocal { url: String, reason: String },
}

/// Result of fetching one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub resource: String,
    pub path: PathBuf,
    pub outcome: FetchOutcome,
}

/// Returns `true` if `body` is the missing-resource sentinel.
pub fn is_missing_resource(body: &str) -> bool {
    NOT_FOUND_SENTINELS
        .iter()
        .any(|sentinel| body.starts_with(sentinel))
}

/// Build the remote URL of `resource` for `environment`.
pub fn resource_url(base: &Url, environment: Environment, resource: &str) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    let url = Url::parse(&format!(
        "{}/{}/lib/{}",
        base,
        environment.as_str(),
        resource
    ))?;
    Ok(url)
}

/// Downloads the remote file set of a [`RunContext`].
pub struct Fetcher<'a> {
    client: &'a dyn HttpClient,
    ctx: &'a RunContext,
}

enum Download {
    Body { url: Url, body: String, fell_back: bool },
    Missing { url: Url, reason: String },
}

impl<'a> Fetcher<'a> {
    pub fn new(client: &'a dyn HttpClient, ctx: &'a RunContext) -> Self {
        Self { client, ctx }
    }

    /// Fetch every resource of the context, one at a time.
    ///
    /// Returns an empty report for the `local` environment. Stops at the
    /// first resource that is neither downloadable nor cached.
    pub fn fetch_all(&self) -> Result<Vec<FetchReport>> {
        if !self.ctx.environment.fetches_remote() {
            info!("Environment is local, using files in {}", self.ctx.lib_dir.display());
            return Ok(Vec::new());
        }

        self.ctx
            .resources
            .iter()
            .map(|resource| self.fetch(resource))
            .collect()
    }

    /// Fetch a single resource into the library directory.
    pub fn fetch(&self, resource: &RemoteResource) -> Result<FetchReport> {
        let local_path = self.ctx.lib_dir.join(&resource.local);
        let outcome = match self.download(&resource.remote)? {
            Download::Body {
                url,
                body,
                fell_back,
            } => {
                write_local(&local_path, &body)?;
                debug!("Wrote {} ({} bytes)", local_path.display(), body.len());
                if fell_back {
                    FetchOutcome::FellBack {
                        url: url.to_string(),
                    }
                } else {
                    FetchOutcome::Downloaded {
                        url: url.to_string(),
                    }
                }
            }
            Download::Missing { url, reason } => {
                if !local_path.is_file() {
                    return Err(Error::FetchUnavailable {
                        resource: resource.remote.clone(),
                        url: url.to_string(),
                        path: local_path.display().to_string(),
                        message: reason,
                    });
                }
                warn!(
                    "Could not download from {}, please check your internet connection. Using {}",
                    url,
                    local_path.display()
                );
                FetchOutcome::KeptLocal {
                    url: url.to_string(),
                    reason,
                }
            }
        };

        Ok(FetchReport {
            resource: resource.remote.clone(),
            path: local_path,
            outcome,
        })
    }

    fn download(&self, remote: &str) -> Result<Download> {
        let environment = self.ctx.environment;
        let url = resource_url(&self.ctx.base_url, environment, remote)?;
        let body = match self.client.get(&url) {
            Ok(body) => body,
            Err(e) => return Ok(transport_failure(url, e)),
        };
        if !is_missing_resource(&body) {
            return Ok(Download::Body {
                url,
                body,
                fell_back: false,
            });
        }

        if environment == Environment::Production {
            return Ok(Download::Missing {
                url,
                reason: "remote resource not found".to_string(),
            });
        }

        info!("{} not found for {}, using the prod version", remote, environment);
        let prod_url = resource_url(&self.ctx.base_url, Environment::Production, remote)?;
        match self.client.get(&prod_url) {
            Ok(body) if is_missing_resource(&body) => Ok(Download::Missing {
                url: prod_url,
                reason: "remote resource not found".to_string(),
            }),
            Ok(body) => Ok(Download::Body {
                url: prod_url,
                body,
                fell_back: true,
            }),
            Err(e) => Ok(transport_failure(prod_url, e)),
        }
    }
}

fn transport_failure(url: Url, error: Error) -> Download {
    let reason = match error {
        Error::Network { message, .. } => message,
        other => other.to_string(),
    };
    Download::Missing { url, reason }
}

fn write_local(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, body)?;
    Ok(())
}
