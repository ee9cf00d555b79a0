//! # Error Handling
//!
//! This module defines the centralized error type for the bootstrapper. It
//! uses the `thiserror` library to derive an `Error` enum covering every
//! failure mode that can cross a module boundary.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant carries the resource, path or
//!   URL involved so the binary can print an actionable message.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The failure taxonomy maps onto the variants as follows:
//!
//! - Remote file missing and no local copy: `FetchUnavailable`.
//! - Configuration layer missing or unparsable: `ConfigLoad`.
//! - Transport-level HTTP failure: `Network`.
//! - First-run settings file could not be written: `Settings`.
//! - Effective configuration lacks a key the orchestration driver needs: `Plan`.
//!
//! The deep merge engine never produces an error; shape mismatches are
//! resolved in favour of the destination value.

use thiserror::Error;

/// Main error type for bootstrap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A remote resource could not be downloaded and no cached copy exists.
    #[error("Could not find {path} and could not download {resource} from {url}: {message}\n  hint: please check your internet connection to proceed")]
    FetchUnavailable {
        resource: String,
        url: String,
        path: String,
        message: String,
    },

    /// A configuration layer could not be read or parsed.
    #[error("Could not load {layer} from {path}: {message}")]
    ConfigLoad {
        layer: String,
        path: String,
        message: String,
    },

    /// A transport-level failure while talking to the remote host.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The per-user settings file could not be created.
    #[error("Could not write settings file at {path}: {message}")]
    Settings { path: String, message: String },

    /// The effective configuration is missing data needed to plan a guest.
    #[error("Invalid guest configuration for '{guest}': {message}")]
    Plan { guest: String, message: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
