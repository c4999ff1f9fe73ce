//! Error types for the package browser pipeline
//!
//! `Error` covers the fatal class: anything that aborts the whole run.
//! Per-repository and per-page failures have their own types and never
//! escalate into `Error`.

use std::path::PathBuf;
use thiserror::Error;

use crate::badge::BadgeError;

/// Result alias for fatal pipeline operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal errors that terminate a site build
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or has the wrong shape
    #[error("Failed to parse configuration file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The configuration is well-formed but semantically invalid
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A required template file is missing or unreadable
    #[error("Failed to read template {path}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A badge could not be encoded
    #[error("Failed to render badge for repository '{repository}'")]
    Badge {
        repository: String,
        #[source]
        source: BadgeError,
    },

    /// The temporary sync workspace could not be created
    #[error("Failed to create temporary sync workspace")]
    Workspace(#[source] std::io::Error),

    /// Writing into the output tree failed
    #[error("Failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while synchronizing a single repository
///
/// These are reported and the repository is skipped; the run continues.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Repository type '{0}' is not supported")]
    UnsupportedKind(String),

    #[error("Failed to fetch {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse repository index {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The repository index violates a consistency rule
    #[error("Inconsistent repository index: {0}")]
    Inconsistent(String),
}
