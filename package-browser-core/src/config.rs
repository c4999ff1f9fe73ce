//! Site configuration (config.yaml)
//!
//! Lists the repositories to browse. The raw document is kept alongside
//! the typed view so templates can read any extra keys under `Config`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::paths::{is_reserved_root_entry, is_safe_component};

/// How a repository is reached
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RepositoryKind {
    /// Index served over HTTP(S)
    #[default]
    Http,
    /// Index on the local filesystem
    Disk,
    /// Any other type; syncing such a repository fails
    Unsupported(String),
}

impl From<String> for RepositoryKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "http" => RepositoryKind::Http,
            "disk" => RepositoryKind::Disk,
            _ => RepositoryKind::Unsupported(value),
        }
    }
}

impl From<RepositoryKind> for String {
    fn from(kind: RepositoryKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryKind::Http => f.write_str("http"),
            RepositoryKind::Disk => f.write_str("disk"),
            RepositoryKind::Unsupported(other) => f.write_str(other),
        }
    }
}

/// A configured repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Unique repository name, also its output directory
    pub name: String,

    /// Base URL (or directory for `disk`) holding `repository.yaml`
    pub url: String,

    /// Repository type, defaults to `http`
    #[serde(rename = "type", default)]
    pub kind: RepositoryKind,

    /// Link to the repository's source tree
    #[serde(default)]
    pub github: String,

    /// Human readable description
    #[serde(default)]
    pub description: String,
}

/// Display metadata handed to templates as `AdditionalData[<name>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMeta {
    pub github: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl RepositoryDescriptor {
    pub fn display_meta(&self) -> DisplayMeta {
        DisplayMeta {
            github: self.github.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            kind: self.kind.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSiteConfig {
    #[serde(rename = "Repositories", alias = "repositories", default)]
    repositories: Vec<RepositoryDescriptor>,
}

/// Parsed configuration file
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Repositories in configuration order
    pub repositories: Vec<RepositoryDescriptor>,

    /// The whole document, exposed verbatim to templates
    pub raw: serde_yaml_ng::Value,
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|err| match err {
            ParseFailure::Yaml(source) => Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(message) => Error::ConfigInvalid(message),
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ParseFailure> {
        let typed: RawSiteConfig = serde_yaml_ng::from_str(content).map_err(ParseFailure::Yaml)?;
        let raw: serde_yaml_ng::Value =
            serde_yaml_ng::from_str(content).map_err(ParseFailure::Yaml)?;

        let config = Self {
            repositories: typed.repositories,
            raw,
        };
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let mut seen = HashSet::new();
        for repo in &self.repositories {
            if !is_safe_component(&repo.name) {
                return Err(format!("repository name '{}' is not a valid path component", repo.name));
            }
            if is_reserved_root_entry(&repo.name) {
                return Err(format!(
                    "repository name '{}' is reserved for the site layout",
                    repo.name
                ));
            }
            if !seen.insert(repo.name.as_str()) {
                return Err(format!("repository '{}' is declared more than once", repo.name));
            }
        }
        Ok(())
    }

    /// Display metadata keyed by repository name
    pub fn additional_data(&self) -> BTreeMap<String, DisplayMeta> {
        self.repositories
            .iter()
            .map(|r| (r.name.clone(), r.display_meta()))
            .collect()
    }
}

/// Reasons a configuration string is rejected
#[derive(Debug)]
pub enum ParseFailure {
    Yaml(serde_yaml_ng::Error),
    Invalid(String),
}
