//! Package, artifact and repository types shared by every stage

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::config::RepositoryDescriptor;
use crate::error::SyncError;

/// A single versioned package within a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,

    pub category: String,

    pub version: String,

    /// Content-derived identity, joins the package to its artifact
    #[serde(default)]
    pub fingerprint: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub license: String,

    /// Upstream homepages
    #[serde(default)]
    pub uri: Vec<String>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Arbitrary metadata, passed through to templates untouched
    #[serde(default)]
    pub annotations: BTreeMap<String, serde_yaml_ng::Value>,
}

impl Package {
    /// Create a package with only its identity set
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let mut package = Self {
            name: name.into(),
            category: category.into(),
            version: version.into(),
            fingerprint: String::new(),
            description: String::new(),
            license: String::new(),
            uri: Vec::new(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        };
        package.fingerprint = package.derived_fingerprint();
        package
    }

    /// Fingerprint derived from the package identity
    pub fn derived_fingerprint(&self) -> String {
        format!("{}-{}-{}", self.name, self.category, self.version)
    }

    /// `category/name@version`
    pub fn human_id(&self) -> String {
        format!("{}/{}@{}", self.category, self.name, self.version)
    }
}

/// Build output recorded for one package fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub fingerprint: String,

    /// Paths of the files the artifact installs
    #[serde(default)]
    pub files: Vec<String>,
}

/// Everything a sync produces for one repository (repository.yaml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSet {
    #[serde(default)]
    pub packages: Vec<Package>,

    /// The artifact index
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl PackageSet {
    /// Parse a repository index from YAML
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(content)
    }

    /// Fill in missing fingerprints and check index consistency
    ///
    /// Fails if two artifacts share a fingerprint.
    pub fn normalize(mut self) -> Result<Self, SyncError> {
        for package in &mut self.packages {
            if package.fingerprint.is_empty() {
                package.fingerprint = package.derived_fingerprint();
            }
        }

        let mut seen = HashSet::new();
        for artifact in &self.artifacts {
            if !seen.insert(artifact.fingerprint.as_str()) {
                return Err(SyncError::Inconsistent(format!(
                    "more than one artifact for fingerprint '{}'",
                    artifact.fingerprint
                )));
            }
        }

        Ok(self)
    }
}

/// A successfully synchronized repository
#[derive(Debug, Clone)]
pub struct Repository {
    pub descriptor: RepositoryDescriptor,
    pub packages: PackageSet,
}

impl Repository {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Number of entries in the artifact index
    pub fn artifact_count(&self) -> usize {
        self.packages.artifacts.len()
    }

    /// Packages stably sorted by name
    pub fn sorted_packages(&self) -> Vec<Package> {
        sorted_by_name(&self.packages.packages)
    }
}

/// Stable sort by package name; equal names keep their relative order
pub fn sorted_by_name(packages: &[Package]) -> Vec<Package> {
    let mut sorted = packages.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}
