//! Data handed to each page template
//!
//! Top-level keys are PascalCase (`Packages`, `Config`, ...); that naming is
//! part of the template contract.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::DisplayMeta;
use crate::index::RepositoryPackages;
use crate::model::{Package, Repository};

/// Per-repository summary listed on the landing page
#[derive(Debug, Serialize)]
pub struct RepositorySummary<'a> {
    pub name: &'a str,
    pub url: &'a str,
    #[serde(rename = "type")]
    pub kind: String,
    pub github: &'a str,
    pub description: &'a str,
    pub package_count: usize,
    pub artifact_count: usize,
}

impl<'a> From<&'a Repository> for RepositorySummary<'a> {
    fn from(repo: &'a Repository) -> Self {
        Self {
            name: repo.name(),
            url: &repo.descriptor.url,
            kind: repo.descriptor.kind.to_string(),
            github: &repo.descriptor.github,
            description: &repo.descriptor.description,
            package_count: repo.packages.packages.len(),
            artifact_count: repo.artifact_count(),
        }
    }
}

/// `index.tmpl`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexPage<'a> {
    pub repositories: Vec<RepositorySummary<'a>>,
    pub packages: &'a RepositoryPackages,
    pub additional_data: &'a BTreeMap<String, DisplayMeta>,
    pub config: &'a serde_yaml_ng::Value,
}

/// `repository.tmpl`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryPage<'a> {
    pub repository_name: &'a str,
    pub packages: &'a [Package],
    pub additional_data: &'a BTreeMap<String, DisplayMeta>,
    pub config: &'a serde_yaml_ng::Value,
}

/// `packages.tmpl`, for both repository-scoped and `find` pages
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackagesPage<'a> {
    pub package_category: &'a str,
    pub package_name: &'a str,
    pub packages: &'a RepositoryPackages,
    pub config: &'a serde_yaml_ng::Value,
}

/// `package.tmpl`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackagePage<'a> {
    pub repository_name: &'a str,
    pub package: &'a Package,
    pub files: &'a [String],
    pub config: &'a serde_yaml_ng::Value,
}
