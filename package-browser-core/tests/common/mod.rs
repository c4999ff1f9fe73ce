//! Test helpers shared by the integration tests
//!
//! Provides an in-memory syncer, JSON-dumping templates and a temporary
//! site layout (config, templates, output).

#![allow(dead_code)]

use anyhow::Result;
use package_browser_core::config::{RepositoryDescriptor, SiteConfig};
use package_browser_core::model::{Artifact, Package, PackageSet};
use package_browser_core::sync::Syncer;
use package_browser_core::SyncError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Serves package sets from memory; unknown repositories fail with 404
#[derive(Default)]
pub struct MemorySyncer {
    sets: HashMap<String, PackageSet>,
}

impl MemorySyncer {
    pub fn with(mut self, repository: &str, set: PackageSet) -> Self {
        self.sets.insert(repository.to_string(), set);
        self
    }
}

impl Syncer for MemorySyncer {
    fn sync(
        &self,
        descriptor: &RepositoryDescriptor,
        _workspace: &Path,
    ) -> Result<PackageSet, SyncError> {
        self.sets
            .get(&descriptor.name)
            .cloned()
            .ok_or_else(|| SyncError::Status {
                url: descriptor.url.clone(),
                status: 404,
            })
    }
}

/// Package with a matching single-file artifact
pub fn package_with_artifact(category: &str, name: &str, version: &str) -> (Package, Artifact) {
    let package = Package::new(category, name, version);
    let artifact = Artifact {
        fingerprint: package.fingerprint.clone(),
        files: vec![format!("usr/bin/{name}-{version}")],
    };
    (package, artifact)
}

/// `stable`: app/tools@1.0, app/tools@2.0 (both with artifacts) and
/// app/editor@9.0 without one
pub fn stable_set() -> PackageSet {
    let (tools1, a1) = package_with_artifact("app", "tools", "1.0");
    let (tools2, a2) = package_with_artifact("app", "tools", "2.0");
    PackageSet {
        packages: vec![tools1, Package::new("app", "editor", "9.0"), tools2],
        artifacts: vec![a1, a2],
    }
}

/// `edge`: app/tools@3.0 and lib/zlib@1.3
pub fn edge_set() -> PackageSet {
    let (tools3, a3) = package_with_artifact("app", "tools", "3.0");
    PackageSet {
        packages: vec![tools3, Package::new("lib", "zlib", "1.3")],
        artifacts: vec![a3],
    }
}

pub const CONFIG_YAML: &str = r#"
Title: Test Browser
Repositories:
  - name: stable
    url: https://example.com/stable
    github: https://github.com/example/stable
    description: Stable packages
  - name: broken
    url: https://example.com/broken
  - name: edge
    url: https://example.com/edge
    description: Bleeding edge
  - name: empty
    url: https://example.com/empty
"#;

pub const INDEX_TEMPLATE: &str = r#"{{ {"Repositories": Repositories, "Packages": Packages, "AdditionalData": AdditionalData, "Title": Config.Title} | tojson }}"#;
pub const REPOSITORY_TEMPLATE: &str = r#"{{ {"RepositoryName": RepositoryName, "Packages": Packages, "Title": Config.Title} | tojson }}"#;
pub const PACKAGES_TEMPLATE: &str = r#"{{ {"PackageCategory": PackageCategory, "PackageName": PackageName, "Packages": Packages} | tojson }}"#;
pub const PACKAGE_TEMPLATE: &str = r#"{{ {"RepositoryName": RepositoryName, "Package": Package, "Files": Files} | tojson }}"#;

/// A temporary site: config file, templates directory and output directory
pub struct TestSite {
    _temp_dir: TempDir,
    pub config_path: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();

        let config_path = root.join("config.yaml");
        fs::write(&config_path, CONFIG_YAML)?;

        let templates_dir = root.join("templates");
        fs::create_dir_all(&templates_dir)?;
        fs::write(templates_dir.join("index.tmpl"), INDEX_TEMPLATE)?;
        fs::write(templates_dir.join("repository.tmpl"), REPOSITORY_TEMPLATE)?;
        fs::write(templates_dir.join("packages.tmpl"), PACKAGES_TEMPLATE)?;
        fs::write(templates_dir.join("package.tmpl"), PACKAGE_TEMPLATE)?;

        Ok(Self {
            _temp_dir: temp_dir,
            config_path,
            templates_dir,
            output_dir: root.join("build"),
        })
    }

    pub fn config(&self) -> Result<SiteConfig> {
        Ok(SiteConfig::load(&self.config_path)?)
    }

    pub fn options(&self) -> package_browser_core::BuildOptions {
        package_browser_core::BuildOptions {
            config_path: self.config_path.clone(),
            output_dir: self.output_dir.clone(),
            templates_dir: self.templates_dir.clone(),
        }
    }

    /// Parse `<output>/<relative>` as JSON
    pub fn page(&self, relative: &str) -> Result<serde_json::Value> {
        let content = fs::read_to_string(self.output_dir.join(relative))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// `stable` and `edge` sync; `broken` and `empty` behave as their names say
pub fn standard_syncer() -> MemorySyncer {
    MemorySyncer::default()
        .with("stable", stable_set())
        .with("edge", edge_set())
        .with("empty", PackageSet::default())
}

/// Versions listed in a JSON package array
pub fn versions(packages: &serde_json::Value) -> Vec<String> {
    packages
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|p| p["version"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
