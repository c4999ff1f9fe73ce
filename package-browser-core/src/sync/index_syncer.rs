//! Default syncer: reads a `repository.yaml` index
//!
//! `http` repositories are downloaded with a blocking client, `disk`
//! repositories are copied from the local filesystem. Either way the index
//! lands in the workspace first and is parsed from there.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Syncer;
use crate::config::{RepositoryDescriptor, RepositoryKind};
use crate::error::SyncError;
use crate::model::PackageSet;

/// Index document every repository publishes at its root
pub const INDEX_FILE: &str = "repository.yaml";

/// Syncs repositories that publish a `repository.yaml` index
pub struct IndexSyncer {
    client: reqwest::blocking::Client,
}

impl IndexSyncer {
    /// Create a syncer with default HTTP settings
    pub fn new() -> Result<Self, SyncError> {
        Self::with_user_agent(concat!("package-browser/", env!("CARGO_PKG_VERSION")))
    }

    /// Create a syncer that identifies itself as `user_agent`
    pub fn with_user_agent(user_agent: &str) -> Result<Self, SyncError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(SyncError::Client)?;

        Ok(Self { client })
    }

    fn index_url(base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), INDEX_FILE)
    }

    fn fetch_http(&self, base: &str, target: &Path) -> Result<(), SyncError> {
        let url = Self::index_url(base);
        tracing::debug!("Downloading {}", url);

        let response = self.client.get(&url).send().map_err(|source| SyncError::Http {
            url: url.clone(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(SyncError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|source| SyncError::Http {
            url: url.clone(),
            source,
        })?;

        std::fs::write(target, &bytes).map_err(|source| SyncError::Io {
            path: target.to_path_buf(),
            source,
        })
    }

    fn fetch_disk(base: &str, target: &Path) -> Result<(), SyncError> {
        let source_path = PathBuf::from(base).join(INDEX_FILE);
        tracing::debug!("Copying {}", source_path.display());

        std::fs::copy(&source_path, target)
            .map(|_| ())
            .map_err(|source| SyncError::Io {
                path: source_path,
                source,
            })
    }
}

impl Syncer for IndexSyncer {
    fn sync(
        &self,
        descriptor: &RepositoryDescriptor,
        workspace: &Path,
    ) -> Result<PackageSet, SyncError> {
        let target = workspace.join(INDEX_FILE);

        match &descriptor.kind {
            RepositoryKind::Http => self.fetch_http(&descriptor.url, &target)?,
            RepositoryKind::Disk => Self::fetch_disk(&descriptor.url, &target)?,
            RepositoryKind::Unsupported(kind) => {
                return Err(SyncError::UnsupportedKind(kind.clone()))
            }
        }

        let content = std::fs::read_to_string(&target).map_err(|source| SyncError::Io {
            path: target.clone(),
            source,
        })?;

        PackageSet::from_yaml(&content).map_err(|source| SyncError::Parse {
            path: target,
            source,
        })
    }
}
