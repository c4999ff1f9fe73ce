//! Repository synchronization
//!
//! Fetching a repository is delegated to a [`Syncer`]. The [`Synchronizer`]
//! drives it over every configured repository, one at a time, inside a
//! run-scoped temporary directory that is removed when it is dropped.

mod index_syncer;

pub use index_syncer::{IndexSyncer, INDEX_FILE};

use std::path::Path;
use tempfile::TempDir;

use crate::config::RepositoryDescriptor;
use crate::error::{Error, Result, SyncError};
use crate::model::{PackageSet, Repository};

/// Fetches the package set of one repository
pub trait Syncer {
    /// Sync `descriptor`, using `workspace` as private scratch space
    fn sync(
        &self,
        descriptor: &RepositoryDescriptor,
        workspace: &Path,
    ) -> std::result::Result<PackageSet, SyncError>;
}

/// A repository that could not be synchronized
#[derive(Debug)]
pub struct SyncFailure {
    pub repository: String,
    pub error: SyncError,
}

/// Result of syncing every configured repository
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Synced repositories, sorted by name
    pub repositories: Vec<Repository>,
    /// Failures in configuration order
    pub failures: Vec<SyncFailure>,
}

/// Owns the temporary workspace for a run
pub struct Synchronizer {
    workspace: TempDir,
}

impl Synchronizer {
    /// Create a synchronizer with a fresh temporary directory
    pub fn new() -> Result<Self> {
        let workspace = tempfile::Builder::new()
            .prefix("package-browser-")
            .tempdir()
            .map_err(Error::Workspace)?;
        Ok(Self { workspace })
    }

    /// Root of the run's temporary workspace
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }

    /// Sync every descriptor in order, keeping only successes
    pub fn sync_all(
        &self,
        descriptors: &[RepositoryDescriptor],
        syncer: &dyn Syncer,
    ) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();

        for descriptor in descriptors {
            tracing::info!("Syncing repository '{}' from {}", descriptor.name, descriptor.url);

            match self.sync_one(descriptor, syncer) {
                Ok(packages) => {
                    tracing::info!(
                        "Synced repository '{}': {} packages, {} artifacts",
                        descriptor.name,
                        packages.packages.len(),
                        packages.artifacts.len()
                    );
                    outcome.repositories.push(Repository {
                        descriptor: descriptor.clone(),
                        packages,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        "Failed syncing repository '{}': {}",
                        descriptor.name,
                        error_chain(&error)
                    );
                    outcome.failures.push(SyncFailure {
                        repository: descriptor.name.clone(),
                        error,
                    });
                }
            }
        }

        outcome
            .repositories
            .sort_by(|a, b| a.name().cmp(b.name()));
        outcome
    }

    fn sync_one(
        &self,
        descriptor: &RepositoryDescriptor,
        syncer: &dyn Syncer,
    ) -> std::result::Result<PackageSet, SyncError> {
        // Each repository gets its own directory, gone once the sync returns
        let scratch = tempfile::Builder::new()
            .prefix(&format!("{}-", descriptor.name))
            .tempdir_in(self.workspace.path())
            .map_err(|source| SyncError::Io {
                path: self.workspace.path().to_path_buf(),
                source,
            })?;

        syncer.sync(descriptor, scratch.path())?.normalize()
    }
}

/// Render an error with its sources, `outer: inner: root`
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Convenience wrapper: sync in a throwaway workspace
pub fn sync_repositories(
    descriptors: &[RepositoryDescriptor],
    syncer: &dyn Syncer,
) -> Result<SyncOutcome> {
    let synchronizer = Synchronizer::new()?;
    Ok(synchronizer.sync_all(descriptors, syncer))
}
