//! Resolve a package's installed files from the artifact index

use std::collections::HashMap;

use crate::model::{Package, Repository};

/// Fingerprint lookup over one repository's artifacts
pub struct ManifestResolver<'a> {
    files: HashMap<&'a str, &'a [String]>,
}

impl<'a> ManifestResolver<'a> {
    pub fn new(repository: &'a Repository) -> Self {
        let files = repository
            .packages
            .artifacts
            .iter()
            .map(|a| (a.fingerprint.as_str(), a.files.as_slice()))
            .collect();
        Self { files }
    }

    /// Files of the artifact matching `package`, empty if there is none
    ///
    /// Virtual and meta packages legitimately have no artifact.
    pub fn files_for(&self, package: &Package) -> &'a [String] {
        self.files
            .get(package.fingerprint.as_str())
            .copied()
            .unwrap_or(&[])
    }
}
