//! Output path helpers
//!
//! Category, name and version strings come from remote repository data and
//! are joined into output paths, so each must be a single plain component.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

static SAFE_COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+~-]*$").expect("component pattern is valid")
});

/// Leaf file name written for every page
pub const PAGE_FILE: &str = "index.html";

/// Directory holding the cross-repository pages
pub const FIND_DIR: &str = "find";

/// Directory holding repository badges
pub const BADGE_DIR: &str = "badge";

/// Entries of the output root owned by the site itself
pub const RESERVED_ROOT_ENTRIES: [&str; 3] = [PAGE_FILE, FIND_DIR, BADGE_DIR];

/// Check that a value can be used as one output path component
pub fn is_safe_component(value: &str) -> bool {
    SAFE_COMPONENT.is_match(value)
}

/// Check whether a repository directory would shadow a site-owned root entry
pub fn is_reserved_root_entry(value: &str) -> bool {
    RESERVED_ROOT_ENTRIES.contains(&value)
}

/// Join `components` under `root`, or `None` if any component is unsafe
///
/// A component equal to [`PAGE_FILE`] is refused as well: the directory
/// would collide with the page written one level up.
pub fn join_safe(root: &Path, components: &[&str]) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in components {
        if !is_safe_component(component) || *component == PAGE_FILE {
            return None;
        }
        path.push(component);
    }
    Some(path)
}

/// Write `bytes` to `path`, creating parent directories as needed
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
