//! Package indices built from the synced repositories
//!
//! Every rendering step reads from one [`PackageIndex`]. Leaf lists are
//! filled from name-sorted input, so each list a template sees is ordered
//! by package name; all maps are `BTreeMap` so iteration order is stable.

use std::collections::BTreeMap;

use crate::model::{Package, Repository};

/// category → name → versions, for one repository
pub type CategoryIndex = BTreeMap<String, BTreeMap<String, Vec<Package>>>;

/// repository name → packages
pub type RepositoryPackages = BTreeMap<String, Vec<Package>>;

/// category → name → repository → versions, across all repositories
pub type GlobalCategoryIndex = BTreeMap<String, BTreeMap<String, RepositoryPackages>>;

/// Group `items` by `key`, keeping input order inside each group
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Build the category → name → versions index for one package list
pub fn category_index(packages: &[Package]) -> CategoryIndex {
    group_by(packages.iter().cloned(), |p| p.category.clone())
        .into_iter()
        .map(|(category, members)| (category, group_by(members, |p| p.name.clone())))
        .collect()
}

/// All indices derived from one set of repositories
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    /// Per-repository category index
    pub by_repository: BTreeMap<String, CategoryIndex>,

    /// Cross-repository category index
    pub global: GlobalCategoryIndex,

    /// Every repository's full name-sorted package list, empty ones included
    pub landing: RepositoryPackages,
}

impl PackageIndex {
    /// Build all indices in a single pass per repository
    pub fn build(repositories: &[Repository]) -> Self {
        let mut index = Self::default();

        for repo in repositories {
            let packages = repo.sorted_packages();

            for package in &packages {
                index
                    .global
                    .entry(package.category.clone())
                    .or_default()
                    .entry(package.name.clone())
                    .or_default()
                    .entry(repo.name().to_string())
                    .or_default()
                    .push(package.clone());
            }

            index
                .by_repository
                .insert(repo.name().to_string(), category_index(&packages));
            index.landing.insert(repo.name().to_string(), packages);
        }

        tracing::debug!(
            "Indexed {} repositories, {} global categories",
            index.landing.len(),
            index.global.len()
        );

        index
    }

    /// Category index of one repository
    pub fn categories(&self, repository: &str) -> Option<&CategoryIndex> {
        self.by_repository.get(repository)
    }

    /// Full package list of one repository
    pub fn packages(&self, repository: &str) -> &[Package] {
        self.landing
            .get(repository)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every repository's versions of `category/name`
    pub fn find(&self, category: &str, name: &str) -> Option<&RepositoryPackages> {
        self.global.get(category).and_then(|names| names.get(name))
    }

    /// Versions of `category/name` in one repository, wrapped as a
    /// single-entry repository map
    pub fn scoped(&self, repository: &str, category: &str, name: &str) -> RepositoryPackages {
        self.categories(repository)
            .and_then(|cats| cats.get(category))
            .and_then(|names| names.get(name))
            .map(|versions| BTreeMap::from([(repository.to_string(), versions.clone())]))
            .unwrap_or_default()
    }

    /// Distinct (category, name) pairs across all repositories
    pub fn global_pair_count(&self) -> usize {
        self.global.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod index_tests {
    use super::*;
    use crate::config::{RepositoryDescriptor, RepositoryKind};
    use crate::model::PackageSet;
    use pretty_assertions::assert_eq;

    fn repo(name: &str, packages: Vec<Package>) -> Repository {
        Repository {
            descriptor: RepositoryDescriptor {
                name: name.to_string(),
                url: String::new(),
                kind: RepositoryKind::Http,
                github: String::new(),
                description: String::new(),
            },
            packages: PackageSet {
                packages,
                artifacts: vec![],
            },
        }
    }

    fn versions(list: &[Package]) -> Vec<&str> {
        list.iter().map(|p| p.version.as_str()).collect()
    }

    fn sample() -> Vec<Repository> {
        vec![
            repo(
                "edge",
                vec![
                    Package::new("app", "tools", "3.0"),
                    Package::new("lib", "zlib", "1.3"),
                ],
            ),
            repo(
                "stable",
                vec![
                    Package::new("app", "tools", "1.0"),
                    Package::new("app", "editor", "9.0"),
                    Package::new("app", "tools", "2.0"),
                ],
            ),
        ]
    }

    #[test]
    fn test_group_by_keeps_order() {
        let groups = group_by(vec![3, 1, 4, 1, 5, 9, 2, 6], |n| n % 2);
        assert_eq!(groups[&0], vec![4, 2, 6]);
        assert_eq!(groups[&1], vec![3, 1, 1, 5, 9]);
    }

    #[test]
    fn test_per_repository_index() {
        let index = PackageIndex::build(&sample());

        let stable = index.categories("stable").unwrap();
        assert_eq!(stable.len(), 1);
        assert_eq!(versions(&stable["app"]["tools"]), vec!["1.0", "2.0"]);
        assert_eq!(versions(&stable["app"]["editor"]), vec!["9.0"]);

        let edge = index.categories("edge").unwrap();
        assert_eq!(edge.keys().collect::<Vec<_>>(), vec!["app", "lib"]);
    }

    #[test]
    fn test_global_index_merges_repositories() {
        let index = PackageIndex::build(&sample());

        let tools = index.find("app", "tools").unwrap();
        assert_eq!(tools.keys().collect::<Vec<_>>(), vec!["edge", "stable"]);
        assert_eq!(versions(&tools["stable"]), vec!["1.0", "2.0"]);
        assert_eq!(versions(&tools["edge"]), vec!["3.0"]);

        // Only repositories carrying the pair are listed
        let zlib = index.find("lib", "zlib").unwrap();
        assert_eq!(zlib.keys().collect::<Vec<_>>(), vec!["edge"]);

        assert!(index.find("app", "missing").is_none());
        assert_eq!(index.global_pair_count(), 3);
    }

    #[test]
    fn test_landing_lists_sorted_by_name() {
        let index = PackageIndex::build(&sample());

        let names: Vec<_> = index
            .packages("stable")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["editor", "tools", "tools"]);
        assert_eq!(versions(index.packages("stable")), vec!["9.0", "1.0", "2.0"]);
    }

    #[test]
    fn test_empty_repository_still_listed() {
        let mut repos = sample();
        repos.push(repo("empty", vec![]));
        let index = PackageIndex::build(&repos);

        assert_eq!(index.landing.get("empty"), Some(&vec![]));
        assert!(index.categories("empty").unwrap().is_empty());
        assert!(index.global.values().all(|names| names
            .values()
            .all(|by_repo| !by_repo.contains_key("empty"))));
    }

    #[test]
    fn test_scoped_is_singleton() {
        let index = PackageIndex::build(&sample());

        let scoped = index.scoped("stable", "app", "tools");
        assert_eq!(scoped.len(), 1);
        assert_eq!(versions(&scoped["stable"]), vec!["1.0", "2.0"]);

        assert!(index.scoped("edge", "app", "editor").is_empty());
    }
}
