//! Static site rendering
//!
//! Walks a [`PackageIndex`] and writes one `index.html` per logical page:
//!
//! ```text
//! <output>/index.html                                   ← index.tmpl
//! <output>/<repo>/index.html                            ← repository.tmpl
//! <output>/<repo>/<category>/<name>/index.html          ← packages.tmpl
//! <output>/<repo>/<category>/<name>/<version>/index.html ← package.tmpl
//! <output>/find/<category>/<name>/index.html            ← packages.tmpl
//! ```

mod context;
mod helpers;
mod templates;

pub use context::{IndexPage, PackagePage, PackagesPage, RepositoryPage, RepositorySummary};
pub use templates::{Rendered, TemplateKind, TemplateSet};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{DisplayMeta, SiteConfig};
use crate::error::Result;
use crate::index::PackageIndex;
use crate::manifest::ManifestResolver;
use crate::model::Repository;
use crate::paths::{join_safe, write_file, FIND_DIR, PAGE_FILE};

/// Page counts for one render
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Pages written to disk, degraded ones included
    pub pages_written: usize,
    /// Pages whose template failed; their output is partial
    pub pages_degraded: usize,
    /// Pages not written because a path component was unsafe
    pub pages_skipped: usize,
}

/// Renders the whole site into an output directory
pub struct SiteRenderer<'a> {
    writer: PageWriter,
    config: &'a SiteConfig,
    additional_data: BTreeMap<String, DisplayMeta>,
}

impl<'a> SiteRenderer<'a> {
    pub fn new(
        templates: TemplateSet,
        output_dir: impl Into<PathBuf>,
        config: &'a SiteConfig,
    ) -> Self {
        Self {
            writer: PageWriter {
                templates,
                output_dir: output_dir.into(),
                report: RenderReport::default(),
            },
            additional_data: config.additional_data(),
            config,
        }
    }

    /// Render every page for `repositories`
    pub fn render(
        mut self,
        repositories: &[Repository],
        index: &PackageIndex,
    ) -> Result<RenderReport> {
        self.writer.templates.verify()?;

        for repo in repositories {
            self.render_repository(repo, index)?;
        }
        self.render_find_pages(index)?;
        self.render_index(repositories, index)?;

        let report = self.writer.report;
        tracing::info!(
            "Rendered {} pages ({} degraded, {} skipped)",
            report.pages_written,
            report.pages_degraded,
            report.pages_skipped
        );
        Ok(report)
    }

    fn render_repository(&mut self, repo: &Repository, index: &PackageIndex) -> Result<()> {
        let name = repo.name();
        let config = &self.config.raw;
        let repo_dir = self.writer.output_dir.join(name);
        tracing::debug!("Rendering repository '{}'", name);

        let page = RepositoryPage {
            repository_name: name,
            packages: index.packages(name),
            additional_data: &self.additional_data,
            config,
        };
        self.writer
            .write(TemplateKind::Repository, &page, Some(repo_dir.clone()))?;

        if let Some(categories) = index.categories(name) {
            for (category, names) in categories {
                for package_name in names.keys() {
                    let packages = index.scoped(name, category, package_name);
                    let page = PackagesPage {
                        package_category: category,
                        package_name,
                        packages: &packages,
                        config,
                    };
                    let dir = join_safe(&repo_dir, &[category.as_str(), package_name.as_str()]);
                    self.writer.write(TemplateKind::Packages, &page, dir)?;
                }
            }
        }

        let resolver = ManifestResolver::new(repo);
        for package in index.packages(name) {
            let page = PackagePage {
                repository_name: name,
                package,
                files: resolver.files_for(package),
                config,
            };
            let dir = join_safe(
                &repo_dir,
                &[
                    package.category.as_str(),
                    package.name.as_str(),
                    package.version.as_str(),
                ],
            );
            self.writer.write(TemplateKind::Package, &page, dir)?;
        }

        Ok(())
    }

    fn render_find_pages(&mut self, index: &PackageIndex) -> Result<()> {
        let config = &self.config.raw;
        let find_dir = self.writer.output_dir.join(FIND_DIR);

        for (category, names) in &index.global {
            for (package_name, packages) in names {
                let page = PackagesPage {
                    package_category: category,
                    package_name,
                    packages,
                    config,
                };
                let dir = join_safe(&find_dir, &[category.as_str(), package_name.as_str()]);
                self.writer.write(TemplateKind::Packages, &page, dir)?;
            }
        }

        Ok(())
    }

    fn render_index(&mut self, repositories: &[Repository], index: &PackageIndex) -> Result<()> {
        let page = IndexPage {
            repositories: repositories.iter().map(RepositorySummary::from).collect(),
            packages: &index.landing,
            additional_data: &self.additional_data,
            config: &self.config.raw,
        };
        let dir = Some(self.writer.output_dir.clone());
        self.writer.write(TemplateKind::Index, &page, dir)
    }
}

/// Executes templates and writes their output, keeping count
struct PageWriter {
    templates: TemplateSet,
    output_dir: PathBuf,
    report: RenderReport,
}

impl PageWriter {
    /// Render one template into `<dir>/index.html`; `None` skips the page
    fn write<S: Serialize>(
        &mut self,
        kind: TemplateKind,
        context: &S,
        dir: Option<PathBuf>,
    ) -> Result<()> {
        let Some(dir) = dir else {
            tracing::warn!(
                "Skipping {} page: unsafe path component in package metadata",
                kind.file_name()
            );
            self.report.pages_skipped += 1;
            return Ok(());
        };

        let rendered = self.templates.render(kind, context)?;
        let target = dir.join(PAGE_FILE);

        if let Some(error) = &rendered.error {
            tracing::error!(
                "Error during execution of {} for {}: {:#}",
                kind.file_name(),
                display_relative(&target, &self.output_dir),
                error
            );
            self.report.pages_degraded += 1;
        }

        write_file(&target, &rendered.bytes)?;
        self.report.pages_written += 1;
        Ok(())
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
