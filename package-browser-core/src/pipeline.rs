//! End-to-end site build
//!
//! config → sync → index → render + badges. Each stage's output is passed
//! explicitly to the next; nothing is kept in shared state.

use std::path::{Path, PathBuf};

use crate::badge::{emit_badges, BadgeRenderer};
use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::index::PackageIndex;
use crate::render::{RenderReport, SiteRenderer, TemplateSet};
use crate::sync::{error_chain, sync_repositories, Syncer};

/// Paths controlling one build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Configuration file listing the repositories
    pub config_path: PathBuf,
    /// Root of the generated site
    pub output_dir: PathBuf,
    /// Directory holding the page templates
    pub templates_dir: PathBuf,
}

/// Summary of a finished build
#[derive(Debug, Default, Clone)]
pub struct BuildReport {
    /// Repositories that synced, in processing order
    pub synced: Vec<String>,
    /// Repositories that failed to sync, with the reason
    pub failed: Vec<(String, String)>,
    pub render: RenderReport,
    pub badges_written: usize,
}

/// Load the configuration and build the site
pub fn build_site(
    options: &BuildOptions,
    syncer: &dyn Syncer,
    badges: &dyn BadgeRenderer,
) -> Result<BuildReport> {
    tracing::info!("Loading configuration from {}", options.config_path.display());
    let config = SiteConfig::load(&options.config_path)?;
    build_from_config(
        &config,
        &options.output_dir,
        &options.templates_dir,
        syncer,
        badges,
    )
}

/// Build the site for an already loaded configuration
pub fn build_from_config(
    config: &SiteConfig,
    output_dir: &Path,
    templates_dir: &Path,
    syncer: &dyn Syncer,
    badges: &dyn BadgeRenderer,
) -> Result<BuildReport> {
    // Fail on missing templates before spending time on sync
    let templates = TemplateSet::new(templates_dir);
    templates.verify()?;

    let outcome = sync_repositories(&config.repositories, syncer)?;
    let index = PackageIndex::build(&outcome.repositories);

    std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let render = SiteRenderer::new(templates, output_dir, config)
        .render(&outcome.repositories, &index)?;
    let badges_written = emit_badges(&outcome.repositories, output_dir, badges)?;

    Ok(BuildReport {
        synced: outcome
            .repositories
            .iter()
            .map(|r| r.name().to_string())
            .collect(),
        failed: outcome
            .failures
            .iter()
            .map(|f| (f.repository.clone(), error_chain(&f.error)))
            .collect(),
        render,
        badges_written,
    })
}
