//! Page templates and their execution
//!
//! Template source is read from disk on every render so edits are picked up
//! without restarting. A template that cannot be read is fatal; a template
//! that fails to execute yields whatever output was produced before the
//! failure, together with the engine error.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::helpers;
use crate::error::{Error, Result};

/// The four page templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Global landing page
    Index,
    /// One repository's package listing
    Repository,
    /// All versions of a category/name pair, grouped by repository
    Packages,
    /// A single package version
    Package,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Index,
        TemplateKind::Repository,
        TemplateKind::Packages,
        TemplateKind::Package,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Index => "index.tmpl",
            TemplateKind::Repository => "repository.tmpl",
            TemplateKind::Packages => "packages.tmpl",
            TemplateKind::Package => "package.tmpl",
        }
    }
}

/// Output of one template execution
#[derive(Debug)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    /// Set when the engine failed; `bytes` then holds partial output
    pub error: Option<minijinja::Error>,
}

/// Templates directory
#[derive(Debug, Clone)]
pub struct TemplateSet {
    dir: PathBuf,
}

impl TemplateSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one template file
    pub fn path(&self, kind: TemplateKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Read the current source of a template
    pub fn source(&self, kind: TemplateKind) -> Result<String> {
        let path = self.path(kind);
        std::fs::read_to_string(&path).map_err(|source| Error::TemplateRead { path, source })
    }

    /// Check that every template is readable
    pub fn verify(&self) -> Result<()> {
        for kind in TemplateKind::ALL {
            self.source(kind)?;
        }
        Ok(())
    }

    /// Render `kind` against `context`
    pub fn render<S: Serialize>(&self, kind: TemplateKind, context: &S) -> Result<Rendered> {
        let source = self.source(kind)?;

        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        helpers::register(&mut env);

        let mut bytes = Vec::new();
        let error = execute(&mut env, kind.file_name(), &source, context, &mut bytes).err();

        Ok(Rendered { bytes, error })
    }
}

fn execute<'source, S: Serialize>(
    env: &mut Environment<'source>,
    name: &'source str,
    source: &'source str,
    context: &S,
    out: &mut Vec<u8>,
) -> std::result::Result<(), minijinja::Error> {
    env.add_template(name, source)?;
    let template = env.get_template(name)?;
    template.render_captured_to(context, out)?;
    Ok(())
}
