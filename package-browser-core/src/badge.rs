//! Repository badges
//!
//! One flat SVG badge per repository, `label | value`, written to
//! `<output>/badge/<repository>`.

use badge_maker::BadgeBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::model::Repository;
use crate::paths::{write_file, BADGE_DIR};

/// Colour of every repository badge
pub const BADGE_COLOR: &str = "#3C1";

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("color pattern is valid")
});

#[derive(Error, Debug)]
pub enum BadgeError {
    #[error("Invalid badge color '{0}'")]
    InvalidColor(String),

    #[error("Badge label must not be empty")]
    EmptyLabel,

    #[error("Failed to encode badge: {0}")]
    Encode(String),
}

/// Encodes a badge image
pub trait BadgeRenderer {
    fn render(&self, label: &str, value: &str, color: &str) -> Result<Vec<u8>, BadgeError>;
}

/// Shields-style flat SVG badge
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgBadge;

impl BadgeRenderer for SvgBadge {
    fn render(&self, label: &str, value: &str, color: &str) -> Result<Vec<u8>, BadgeError> {
        if label.is_empty() {
            return Err(BadgeError::EmptyLabel);
        }
        if !HEX_COLOR.is_match(color) {
            return Err(BadgeError::InvalidColor(color.to_string()));
        }

        let badge = BadgeBuilder::new()
            .label(label)
            .message(value)
            .color_parse(&expand_hex(color))
            .build()
            .map_err(|err| BadgeError::Encode(err.to_string()))?;

        Ok(badge.svg().into_bytes())
    }
}

/// `#3C1` → `#33CC11`; six-digit colours pass through
fn expand_hex(color: &str) -> String {
    let digits = &color[1..];
    if digits.len() != 3 {
        return color.to_string();
    }
    digits.chars().fold(String::from("#"), |mut acc, c| {
        acc.push(c);
        acc.push(c);
        acc
    })
}

/// Write one badge per repository, showing its artifact count
///
/// Any encoding failure aborts the run.
pub fn emit_badges(
    repositories: &[Repository],
    output_dir: &Path,
    renderer: &dyn BadgeRenderer,
) -> Result<usize> {
    for repo in repositories {
        let value = repo.artifact_count().to_string();
        let bytes = renderer
            .render(repo.name(), &value, BADGE_COLOR)
            .map_err(|source| Error::Badge {
                repository: repo.name().to_string(),
                source,
            })?;

        write_file(&output_dir.join(BADGE_DIR).join(repo.name()), &bytes)?;
        tracing::debug!("Wrote badge for '{}' ({})", repo.name(), value);
    }

    Ok(repositories.len())
}
