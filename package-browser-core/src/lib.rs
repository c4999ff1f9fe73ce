//! Package browser library exports
//!
//! Aggregates the package indices of several repositories and renders them
//! as a static site.
//!
//! ```text
//! config.yaml ──► sync ──► index ──┬──► render ──► <output>/**/index.html
//!                                  └──► badge  ──► <output>/badge/<repo>
//! ```

pub mod badge;
pub mod config;
pub mod error;
pub mod index;
pub mod manifest;
pub mod model;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod sync;

pub use error::{Error, Result, SyncError};
pub use pipeline::{build_from_config, build_site, BuildOptions, BuildReport};
