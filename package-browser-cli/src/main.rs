//! package-browser - static site generator for package repositories
//!
//! Syncs every repository listed in the configuration, then renders the
//! per-repository, cross-repository and landing pages plus one badge per
//! repository into the output directory.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use package_browser_core::badge::SvgBadge;
use package_browser_core::sync::IndexSyncer;
use package_browser_core::{build_site, BuildOptions};

/// Log levels
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "package-browser",
    about = "Render a static browsing site for one or more package repositories",
    version
)]
struct Cli {
    /// Configuration file listing the repositories
    #[clap(short = 'c', long, env = "CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Directory the site is written to
    #[clap(short = 'o', long, env = "OUTPUT", default_value = "build")]
    output: PathBuf,

    /// Directory holding index.tmpl, repository.tmpl, packages.tmpl and package.tmpl
    #[clap(
        short = 't',
        long,
        env = "TEMPLATES_DIR",
        default_value = "/usr/share/package-browser"
    )]
    templates: PathBuf,

    /// Log level
    #[clap(long, env = "LOG_LEVEL", value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn initialize_tracing(log_level: &LogLevel) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    // RUST_LOG directives refine the base level
    if let Ok(extra) = std::env::var("RUST_LOG") {
        for directive in extra.split(',').filter(|d| !d.trim().is_empty()) {
            if let Ok(parsed) = directive.trim().parse() {
                filter = filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_level);

    let options = BuildOptions {
        config_path: cli.config,
        output_dir: cli.output,
        templates_dir: cli.templates,
    };

    let syncer = IndexSyncer::new().context("Failed to create repository client")?;
    let report = build_site(&options, &syncer, &SvgBadge).context("Failed to build site")?;

    for (repository, reason) in &report.failed {
        warn!("Repository {} was not published: {}", repository, reason);
    }
    info!(
        synced = report.synced.len(),
        failed = report.failed.len(),
        pages = report.render.pages_written,
        degraded = report.render.pages_degraded,
        skipped = report.render.pages_skipped,
        badges = report.badges_written,
        "Site written to {}",
        options.output_dir.display()
    );

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 4] = ["CONFIG", "OUTPUT", "TEMPLATES_DIR", "LOG_LEVEL"];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial(cli_env)]
    fn test_defaults() {
        clear_env();
        let cli = Cli::try_parse_from(["package-browser"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.output, PathBuf::from("build"));
        assert_eq!(cli.templates, PathBuf::from("/usr/share/package-browser"));
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    #[serial(cli_env)]
    fn test_short_flags() {
        clear_env();
        let cli = Cli::try_parse_from([
            "package-browser",
            "-c",
            "repos.yaml",
            "-o",
            "public",
            "-t",
            "theme",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("repos.yaml"));
        assert_eq!(cli.output, PathBuf::from("public"));
        assert_eq!(cli.templates, PathBuf::from("theme"));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    #[serial(cli_env)]
    fn test_environment_overrides_defaults() {
        clear_env();
        std::env::set_var("CONFIG", "/etc/browser.yaml");
        std::env::set_var("TEMPLATES_DIR", "/srv/templates");
        let cli = Cli::try_parse_from(["package-browser"]).unwrap();
        clear_env();

        assert_eq!(cli.config, PathBuf::from("/etc/browser.yaml"));
        assert_eq!(cli.templates, PathBuf::from("/srv/templates"));
        assert_eq!(cli.output, PathBuf::from("build"));
    }

    #[test]
    #[serial(cli_env)]
    fn test_flag_wins_over_environment() {
        clear_env();
        std::env::set_var("OUTPUT", "from-env");
        let cli = Cli::try_parse_from(["package-browser", "--output", "from-flag"]).unwrap();
        clear_env();

        assert_eq!(cli.output, PathBuf::from("from-flag"));
    }

    #[test]
    fn test_subcommands_are_rejected() {
        assert!(Cli::try_parse_from(["package-browser", "serve"]).is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["package-browser", "--log-level", "loud"]).is_err());
    }
}
