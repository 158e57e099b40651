//! Command-line interface for cnab-deps.
//!
//! Every subcommand takes the path of a CNAB `bundle.json` and inspects its
//! dependencies extension:
//!
//! - `check` - Report whether the bundle declares dependencies
//! - `list` - Print dependencies in installation order
//! - `show` - Print the parsed dependencies extension as JSON
//! - `extensions` - Check the bundle's required extensions against the registry
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug logging
//! - `--quiet` - Only log errors
//! - `--config` - Path to a custom global config file
//!
//! # Example
//!
//! ```bash
//! cnab-deps check bundle.json
//! cnab-deps list bundle.json --installation prod-app
//! cnab-deps --verbose show bundle.json
//! ```

mod check;
mod extensions;
mod list;
mod show;

use crate::bundle::Bundle;
use crate::config::GlobalConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Tracing filter forced by `--verbose` or `--quiet`.
    ///
    /// When `None`, `RUST_LOG` is used if set, then the config file's
    /// `log_level`, then `warn`.
    pub log_level: Option<String>,

    /// Custom path to the global configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the tracing filter for this run.
    #[must_use]
    pub fn env_filter(&self, global: &GlobalConfig) -> EnvFilter {
        if let Some(level) = &self.log_level {
            return EnvFilter::new(level);
        }
        if std::env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }
        EnvFilter::new(global.log_level.as_deref().unwrap_or("warn"))
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self, global: &GlobalConfig) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter(global))
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Inspect the dependencies declared by CNAB bundles.
#[derive(Parser)]
#[command(
    name = "cnab-deps",
    about = "Inspect and order the dependencies declared by CNAB bundles",
    version,
    long_about = "cnab-deps reads the io.cnab.dependencies extension of a bundle.json and \
                  prints the bundles it requires in installation order."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a custom global configuration file
    #[arg(short, long, global = true, env = "CNAB_DEPS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a bundle declares dependencies.
    Check(check::CheckCommand),

    /// List a bundle's dependencies in installation order.
    List(list::ListCommand),

    /// Print the parsed dependencies extension as JSON.
    Show(show::ShowCommand),

    /// Check a bundle's required extensions against the supported set.
    Extensions(extensions::ExtensionsCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the subcommand
    /// fails.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the subcommand
    /// fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let global = GlobalConfig::load_with_optional(config.config_path.clone()).await;
        // Log with defaults if the config file is broken, then report it.
        config.init_logging(global.as_ref().unwrap_or(&GlobalConfig::default()));
        let global = global?;

        match self.command {
            Commands::Check(cmd) => cmd.execute().await,
            Commands::List(cmd) => cmd.execute(&global).await,
            Commands::Show(cmd) => cmd.execute().await,
            Commands::Extensions(cmd) => cmd.execute().await,
        }
    }
}

/// Load a bundle for a subcommand, attaching the path to any error.
pub(crate) async fn load_bundle(path: &Path) -> Result<Bundle> {
    Bundle::load(path).await.with_context(|| format!("Failed to load bundle {}", path.display()))
}

/// Display name for a bundle: its `name`, or the file path when unnamed,
/// followed by the semantic version when the bundle has a valid one.
pub(crate) fn bundle_label(bundle: &Bundle, path: &Path) -> String {
    let name = if bundle.name.is_empty() {
        path.display().to_string()
    } else {
        bundle.name.clone()
    };

    match bundle.parsed_version() {
        Ok(version) => format!("{name} v{version}"),
        Err(e) => {
            debug!("Not showing version of {name}: {e}");
            name
        }
    }
}
