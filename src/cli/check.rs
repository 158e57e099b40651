//! `check` subcommand.

use super::{bundle_label, load_bundle};
use crate::extensions::dependencies::{DEPENDENCIES_KEY, has_dependencies};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Report whether a bundle declares the dependencies extension.
///
/// Succeeds either way; only an unreadable bundle is an error.
#[derive(Args)]
pub struct CheckCommand {
    /// Path to the bundle.json file
    bundle: PathBuf,
}

impl CheckCommand {
    pub async fn execute(self) -> Result<()> {
        let bundle = load_bundle(&self.bundle).await?;
        let label = bundle_label(&bundle, &self.bundle);

        if has_dependencies(&bundle) {
            println!("{} {label} declares dependencies ({DEPENDENCIES_KEY})", "✓".green());
        } else {
            println!("{} {label} declares no dependencies", "-".dimmed());
        }
        Ok(())
    }
}
