//! `show` subcommand.

use super::load_bundle;
use crate::extensions::dependencies::read_dependencies;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Print the parsed dependencies extension as pretty JSON.
#[derive(Args)]
pub struct ShowCommand {
    /// Path to the bundle.json file
    bundle: PathBuf,
}

impl ShowCommand {
    pub async fn execute(self) -> Result<()> {
        let bundle = load_bundle(&self.bundle).await?;
        let deps = read_dependencies(&bundle)?;

        let rendered =
            serde_json::to_string_pretty(&deps).context("Failed to render dependencies as JSON")?;
        println!("{rendered}");
        Ok(())
    }
}
