//! `extensions` subcommand.

use super::{bundle_label, load_bundle};
use crate::core::DepsError;
use crate::extensions::ExtensionRegistry;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Check a bundle's `requiredExtensions` against the built-in registry.
///
/// Fails when the bundle requires an extension this tool cannot read.
#[derive(Args)]
pub struct ExtensionsCommand {
    /// Path to the bundle.json file
    bundle: PathBuf,
}

impl ExtensionsCommand {
    pub async fn execute(self) -> Result<()> {
        let bundle = load_bundle(&self.bundle).await?;
        let label = bundle_label(&bundle, &self.bundle);
        let registry = ExtensionRegistry::with_builtin();

        if bundle.required_extensions.is_empty() {
            println!("{label} requires no extensions");
            return Ok(());
        }

        println!("Required extensions for {}:", label.bold());
        for key in &bundle.required_extensions {
            match registry.get(key) {
                Some(ext) => println!("  {} {key} ({})", "✓".green(), ext.shorthand),
                None => println!("  {} {key} (unsupported)", "✗".red()),
            }
        }

        unsupported_error(registry.unsupported_required_extensions(&bundle))
            .map_or(Ok(()), |e| Err(e.into()))
    }
}

fn unsupported_error(unsupported: Vec<&str>) -> Option<DepsError> {
    match unsupported.as_slice() {
        [] => None,
        [key] => Some(DepsError::UnsupportedExtension {
            key: (*key).to_string(),
        }),
        keys => Some(DepsError::UnsupportedExtensions {
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
        }),
    }
}
