//! `list` subcommand.
//!
//! Prints a bundle's dependencies in the order an installer should process
//! them, optionally with the installation name each prerequisite would be
//! tracked under.

use super::{bundle_label, load_bundle};
use crate::config::GlobalConfig;
use crate::extensions::dependencies::{Dependencies, Dependency, has_dependencies, read_dependencies};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// List dependencies in installation order.
#[derive(Args)]
pub struct ListCommand {
    /// Path to the bundle.json file
    bundle: PathBuf,

    /// Parent installation name used to derive prerequisite installation names
    #[arg(short, long)]
    installation: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// How the listed order was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    /// The bundle's declared sequence
    Sequence,
    /// Requires iteration order
    Unordered,
    /// Sorted by name because `sort_unsequenced` is set
    ByName,
}

impl OrderSource {
    fn describe(self) -> &'static str {
        match self {
            Self::Sequence => "declared sequence",
            Self::Unordered => "unordered",
            Self::ByName => "sorted by name",
        }
    }
}

/// One row of `list` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedDependency {
    pub name: String,
    pub bundle: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<String>,
    pub prereleases: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installation: Option<String>,
}

impl ListedDependency {
    fn new(dep: Dependency, installation: Option<&str>) -> Self {
        let installation = installation.map(|parent| dep.installation_name(parent));
        let (ranges, prereleases) = match dep.version {
            Some(version) => (version.ranges, version.allow_prereleases),
            None => (Vec::new(), false),
        };
        Self {
            name: dep.name,
            bundle: dep.bundle,
            ranges,
            prereleases,
            installation,
        }
    }
}

/// Order `deps` for output, applying the `sort_unsequenced` setting.
pub fn ordered_dependencies(
    deps: &Dependencies,
    config: &GlobalConfig,
    installation: Option<&str>,
) -> (OrderSource, Vec<ListedDependency>) {
    let mut listed = deps.list_by_sequence();

    let ordering = if deps.is_sequenced() {
        OrderSource::Sequence
    } else if config.sort_unsequenced {
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        OrderSource::ByName
    } else {
        OrderSource::Unordered
    };

    let rows = listed.into_iter().map(|dep| ListedDependency::new(dep, installation)).collect();
    (ordering, rows)
}

fn render_text(label: &str, ordering: OrderSource, rows: &[ListedDependency]) -> String {
    let mut out = format!("Installation order for {} ({}):\n", label.bold(), ordering.describe());

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("  {}. {} -> {}", i + 1, row.name.cyan(), row.bundle));
        if !row.ranges.is_empty() {
            out.push_str(&format!(" [{}]", row.ranges.join(", ")));
        }
        if row.prereleases {
            out.push_str(" (prereleases allowed)");
        }
        if let Some(installation) = &row.installation {
            out.push_str(&format!(" as {installation}"));
        }
        out.push('\n');
    }
    out
}

impl ListCommand {
    pub async fn execute(self, config: &GlobalConfig) -> Result<()> {
        let bundle = load_bundle(&self.bundle).await?;
        let label = bundle_label(&bundle, &self.bundle);
        let installation = self.installation.as_deref().or(config.installation.as_deref());

        if !has_dependencies(&bundle) {
            debug!("Bundle {label} has no dependencies extension");
            match self.format {
                OutputFormat::Text => println!("{label} declares no dependencies"),
                OutputFormat::Json => println!("[]"),
            }
            return Ok(());
        }

        let deps = read_dependencies(&bundle)?;
        let (ordering, rows) = ordered_dependencies(&deps, config, installation);

        match self.format {
            OutputFormat::Text => print!("{}", render_text(&label, ordering, &rows)),
            OutputFormat::Json => {
                let rendered = serde_json::to_string_pretty(&rows)
                    .context("Failed to render dependency list as JSON")?;
                println!("{rendered}");
            }
        }
        Ok(())
    }
}
