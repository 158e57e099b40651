//! CNAB bundle descriptor.
//!
//! Only the parts of `bundle.json` that extension handling needs are modelled:
//! identity, the list of required extensions, and the untyped `custom` section
//! where extension payloads live. Every other top-level field is ignored on
//! read, so full bundles parse without loss of the data this crate cares about.
//!
//! ```json
//! {
//!   "schemaVersion": "v1.0.0",
//!   "name": "myapp",
//!   "version": "0.1.0",
//!   "requiredExtensions": ["io.cnab.dependencies"],
//!   "custom": {
//!     "io.cnab.dependencies": { "requires": { "db": { "bundle": "example.com/db:1.0" } } }
//!   }
//! }
//! ```

use crate::core::{DepsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// A parsed bundle descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// CNAB schema version the document claims to follow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,

    /// Bundle name.
    #[serde(default)]
    pub name: String,

    /// Bundle version, expected to be a semantic version.
    #[serde(default)]
    pub version: String,

    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Extension keys a runtime must understand to handle this bundle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_extensions: Vec<String>,

    /// Untyped extension payloads keyed by extension key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl Bundle {
    /// Parse a bundle from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DepsError::BundleParseError`] if the document is not valid
    /// bundle JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, "<inline>")
    }

    /// Read and parse a bundle file.
    ///
    /// # Errors
    ///
    /// - [`DepsError::BundleNotFound`] if `path` does not exist
    /// - [`DepsError::IoError`] if the file cannot be read
    /// - [`DepsError::BundleParseError`] if the content is not bundle JSON
    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading bundle from {}", path.display());

        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DepsError::BundleNotFound {
                    path: path.display().to_string(),
                }
            } else {
                DepsError::from(e)
            }
        })?;

        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, file: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| DepsError::BundleParseError {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse [`Bundle::version`] as a semantic version.
    ///
    /// # Errors
    ///
    /// Returns [`DepsError::SemverError`] if the version is not valid semver.
    pub fn parsed_version(&self) -> Result<semver::Version> {
        let trimmed = self.version.strip_prefix('v').unwrap_or(&self.version);
        semver::Version::parse(trimmed).map_err(|e| DepsError::SemverError {
            version: self.version.clone(),
            reason: e.to_string(),
        })
    }

    /// Whether `key` is listed in `requiredExtensions`.
    pub fn is_required_extension(&self, key: &str) -> bool {
        self.required_extensions.iter().any(|k| k == key)
    }
}
