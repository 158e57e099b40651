//! The `io.cnab.dependencies` extension.
//!
//! A bundle lists the other bundles it needs installed first under
//! `custom["io.cnab.dependencies"]`:
//!
//! ```json
//! {
//!   "sequence": ["db", "cache"],
//!   "requires": {
//!     "db":    { "bundle": "example.com/db:1.0", "version": { "ranges": ["1.x"], "prereleases": false } },
//!     "cache": { "bundle": "example.com/cache:2.0" }
//!   }
//! }
//! ```
//!
//! This module reads that payload into [`Dependencies`] and orders it for
//! installation with [`Dependencies::list_by_sequence`]. Resolving bundle
//! references, matching version ranges, and running installs belong to the
//! caller.
//!
//! See <https://github.com/cnabio/cnab-spec/blob/master/500-CNAB-dependencies.md>.

use super::{ExtensionData, RequiredExtension};
use crate::bundle::Bundle;
use crate::core::{DepsError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Full key of the dependencies extension.
pub const DEPENDENCIES_KEY: &str = "io.cnab.dependencies";

/// Schema of the dependencies extension.
pub const DEPENDENCIES_SCHEMA: &str = "https://cnab.io/v1/dependencies.schema.json";

/// Descriptor for the dependencies extension.
pub const DEPENDENCIES_EXTENSION: RequiredExtension = RequiredExtension {
    shorthand: "dependencies",
    key: DEPENDENCIES_KEY,
    schema: DEPENDENCIES_SCHEMA,
    reader: dependency_reader,
};

/// Payload of the dependencies extension.
///
/// Decoding is lenient: JSON `null` anywhere in the payload reads as the
/// empty value of its field, and keys may be capitalised (`Requires`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Installation order requested by the bundle author.
    #[serde(
        default,
        alias = "Sequence",
        deserialize_with = "null_entries_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sequence: Vec<String>,

    /// Required bundles keyed by dependency name.
    #[serde(
        default,
        alias = "Requires",
        deserialize_with = "null_values_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub requires: HashMap<String, Dependency>,
}

/// A dependency on another bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Name of the dependency within the parent bundle.
    ///
    /// Usually absent from the payload; [`Dependencies::list_by_sequence`]
    /// fills it from the `requires` key.
    #[serde(default, alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,

    /// Location of the bundle in a registry, for example `REGISTRY/NAME:TAG`.
    #[serde(default, alias = "Bundle", deserialize_with = "null_as_default")]
    pub bundle: String,

    /// Allowed versions. `None` accepts any version.
    #[serde(default, alias = "Version", skip_serializing_if = "Option::is_none")]
    pub version: Option<DependencyVersion>,
}

/// Set of allowed versions for a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyVersion {
    /// Semantic version ranges, with or without a leading `v`.
    #[serde(
        default,
        alias = "Ranges",
        deserialize_with = "null_entries_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ranges: Vec<String>,

    /// Whether prerelease versions can satisfy the dependency.
    #[serde(
        rename = "prereleases",
        alias = "Prereleases",
        default,
        deserialize_with = "null_as_default"
    )]
    pub allow_prereleases: bool,
}

// JSON `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_entries_as_default<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let entries: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default().into_iter().map(Option::unwrap_or_default).collect())
}

fn null_values_as_default<'de, D, T>(
    deserializer: D,
) -> std::result::Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let values: Option<HashMap<String, Option<T>>> = Option::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name, value.unwrap_or_default()))
        .collect())
}

impl Dependencies {
    /// Whether the declared `sequence` is used as the installation order.
    ///
    /// True when `sequence` is non-empty and has exactly as many entries as
    /// `requires`.
    pub fn is_sequenced(&self) -> bool {
        !self.sequence.is_empty() && self.sequence.len() == self.requires.len()
    }

    /// Number of required bundles.
    pub fn len(&self) -> usize {
        self.requires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_empty()
    }

    /// Dependencies in installation order, each with its name filled in.
    ///
    /// When [`is_sequenced`](Self::is_sequenced) holds, the result follows
    /// `sequence`. Otherwise the sequence is ignored and entries come out in
    /// `requires` iteration order, which is unspecified and may differ between
    /// runs.
    ///
    /// A sequence entry missing from `requires` yields a default
    /// [`Dependency`] carrying that name. It is logged, not reported.
    pub fn list_by_sequence(&self) -> Vec<Dependency> {
        if self.is_sequenced() {
            trace!("Ordering {} dependencies by declared sequence", self.sequence.len());
            return self
                .sequence
                .iter()
                .map(|name| {
                    let dep = self.requires.get(name).cloned().unwrap_or_else(|| {
                        warn!("Dependency '{name}' is in the sequence but not in requires");
                        Dependency::default()
                    });
                    Dependency {
                        name: name.clone(),
                        ..dep
                    }
                })
                .collect();
        }

        if !self.sequence.is_empty() {
            debug!(
                "Ignoring dependency sequence: {} entries for {} required bundles",
                self.sequence.len(),
                self.requires.len()
            );
        }

        self.requires
            .iter()
            .map(|(name, dep)| Dependency {
                name: name.clone(),
                ..dep.clone()
            })
            .collect()
    }
}

impl Dependency {
    /// Installation name for this dependency under `installation`.
    pub fn installation_name(&self, installation: &str) -> String {
        build_prerequisite_installation_name(installation, &self.name)
    }
}

/// Reader registered for [`DEPENDENCIES_EXTENSION`].
///
/// # Errors
///
/// Same as [`read_dependencies`].
pub fn dependency_reader(bundle: &Bundle) -> Result<ExtensionData> {
    read_dependencies(bundle).map(ExtensionData::Dependencies)
}

/// Read the dependencies extension from `bundle`.
///
/// The untyped payload is encoded back to JSON bytes and decoded into
/// [`Dependencies`].
///
/// # Errors
///
/// - [`DepsError::ExtensionNotDefined`] if the bundle has no payload under
///   [`DEPENDENCIES_KEY`]
/// - [`DepsError::SerializationError`] with operation `marshal` if the payload
///   cannot be encoded, or `unmarshal` if it does not match the typed shape
pub fn read_dependencies(bundle: &Bundle) -> Result<Dependencies> {
    let data = bundle.custom.get(DEPENDENCIES_KEY).ok_or_else(|| DepsError::ExtensionNotDefined {
        key: DEPENDENCIES_KEY.to_string(),
    })?;

    let bytes = serde_json::to_vec(data).map_err(|e| DepsError::SerializationError {
        operation: "marshal".to_string(),
        extension: DEPENDENCIES_EXTENSION.shorthand.to_string(),
        content: data.to_string(),
        reason: e.to_string(),
    })?;

    let deps: Dependencies =
        serde_json::from_slice(&bytes).map_err(|e| DepsError::SerializationError {
            operation: "unmarshal".to_string(),
            extension: DEPENDENCIES_EXTENSION.shorthand.to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
            reason: e.to_string(),
        })?;

    debug!(
        "Read {} dependencies from bundle '{}' ({} sequenced)",
        deps.requires.len(),
        bundle.name,
        deps.sequence.len()
    );
    Ok(deps)
}

/// Whether `bundle` declares the dependencies extension.
pub fn has_dependencies(bundle: &Bundle) -> bool {
    bundle.custom.contains_key(DEPENDENCIES_KEY)
}

/// Name of the installation that tracks a prerequisite of `installation`.
///
/// ```rust
/// use cnab_deps::extensions::dependencies::build_prerequisite_installation_name;
///
/// assert_eq!(build_prerequisite_installation_name("myapp", "db"), "myapp-db");
/// ```
pub fn build_prerequisite_installation_name(installation: &str, dependency: &str) -> String {
    format!("{installation}-{dependency}")
}
