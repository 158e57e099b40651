//! Bundle extension registration.
//!
//! A CNAB bundle may carry optional, schema-described sections under its
//! `custom` map. Each section that this crate understands is described by a
//! [`RequiredExtension`]: its key, schema URL, a short display name, and the
//! reader that turns the untyped payload into typed data.
//!
//! Descriptors are collected in an [`ExtensionRegistry`] that callers construct
//! and pass around explicitly. There is no process-wide table.
//!
//! Readers return [`ExtensionData`], a closed enum with one variant per known
//! extension, so callers narrow the result with a `match` instead of a dynamic
//! type check.
//!
//! ```rust
//! use cnab_deps::bundle::Bundle;
//! use cnab_deps::extensions::{ExtensionData, ExtensionRegistry};
//! use cnab_deps::extensions::dependencies::DEPENDENCIES_KEY;
//!
//! let bundle = Bundle::from_json_str(
//!     r#"{"custom":{"io.cnab.dependencies":{"requires":{"db":{"bundle":"example.com/db:1.0"}}}}}"#,
//! )?;
//! let registry = ExtensionRegistry::with_builtin();
//! let ExtensionData::Dependencies(deps) = registry.read(&bundle, DEPENDENCIES_KEY)?;
//! assert_eq!(deps.requires.len(), 1);
//! # Ok::<(), cnab_deps::core::DepsError>(())
//! ```

pub mod dependencies;

use crate::bundle::Bundle;
use crate::core::{DepsError, Result};
use dependencies::{DEPENDENCIES_EXTENSION, Dependencies};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Reader that extracts one extension's payload from a bundle.
pub type ExtensionReader = fn(&Bundle) -> Result<ExtensionData>;

/// Extensions that [`ExtensionRegistry::with_builtin`] registers.
pub const BUILTIN_EXTENSIONS: &[RequiredExtension] = &[DEPENDENCIES_EXTENSION];

/// Typed payload produced by an extension reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionData {
    /// Payload of the `io.cnab.dependencies` extension
    Dependencies(Dependencies),
}

/// Static description of a bundle extension.
#[derive(Clone, Copy)]
pub struct RequiredExtension {
    /// Short display name, e.g. `dependencies`
    pub shorthand: &'static str,
    /// Key under the bundle's `custom` section
    pub key: &'static str,
    /// JSON schema URL describing the payload
    pub schema: &'static str,
    /// Reader for the payload
    pub reader: ExtensionReader,
}

impl RequiredExtension {
    /// Run this extension's reader against `bundle`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the reader reports, typically
    /// [`DepsError::ExtensionNotDefined`] or [`DepsError::SerializationError`].
    pub fn read(&self, bundle: &Bundle) -> Result<ExtensionData> {
        (self.reader)(bundle)
    }

    /// Whether `bundle` carries a payload under this extension's key.
    pub fn is_present(&self, bundle: &Bundle) -> bool {
        bundle.custom.contains_key(self.key)
    }
}

impl fmt::Debug for RequiredExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequiredExtension")
            .field("shorthand", &self.shorthand)
            .field("key", &self.key)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Registry of extensions the surrounding toolchain recognizes.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    entries: BTreeMap<&'static str, RequiredExtension>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every entry of [`BUILTIN_EXTENSIONS`].
    pub fn with_builtin() -> Self {
        let entries = BUILTIN_EXTENSIONS.iter().map(|ext| (ext.key, *ext)).collect();
        Self {
            entries,
        }
    }

    /// Register an extension.
    ///
    /// # Errors
    ///
    /// Returns [`DepsError::DuplicateExtension`] if the key is already taken.
    pub fn register(&mut self, extension: RequiredExtension) -> Result<()> {
        if self.entries.contains_key(extension.key) {
            return Err(DepsError::DuplicateExtension {
                key: extension.key.to_string(),
            });
        }
        debug!("Registering extension '{}' ({})", extension.shorthand, extension.key);
        self.entries.insert(extension.key, extension);
        Ok(())
    }

    /// Look up an extension by key.
    pub fn get(&self, key: &str) -> Option<&RequiredExtension> {
        self.entries.get(key)
    }

    /// Look up an extension by its shorthand.
    pub fn get_by_shorthand(&self, shorthand: &str) -> Option<&RequiredExtension> {
        self.entries.values().find(|ext| ext.shorthand == shorthand)
    }

    /// Registered extensions ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &RequiredExtension> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the payload of the extension registered under `key`.
    ///
    /// # Errors
    ///
    /// - [`DepsError::UnsupportedExtension`] if `key` is not registered
    /// - any error the extension's reader returns
    pub fn read(&self, bundle: &Bundle, key: &str) -> Result<ExtensionData> {
        let extension = self.get(key).ok_or_else(|| DepsError::UnsupportedExtension {
            key: key.to_string(),
        })?;
        extension.read(bundle)
    }

    /// Entries of the bundle's `requiredExtensions` that no registered
    /// extension handles, in the bundle's order.
    pub fn unsupported_required_extensions<'a>(&self, bundle: &'a Bundle) -> Vec<&'a str> {
        bundle
            .required_extensions
            .iter()
            .map(String::as_str)
            .filter(|key| !self.entries.contains_key(*key))
            .collect()
    }
}
