//! Test fixtures for bundle documents.

use crate::bundle::Bundle;
use crate::extensions::dependencies::DEPENDENCIES_KEY;
use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for `bundle.json` documents with a dependencies extension.
#[derive(Clone, Debug)]
pub struct BundleFixture {
    name: String,
    version: String,
    required_extensions: Vec<String>,
    dependencies: Option<Map<String, Value>>,
    raw_dependencies: Option<Value>,
}

impl BundleFixture {
    /// Bundle named `name` at version `0.1.0` with no extensions.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            required_extensions: Vec::new(),
            dependencies: None,
            raw_dependencies: None,
        }
    }

    /// The canonical two-dependency bundle: `db` then `cache`.
    pub fn with_db_and_cache() -> Self {
        Self::new("myapp")
            .sequence(&["db", "cache"])
            .requires_with_ranges("db", "example.com/db:1.0", &["1.x"], false)
            .requires("cache", "example.com/cache:2.0")
    }

    /// Set the bundle version.
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Add an entry to `requiredExtensions`.
    pub fn required_extension(mut self, key: &str) -> Self {
        self.required_extensions.push(key.to_string());
        self
    }

    /// Set the dependency sequence.
    pub fn sequence(mut self, names: &[&str]) -> Self {
        self.extension().insert("sequence".to_string(), json!(names));
        self
    }

    /// Require `bundle` under `name` with no version constraint.
    pub fn requires(mut self, name: &str, bundle: &str) -> Self {
        self.requires_entry(name, json!({ "bundle": bundle }));
        self
    }

    /// Require `bundle` under `name` restricted to `ranges`.
    pub fn requires_with_ranges(
        mut self,
        name: &str,
        bundle: &str,
        ranges: &[&str],
        prereleases: bool,
    ) -> Self {
        self.requires_entry(
            name,
            json!({ "bundle": bundle, "version": { "ranges": ranges, "prereleases": prereleases } }),
        );
        self
    }

    /// Replace the whole extension payload with arbitrary JSON.
    pub fn raw_dependencies(mut self, payload: Value) -> Self {
        self.raw_dependencies = Some(payload);
        self
    }

    fn extension(&mut self) -> &mut Map<String, Value> {
        self.dependencies.get_or_insert_with(Map::new)
    }

    fn requires_entry(&mut self, name: &str, entry: Value) {
        let requires = self.extension().entry("requires").or_insert_with(|| json!({}));
        if let Value::Object(map) = requires {
            map.insert(name.to_string(), entry);
        }
    }

    /// Render the bundle document.
    pub fn to_json(&self) -> Value {
        let mut doc = json!({
            "schemaVersion": "v1.0.0",
            "name": self.name,
            "version": self.version,
        });

        if !self.required_extensions.is_empty() {
            doc["requiredExtensions"] = json!(self.required_extensions);
        }

        let payload = self
            .raw_dependencies
            .clone()
            .or_else(|| self.dependencies.clone().map(Value::Object));
        if let Some(payload) = payload {
            let mut custom = Map::new();
            custom.insert(DEPENDENCIES_KEY.to_string(), payload);
            doc["custom"] = Value::Object(custom);
        }
        doc
    }

    /// Parse the rendered document into a [`Bundle`].
    pub fn build(&self) -> Bundle {
        serde_json::from_value(self.to_json()).expect("fixture renders a valid bundle")
    }

    /// Write the document as `bundle.json` under `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("bundle.json");
        let content = serde_json::to_string_pretty(&self.to_json())?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write bundle fixture to {}", path.display()))?;
        Ok(path)
    }
}
